use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::response::ApiError;
use crate::error::Error;

/// Record id from the `{id}` path segment. A segment that is not an integer
/// names no record, so it is rejected as not found.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(Error::NotFound))?;

        raw.parse()
            .map(EntityId)
            .map_err(|_| ApiError::from(Error::NotFound))
    }
}

/// JSON request body whose rejections render as `{"message": ...}` with 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(Error::BadRequest(rejection.body_text()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use axum::{Router, response::IntoResponse};
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }

    fn router() -> Router {
        Router::new()
            .route("/things/{id}", get(|EntityId(id): EntityId| async move { id.to_string() }))
            .route(
                "/things",
                post(|JsonBody(named): JsonBody<Named>| async move { named.name.into_response() }),
            )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_entity_id_parses_integer() {
        let response = router()
            .oneshot(Request::get("/things/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_entity_id_rejects_non_integer_as_not_found() {
        let response = router()
            .oneshot(Request::get("/things/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({"message": "Not Found"}));
    }

    #[tokio::test]
    async fn test_json_body_rejection_is_bad_request() {
        let response = router()
            .oneshot(
                Request::post("/things")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }
}
