use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::{Error, ValidationErrors};

#[derive(Debug, Serialize)]
pub struct Meta {
    pub count: usize,
}

/// Envelope for list endpoints: `{"meta": {"count": n}, "data": [...]}`.
#[derive(Debug, Serialize)]
pub struct CollectionResponse<T: Serialize> {
    pub meta: Meta,
    pub data: Vec<T>,
}

impl<T: Serialize> CollectionResponse<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            meta: Meta { count: data.len() },
            data,
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<ValidationErrors>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            errors: Some(errors),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound => ApiError::not_found("Not Found"),
            Error::Validation(errors) => ApiError::validation(errors),
            Error::BadRequest(message) => ApiError::bad_request(message),
            Error::Unauthorized => ApiError::unauthorized("Unauthorized"),
            Error::Topology(message) => {
                tracing::warn!("Topology error: {}", message);
                ApiError::internal(format!("Topology error: {message}"))
            }
            other => {
                tracing::error!("Request failed: {}", other);
                ApiError::internal("Internal Server Error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.errors {
            Some(errors) => json!({ "message": self.message, "errors": errors }),
            None => json!({ "message": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Extension for Option types from store operations.
pub trait StoreOptionExt<T> {
    fn or_not_found(self) -> Result<T, ApiError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found("Not Found"))
    }
}
