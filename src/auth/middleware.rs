use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::identity::{IDENTITY_HEADER, external_tenant};
use crate::server::AppState;
use crate::types::Tenant;

/// Extractor that resolves the caller's tenant from the identity header.
pub struct RequireTenant {
    pub tenant: Tenant,
}

impl RequireTenant {
    #[must_use]
    pub fn id(&self) -> i64 {
        self.tenant.id
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingIdentity,
    InvalidIdentity,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingIdentity => (StatusCode::UNAUTHORIZED, "Identity header required"),
            AuthError::InvalidIdentity => (StatusCode::UNAUTHORIZED, "Invalid identity header"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "message": message });

        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireTenant {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(IDENTITY_HEADER)
            .ok_or(AuthError::MissingIdentity)?
            .to_str()
            .map_err(|_| AuthError::InvalidIdentity)?;

        let account = external_tenant(header).map_err(|_| AuthError::InvalidIdentity)?;

        let tenant = state.store.find_or_create_tenant(&account).map_err(|e| {
            tracing::error!("Failed to resolve tenant {}: {}", account, e);
            AuthError::InternalError
        })?;

        Ok(RequireTenant { tenant })
    }
}
