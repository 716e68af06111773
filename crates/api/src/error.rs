//! HTTP error mapping
//!
//! Every handler returns [`ApiResult`]; failures render as
//! `{"error": "<message>", "status": <code>}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fanevent_domain::FanEventError;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Domain error carried across the HTTP boundary
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub FanEventError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FanEventError::Auth(_) => StatusCode::UNAUTHORIZED,
            FanEventError::Forbidden(_) => StatusCode::FORBIDDEN,
            FanEventError::NotFound(_) => StatusCode::NOT_FOUND,
            FanEventError::InvalidInput(_) | FanEventError::Conflict(_) => StatusCode::BAD_REQUEST,
            FanEventError::Database(_) | FanEventError::Config(_) | FanEventError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(FanEventError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(FanEventError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(FanEventError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage and config details stay in the logs.
        let message = if status.is_server_error() {
            error!(error = %self.0, "Request failed with internal error");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message, "status": status.as_u16() }))).into_response()
    }
}
