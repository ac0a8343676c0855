//! API error type and its JSON rendering.
//!
//! Every failed request answers with `{"error": "<message>"}` and a matching
//! status code. Clients branch on the status and surface the message as-is.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session accompanied the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// The caller is authenticated but not allowed to touch this resource.
    #[error("Forbidden")]
    Forbidden,

    /// Malformed or invalid request payload.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The request contradicts current state, e.g. a duplicate slug.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side faults keep their detail in the log only.
        let message = match &self {
            Self::Database(err) => {
                tracing::error!(error = %err, "database error while handling request");
                "Internal server error".to_string()
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal error while handling request");
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!(status = %status, error = %other, "request rejected");
                other.to_string()
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::bad_request("nope").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("taken").status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn messages_render_flat() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(ApiError::Forbidden.to_string(), "Forbidden");
        assert_eq!(
            ApiError::conflict("Course with this slug already exists.").to_string(),
            "Course with this slug already exists."
        );
    }
}
