use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error taxonomy for the whole API surface. Every variant maps to one
/// HTTP status and renders the uniform `{success:false, ...}` envelope, so
/// handlers can bubble errors with `?` and never hand-roll responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed, missing or out-of-range input; the store is not touched.
    #[error("{0}")]
    Validation(String),

    /// Field-level validation failures, reported as an `errors` array.
    #[error("validation failed")]
    FieldValidation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    /// Business-rule violation: insufficient stock, duplicate unique field,
    /// self-deletion, illegal status transition.
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role.
    #[error("{0}")]
    Forbidden(String),

    /// The store is unreachable, or a write could not be confirmed.
    /// Kept distinct from validation so operators can tell backend faults
    /// from client mistakes.
    #[error("{0}")]
    Infrastructure(#[from] anyhow::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::FieldValidation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Infrastructure(ref e) = self {
            tracing::error!("infrastructure error: {e:#}");
        }

        let body = match self {
            ApiError::FieldValidation(errors) => json!({
                "success": false,
                "errors": errors,
            }),
            other => json!({
                "success": false,
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            ApiError::validation("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Infrastructure(anyhow::anyhow!("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
