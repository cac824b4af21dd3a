use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::error;

/// Stable, machine-readable error codes returned in the `code` field.
pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
///
/// Validation, conflict and not-found errors are always reported to the
/// caller. `Storage` wraps anything the backing store could not do
/// (connectivity, corrupted rows, poisoned locks) and is never retried here.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "{}: {}", field, reason)]
    Validation { field: &'static str, reason: String },

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "storage failure: {}", _0)]
    Storage(anyhow::Error),
}

impl StoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Validation { .. } => error_code::VALIDATION_FAILED,
            StoreError::Conflict(_) => error_code::ALREADY_EXISTS,
            StoreError::NotFound(_) => error_code::NOT_FOUND,
            StoreError::Storage(_) => error_code::STORAGE_ERROR,
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(err.into())
    }
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Validation { .. } => StatusCode::BAD_REQUEST,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            StoreError::Validation { field, reason } => json!({
                "code": self.error_code(),
                "message": reason,
                "field": field,
            }),
            // internals stay in the log
            StoreError::Storage(e) => {
                error!(error = %e, "Storage failure");
                json!({
                    "code": self.error_code(),
                    "message": "Something went wrong, Contact with system admin",
                })
            }
            _ => json!({
                "code": self.error_code(),
                "message": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            StoreError::validation("email", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(StoreError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(StoreError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            StoreError::Storage(anyhow::anyhow!("down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_includes_field_for_validation() {
        let err = StoreError::validation("full_name", "must not be empty");
        assert_eq!(err.to_string(), "full_name: must not be empty");
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn storage_error_exposes_source() {
        use std::error::Error;
        let err = StoreError::Storage(anyhow::anyhow!("connection reset"));
        assert!(err.source().is_some());
        assert!(StoreError::Conflict("dup".into()).source().is_none());
    }
}
