use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::admin::{AuthError, ReadError};
use crate::store::StoreError;
use crate::wizard::state::WizardError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Field validation failures are not errors here: they travel inside the wizard view.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{}", crate::admin::service::INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::UnknownSession(_) => AppError::NotFound(e.to_string()),
            WizardError::UnknownField(_) | WizardError::ValueKind { .. } => {
                AppError::Validation(e.to_string())
            }
            WizardError::NotLastSection
            | WizardError::SubmitInFlight
            | WizardError::NoSubmitInFlight
            | WizardError::AlreadySubmitted
            | WizardError::NotSubmitted => AppError::Conflict(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<ReadError> for AppError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::NotFound(_) => AppError::NotFound(e.to_string()),
            ReadError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wizard_errors_map_to_statuses() {
        let status = |e: WizardError| AppError::from(e).into_response().status();
        assert_eq!(
            status(WizardError::UnknownSession(uuid::Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(WizardError::UnknownField("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(WizardError::NotSubmitted), StatusCode::CONFLICT);
        assert_eq!(status(WizardError::SubmitInFlight), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized_with_message() {
        let err = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(
            err.to_string(),
            "Invalid email or password. Please try again."
        );
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_missing_submission_is_not_found() {
        let err = AppError::from(ReadError::NotFound(uuid::Uuid::nil()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
