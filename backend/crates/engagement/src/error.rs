//! Engagement Error Types
//!
//! This module provides engagement-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::identity::AccessError;
use platform::deadline::DeadlineError;
use thiserror::Error;

use crate::domain::value_objects::{ActionType, TargetType};

/// Engagement-specific result type alias
pub type EngagementResult<T> = Result<T, EngagementError>;

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    /// Missing or deleted content item
    #[error("Target not found")]
    TargetNotFound,

    /// Action whose counter the target type does not carry
    #[error("{action} is not supported on {target_type}")]
    UnsupportedAction {
        action: ActionType,
        target_type: TargetType,
    },

    /// Ledger or counter write failed, or the store deadline elapsed
    #[error("Persistence failure")]
    PersistenceFailure(String),
}

impl EngagementError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngagementError::InvalidInput(_) => ErrorKind::BadRequest,
            EngagementError::Unauthorized => ErrorKind::Unauthorized,
            EngagementError::Forbidden => ErrorKind::Forbidden,
            EngagementError::TargetNotFound => ErrorKind::NotFound,
            EngagementError::UnsupportedAction { .. } => ErrorKind::UnprocessableEntity,
            EngagementError::PersistenceFailure(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            EngagementError::Unauthorized => err.with_action("Sign in to continue"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            EngagementError::PersistenceFailure(detail) => {
                tracing::error!(detail = %detail, "Engagement persistence failure");
            }
            EngagementError::Forbidden => {
                tracing::warn!("Engagement access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Engagement error");
            }
        }
    }
}

impl From<EngagementError> for AppError {
    fn from(err: EngagementError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for EngagementError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for EngagementError {
    fn from(err: sqlx::Error) -> Self {
        EngagementError::PersistenceFailure(err.to_string())
    }
}

impl From<DeadlineError<EngagementError>> for EngagementError {
    fn from(err: DeadlineError<EngagementError>) -> Self {
        match err {
            DeadlineError::Inner(inner) => inner,
            elapsed @ DeadlineError::Elapsed { .. } => {
                EngagementError::PersistenceFailure(elapsed.to_string())
            }
        }
    }
}

impl From<AccessError> for EngagementError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized => EngagementError::Unauthorized,
            AccessError::Forbidden => EngagementError::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(EngagementError::TargetNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(EngagementError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            EngagementError::UnsupportedAction {
                action: ActionType::Upvote,
                target_type: TargetType::Comment,
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            EngagementError::PersistenceFailure("deadlock detected".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unsupported_action_message() {
        let err = EngagementError::UnsupportedAction {
            action: ActionType::Upvote,
            target_type: TargetType::Comment,
        };
        assert_eq!(err.to_string(), "UPVOTE is not supported on COMMENT");
    }

    #[test]
    fn test_persistence_detail_is_not_rendered() {
        let err = EngagementError::PersistenceFailure("relation \"posts\" does not exist".into());
        assert_eq!(err.to_app_error().message(), "Persistence failure");
    }

    #[test]
    fn test_deadline_elapsed_is_persistence_failure() {
        let err: EngagementError = DeadlineError::<EngagementError>::Elapsed {
            operation: "engagements.insert",
            limit: std::time::Duration::from_secs(5),
        }
        .into();
        assert!(matches!(err, EngagementError::PersistenceFailure(_)));
    }
}
