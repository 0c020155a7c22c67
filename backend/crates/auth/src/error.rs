//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::error::{app_error::AppError, conversions::is_unique_violation, kind::ErrorKind};
use kernel::identity::AccessError;
use platform::deadline::DeadlineError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// Messages are user-facing. Storage and provider details stay in the
/// variant payload and only reach the logs.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed signup / request input
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown email, wrong password, or no password on the account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username, email or external id already registered
    #[error("An account with this username or email already exists")]
    DuplicateIdentity,

    #[error("Account is banned until {}", .until.format("%Y-%m-%d %H:%M:%S UTC"))]
    AccountBanned { until: DateTime<Utc> },

    /// Malformed token, bad signature or wrong algorithm
    #[error("Invalid token")]
    InvalidToken,

    /// Valid signature, past expiry
    #[error("Token expired")]
    ExpiredToken,

    /// Unknown, expired, revoked or reused refresh token
    #[error("Invalid refresh token")]
    RefreshTokenInvalid,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Administrator privileges required")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    /// OAuth code exchange or profile fetch failed
    #[error("External identity provider request failed")]
    ExternalExchangeFailed(String),

    #[error("Persistence failure")]
    PersistenceFailure(String),

    #[error("Password hashing failed")]
    HashingFailure(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::RefreshTokenInvalid
            | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::AccountBanned { .. } | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::DuplicateIdentity => ErrorKind::Conflict,
            AuthError::ExternalExchangeFailed(_) => ErrorKind::BadGateway,
            AuthError::PersistenceFailure(_) | AuthError::HashingFailure(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::ExpiredToken | AuthError::RefreshTokenInvalid => {
                err.with_action("Sign in again")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::PersistenceFailure(detail) => {
                tracing::error!(detail = %detail, "Auth persistence failure");
            }
            AuthError::HashingFailure(detail) => {
                tracing::error!(detail = %detail, "Password hashing failure");
            }
            AuthError::ExternalExchangeFailed(detail) => {
                tracing::warn!(detail = %detail, "External identity exchange failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountBanned { until } => {
                tracing::warn!(%until, "Login attempt on banned account");
            }
            AuthError::RefreshTokenInvalid | AuthError::Forbidden => {
                tracing::warn!(error = %self, "Auth rejection");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            AuthError::DuplicateIdentity
        } else {
            AuthError::PersistenceFailure(err.to_string())
        }
    }
}

impl From<DeadlineError<AuthError>> for AuthError {
    fn from(err: DeadlineError<AuthError>) -> Self {
        match err {
            DeadlineError::Inner(inner) => inner,
            elapsed @ DeadlineError::Elapsed { .. } => {
                AuthError::PersistenceFailure(elapsed.to_string())
            }
        }
    }
}

impl From<AccessError> for AuthError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized => AuthError::Unauthorized,
            AccessError::Forbidden => AuthError::Forbidden,
        }
    }
}
