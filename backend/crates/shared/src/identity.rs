//! Request identity
//!
//! Who is calling. Every operation that needs a caller takes a
//! [`RequestIdentity`] explicitly; transport layers only construct it.

use thiserror::Error;

use crate::error::app_error::AppError;
use crate::id::UserId;

/// Verified claims of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

/// Caller identity attached to a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestIdentity {
    /// No credential, or a credential that failed validation.
    #[default]
    Anonymous,
    Authenticated(AuthenticatedIdentity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Administrator privileges required")]
    Forbidden,
}

impl RequestIdentity {
    pub fn authenticated(user_id: UserId, username: impl Into<String>, is_admin: bool) -> Self {
        Self::Authenticated(AuthenticatedIdentity {
            user_id,
            username: username.into(),
            is_admin,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Authenticated(identity) => Some(identity.user_id),
            Self::Anonymous => None,
        }
    }

    /// The authenticated caller, or [`AccessError::Unauthorized`].
    pub fn require_authenticated(&self) -> Result<&AuthenticatedIdentity, AccessError> {
        match self {
            Self::Authenticated(identity) => Ok(identity),
            Self::Anonymous => Err(AccessError::Unauthorized),
        }
    }

    /// The authenticated caller if they are an administrator.
    ///
    /// Anonymous callers get `Unauthorized`, non-admins get `Forbidden`.
    pub fn require_admin(&self) -> Result<&AuthenticatedIdentity, AccessError> {
        let identity = self.require_authenticated()?;
        if identity.is_admin {
            Ok(identity)
        } else {
            Err(AccessError::Forbidden)
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized => {
                AppError::unauthorized(err.to_string()).with_action("Sign in and retry")
            }
            AccessError::Forbidden => AppError::forbidden(err.to_string()),
        }
    }
}

/// Reads the identity placed in the request extensions by the auth
/// middleware. Absent means anonymous; this extractor never rejects.
#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_default() {
        let identity = RequestIdentity::default();
        assert!(!identity.is_authenticated());
        assert!(identity.user_id().is_none());
    }

    #[test]
    fn test_require_authenticated() {
        let user_id = UserId::new();
        let identity = RequestIdentity::authenticated(user_id, "alice", false);
        let caller = identity.require_authenticated().unwrap();
        assert_eq!(caller.user_id, user_id);
        assert_eq!(caller.username, "alice");

        assert_eq!(
            RequestIdentity::Anonymous.require_authenticated(),
            Err(AccessError::Unauthorized)
        );
    }

    #[test]
    fn test_require_admin() {
        let admin = RequestIdentity::authenticated(UserId::new(), "root", true);
        assert!(admin.require_admin().is_ok());

        let member = RequestIdentity::authenticated(UserId::new(), "bob", false);
        assert_eq!(member.require_admin(), Err(AccessError::Forbidden));

        assert_eq!(
            RequestIdentity::Anonymous.require_admin(),
            Err(AccessError::Unauthorized)
        );
    }

    #[test]
    fn test_access_error_status() {
        assert_eq!(AppError::from(AccessError::Unauthorized).status_code(), 401);
        assert_eq!(AppError::from(AccessError::Forbidden).status_code(), 403);
    }
}
