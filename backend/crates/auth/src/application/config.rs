//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::config::{ConfigError, env_duration, env_var};
use platform::crypto;

/// Default access token lifetime
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh token lifetime (one week)
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(168 * 3600);

/// Default deadline for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for HS256 access tokens
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Deadline applied to every store call
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
            password_pepper: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl AuthConfig {
    /// Config with a random signing secret. Tokens do not survive restarts.
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Read `JWT_SECRET`, `JWT_ACCESS_EXPIRY`, `JWT_REFRESH_EXPIRY`,
    /// `PASSWORD_PEPPER` and `STORE_TIMEOUT`.
    ///
    /// Without `JWT_SECRET`, debug builds fall back to a random secret;
    /// release builds fail.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match env_var("JWT_SECRET") {
            Some(secret) => Self {
                jwt_secret: secret.into_bytes(),
                ..Default::default()
            },
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using a random development secret");
                Self::development()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        Ok(Self {
            access_token_ttl: env_duration("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_TOKEN_TTL),
            refresh_token_ttl: env_duration("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_TOKEN_TTL),
            password_pepper: env_var("PASSWORD_PEPPER").map(String::into_bytes),
            store_timeout: env_duration("STORE_TIMEOUT", DEFAULT_STORE_TIMEOUT),
            ..base
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.access_token_ttl).unwrap_or(chrono::Duration::minutes(15))
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.refresh_token_ttl).unwrap_or(chrono::Duration::hours(168))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.refresh_ttl(), chrono::Duration::hours(168));
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_development_secret_is_random() {
        let a = AuthConfig::development();
        let b = AuthConfig::development();
        assert_eq!(a.jwt_secret.len(), 32);
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::development()
        };
        let debug = format!("{:?}", config);
        // b"pepper" as a byte list
        assert!(!debug.contains("112, 101, 112"));
        assert!(debug.contains("REDACTED"));
    }
}
