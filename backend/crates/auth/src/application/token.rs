//! Token Issuer
//!
//! Mints and validates HS256 access tokens. Validation is CPU-only.
//!
//! Expiry is checked against the injected [`Clock`], not the system time,
//! so `jsonwebtoken`'s own `exp` check is disabled.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use kernel::identity::RequestIdentity;
use platform::clock::Clock;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};

/// Decoded access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Mirrors `user_id`
    pub sub: String,
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

impl Claims {
    pub fn into_identity(self) -> RequestIdentity {
        RequestIdentity::authenticated(self.user_id, self.username, self.is_admin)
    }
}

/// Signed access token
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Only HS256 headers are accepted; `none` never parses as an algorithm.
        validation.algorithms = vec![Algorithm::HS256];
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = ["exp", "iat", "sub"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            access_ttl: config.access_ttl(),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Mint an access token for `user`
    pub fn issue(&self, user: &User) -> AuthResult<AccessToken> {
        let now = self.clock.now();
        let expires_at = now + self.access_ttl;
        let claims = Claims {
            sub: user.user_id.to_string(),
            user_id: user.user_id,
            username: user.user_name.as_str().to_string(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::HashingFailure(format!("token signing failed: {e}")))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Verify signature, algorithm and expiry.
    ///
    /// `InvalidToken` for anything malformed or wrongly signed,
    /// `ExpiredToken` only for a well-signed token with `exp <= now`.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            }
        })?;

        let claims = data.claims;
        if claims.sub != claims.user_id.to_string() {
            return Err(AuthError::InvalidToken);
        }
        if claims.exp <= self.clock.now_unix() {
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims)
    }

    /// Optional bearer credential to request identity. Never fails.
    pub fn identify(&self, bearer: Option<&str>) -> RequestIdentity {
        match bearer.map(|token| self.validate(token)) {
            Some(Ok(claims)) => claims.into_identity(),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
                RequestIdentity::Anonymous
            }
            None => RequestIdentity::Anonymous,
        }
    }
}
