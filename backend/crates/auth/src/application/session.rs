//! Token pair issuance shared by every sign-in path.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token::{AccessToken, TokenIssuer};
use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Result of signup, login, external login and refresh
#[derive(Clone)]
pub struct AuthPayload {
    pub access_token: AccessToken,
    /// Plaintext, shown to the client once
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
    pub user: User,
}

impl std::fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPayload")
            .field("access_token", &self.access_token)
            .field("refresh_token", &"[REDACTED]")
            .field("refresh_expires_at", &self.refresh_expires_at)
            .field("user", &self.user.user_id)
            .finish()
    }
}

/// Mint an access token and persist a new refresh token for `user`.
///
/// `family_id` continues an existing family on rotation.
pub(crate) async fn issue_token_pair<R>(
    tokens: &TokenIssuer,
    refresh_repo: &R,
    config: &AuthConfig,
    user: User,
    family_id: Option<Uuid>,
) -> AuthResult<AuthPayload>
where
    R: RefreshTokenRepository,
{
    let access_token = tokens.issue(&user)?;

    let (refresh, plaintext) =
        RefreshToken::issue(user.user_id, family_id, config.refresh_ttl(), tokens.clock().now());
    refresh_repo.create(&refresh).await?;

    Ok(AuthPayload {
        access_token,
        refresh_token: plaintext,
        refresh_expires_at: refresh.expires_at,
        user,
    })
}
