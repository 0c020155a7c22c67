//! Refresh Token Use Case
//!
//! Exchanges a refresh token for a new token pair in the same family.
//!
//! - Tokens are single-use: the presented token is revoked on success.
//! - Presenting an already revoked token is treated as theft and revokes the
//!   whole family.
//! - Expiry is fixed at issuance.
//! - The user is re-read, so bans and admin changes apply at the next refresh.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{AuthPayload, issue_token_pair};
use crate::application::token::TokenIssuer;
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U, R> RefreshTokenUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<R>,
        tokens: Arc<TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<AuthPayload> {
        let now = self.tokens.clock().now();

        let stored = self
            .token_repo
            .find_by_hash(&RefreshToken::hash(refresh_token))
            .await?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        if stored.revoked {
            return Err(self.reuse_detected(&stored).await);
        }

        if stored.is_expired_at(now) {
            return Err(AuthError::RefreshTokenInvalid);
        }

        // Lost a race with a concurrent rotation of the same token
        if !self.token_repo.revoke(&stored.token_id).await? {
            return Err(self.reuse_detected(&stored).await);
        }

        let Some(user) = self.user_repo.find_by_id(&stored.user_id).await? else {
            self.token_repo.revoke_family(stored.family_id).await?;
            return Err(AuthError::RefreshTokenInvalid);
        };

        if let Some(until) = user.active_ban(now) {
            self.token_repo.revoke_family(stored.family_id).await?;
            return Err(AuthError::AccountBanned { until });
        }

        tracing::debug!(
            user_id = %user.user_id,
            family_id = %stored.family_id,
            "Refresh token rotated"
        );

        issue_token_pair(
            &self.tokens,
            &*self.token_repo,
            &self.config,
            user,
            Some(stored.family_id),
        )
        .await
    }

    async fn reuse_detected(&self, stored: &RefreshToken) -> AuthError {
        tracing::warn!(
            user_id = %stored.user_id,
            family_id = %stored.family_id,
            "Refresh token reuse detected, revoking family"
        );
        match self.token_repo.revoke_family(stored.family_id).await {
            Ok(_) => AuthError::RefreshTokenInvalid,
            Err(e) => e,
        }
    }
}
