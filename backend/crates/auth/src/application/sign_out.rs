//! Sign Out Use Case
//!
//! Revokes the refresh token family of the presented token. Unknown tokens
//! are ignored so sign-out is idempotent.

use std::sync::Arc;

use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<R>
where
    R: RefreshTokenRepository,
{
    token_repo: Arc<R>,
}

impl<R> SignOutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<R>) -> Self {
        Self { token_repo }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        let Some(stored) = self
            .token_repo
            .find_by_hash(&RefreshToken::hash(refresh_token))
            .await?
        else {
            return Ok(());
        };

        let revoked = self.token_repo.revoke_family(stored.family_id).await?;

        tracing::info!(
            user_id = %stored.user_id,
            family_id = %stored.family_id,
            revoked,
            "User signed out"
        );
        Ok(())
    }
}
