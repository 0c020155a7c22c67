//! External Sign In Use Case
//!
//! OAuth login. An unknown provider account is not an error: it gets a new
//! local account without a password.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{AuthPayload, issue_token_pair};
use crate::application::token::TokenIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::{ExternalIdentityBroker, RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, external_profile::ExternalProfile, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

pub struct ExternalSignInUseCase<U, R, B>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    B: ExternalIdentityBroker,
{
    user_repo: Arc<U>,
    token_repo: Arc<R>,
    broker: Arc<B>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U, R, B> ExternalSignInUseCase<U, R, B>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    B: ExternalIdentityBroker,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<R>,
        broker: Arc<B>,
        tokens: Arc<TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            broker,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, code: &str) -> AuthResult<AuthPayload> {
        if code.trim().is_empty() {
            return Err(AuthError::InvalidInput("Authorization code is required".into()));
        }

        let profile = self.broker.exchange_code(code.trim()).await?;

        let user = match self.user_repo.find_by_external_id(&profile.external_id).await? {
            Some(user) => user,
            None => self.create_account(profile).await?,
        };

        if let Some(until) = user.active_ban(self.tokens.clock().now()) {
            return Err(AuthError::AccountBanned { until });
        }

        tracing::info!(
            user_id = %user.user_id,
            external_id = ?user.external_id,
            "User signed in with external identity"
        );

        issue_token_pair(&self.tokens, &*self.token_repo, &self.config, user, None).await
    }

    async fn create_account(&self, profile: ExternalProfile) -> AuthResult<User> {
        let user_name = UserName::from_provider(&profile.login).map_err(|e| {
            AuthError::ExternalExchangeFailed(format!("unusable provider login: {e}"))
        })?;

        let email = match profile.email.as_deref().map(Email::new) {
            Some(Ok(email)) => email,
            // Missing or unusable address: provider-style noreply placeholder
            _ => Email::noreply(&profile.external_id, &profile.login)?,
        };

        let user = User::new_external(
            user_name,
            email,
            profile.external_id,
            profile.display_name,
            profile.avatar_url,
            self.tokens.clock().now(),
        );
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "Account created from external identity"
        );
        Ok(user)
    }
}
