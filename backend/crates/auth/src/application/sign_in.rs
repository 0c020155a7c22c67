//! Sign In Use Case
//!
//! Email + password login. Every failing path performs one Argon2
//! verification and reports the same `InvalidCredentials`; the ban is only
//! revealed once the password has verified.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{AuthPayload, issue_token_pair};
use crate::application::token::TokenIssuer;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U, R> SignInUseCase<U, R>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<AuthPayload> {
        let raw_password = RawPassword::presented(input.password);
        let pepper = self.config.pepper();

        // A malformed email cannot belong to anyone
        let user = match Email::new(&input.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let verified = match user.as_ref().and_then(|u| u.password.as_ref()) {
            Some(hash) => hash.verify(&raw_password, pepper),
            None => raw_password.verify_dummy(pepper),
        };

        let user = match user {
            Some(user) if verified => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        if let Some(until) = user.active_ban(self.tokens.clock().now()) {
            return Err(AuthError::AccountBanned { until });
        }

        tracing::info!(user_id = %user.user_id, "User signed in");

        issue_token_pair(&self.tokens, &*self.token_repo, &self.config, user, None).await
    }
}
