//! Sign Up Use Case
//!
//! Creates a password account and signs it in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{AuthPayload, issue_token_pair};
use crate::application::token::TokenIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Sign up use case
pub struct SignUpUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U, R> SignUpUseCase<U, R>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<AuthPayload> {
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::InvalidInput(e.to_string()))?;
        let email = Email::new(&input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        // Fast path; the unique indexes close the check-then-insert race
        if self.user_repo.exists_by_email(&email).await?
            || self.user_repo.exists_by_user_name(&user_name).await?
        {
            return Err(AuthError::DuplicateIdentity);
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new_local(
            user_name,
            email,
            password,
            input.display_name,
            self.tokens.clock().now(),
        );
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        issue_token_pair(&self.tokens, &*self.token_repo, &self.config, user, None).await
    }
}
