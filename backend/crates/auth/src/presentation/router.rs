//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::{ExternalIdentityBroker, RefreshTokenRepository, UserRepository};
use crate::infra::{github::GithubIdentityBroker, postgres::PgAuthRepository};
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository and GitHub broker
pub fn auth_router(
    repo: PgAuthRepository,
    broker: GithubIdentityBroker,
    tokens: Arc<TokenIssuer>,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, broker, tokens, config)
}

/// Create a generic Auth router for any repository and broker implementation
///
/// Expects [`resolve_identity`](crate::presentation::middleware::resolve_identity)
/// to run in front of it.
pub fn auth_router_generic<R, B>(
    repo: R,
    broker: B,
    tokens: Arc<TokenIssuer>,
    config: AuthConfig,
) -> Router
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        broker: Arc::new(broker),
        tokens,
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, B>))
        .route("/login", post(handlers::sign_in::<R, B>))
        .route("/github", get(handlers::github_authorize::<R, B>))
        .route("/github/callback", post(handlers::github_callback::<R, B>))
        .route("/refresh", post(handlers::refresh::<R, B>))
        .route("/logout", post(handlers::sign_out::<R, B>))
        .route("/me", get(handlers::me))
        .route("/users/{id}/ban", post(handlers::ban_user::<R, B>))
        .with_state(state)
}
