//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use kernel::id::UserId;
use kernel::identity::RequestIdentity;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    BanUserInput, BanUserUseCase, ExternalSignInUseCase, RefreshTokenUseCase, SignInInput,
    SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{ExternalIdentityBroker, RefreshTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, BanUserRequest, ExternalSignInRequest, MeResponse, RefreshTokenRequest,
    SignInRequest, SignUpRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, B>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub broker: Arc<B>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: derive would require `R: Clone` and `B: Clone`
impl<R, B> Clone for AuthAppState<R, B>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            broker: self.broker.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, B>(
    State(state): State<AuthAppState<R, B>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let payload = use_case
        .execute(SignUpInput {
            user_name: req.username,
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(payload.into())))
}

/// POST /api/auth/login
pub async fn sign_in<R, B>(
    State(state): State<AuthAppState<R, B>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let payload = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(payload.into()))
}

// ============================================================================
// GitHub
// ============================================================================

/// GET /api/auth/github
pub async fn github_authorize<R, B>(State(state): State<AuthAppState<R, B>>) -> Redirect
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    Redirect::temporary(&state.broker.authorize_url())
}

/// POST /api/auth/github/callback
pub async fn github_callback<R, B>(
    State(state): State<AuthAppState<R, B>>,
    Json(req): Json<ExternalSignInRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    let use_case = ExternalSignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.broker.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let payload = use_case.execute(&req.code).await?;

    Ok(Json(payload.into()))
}

// ============================================================================
// Refresh / Sign Out
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R, B>(
    State(state): State<AuthAppState<R, B>>,
    Json(req): Json<RefreshTokenRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let payload = use_case.execute(&req.refresh_token).await?;

    Ok(Json(payload.into()))
}

/// POST /api/auth/logout
pub async fn sign_out<R, B>(
    State(state): State<AuthAppState<R, B>>,
    Json(req): Json<RefreshTokenRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    SignOutUseCase::new(state.repo.clone())
        .execute(&req.refresh_token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Identity / Moderation
// ============================================================================

/// GET /api/auth/me
pub async fn me(identity: RequestIdentity) -> AuthResult<Json<MeResponse>> {
    let caller = identity.require_authenticated()?;
    Ok(Json(MeResponse::from(caller)))
}

/// POST /api/auth/users/{id}/ban
pub async fn ban_user<R, B>(
    State(state): State<AuthAppState<R, B>>,
    identity: RequestIdentity,
    Path(user_id): Path<Uuid>,
    Json(req): Json<BanUserRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
    B: ExternalIdentityBroker + Send + Sync + 'static,
{
    let use_case = BanUserUseCase::new(state.repo.clone(), state.tokens.clock().clone());

    use_case
        .execute(
            &identity,
            BanUserInput {
                user_id: UserId::from_uuid(user_id),
                until: req.until,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
