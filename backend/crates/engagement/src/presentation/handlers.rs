//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use kernel::identity::RequestIdentity;
use platform::clock::Clock;
use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::application::{
    CreateCommentInput, CreateCommentUseCase, CreatePostUseCase, FeedUseCase,
    ToggleEngagementUseCase,
};
use crate::domain::repository::{ContentRepository, CounterStore, EngagementLedger};
use crate::error::EngagementResult;
use crate::presentation::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, FeedParams, PostResponse,
    ToggleRequest, ToggleResponse,
};

/// Shared state for engagement handlers
pub struct EngagementAppState<R>
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<EngagementConfig>,
}

// Manual impl: derive would require `R: Clone`
impl<R> Clone for EngagementAppState<R>
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /api/engagement/toggle
pub async fn toggle<R>(
    State(state): State<EngagementAppState<R>>,
    identity: RequestIdentity,
    Json(req): Json<ToggleRequest>,
) -> EngagementResult<Json<ToggleResponse>>
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    let use_case = ToggleEngagementUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.clock.clone(),
    );

    let outcome = use_case.execute(&identity, req.into()).await?;

    Ok(Json(ToggleResponse { outcome }))
}

/// POST /api/engagement/posts
pub async fn create_post<R>(
    State(state): State<EngagementAppState<R>>,
    identity: RequestIdentity,
    Json(req): Json<CreatePostRequest>,
) -> EngagementResult<(StatusCode, Json<PostResponse>)>
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    let use_case = CreatePostUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let post = use_case.execute(&identity, req.into()).await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// POST /api/engagement/comments
pub async fn create_comment<R>(
    State(state): State<EngagementAppState<R>>,
    identity: RequestIdentity,
    Json(req): Json<CreateCommentRequest>,
) -> EngagementResult<(StatusCode, Json<CommentResponse>)>
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    let input = CreateCommentInput::try_from(req)?;
    let use_case = CreateCommentUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let comment = use_case.execute(&identity, input).await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// GET /api/engagement/feed?mode=TRENDING&limit=20&offset=0
pub async fn feed<R>(
    State(state): State<EngagementAppState<R>>,
    Query(params): Query<FeedParams>,
) -> EngagementResult<Json<Vec<PostResponse>>>
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    let posts = FeedUseCase::new(state.repo.clone())
        .execute(params.into())
        .await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
