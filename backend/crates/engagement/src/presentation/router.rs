//! Engagement Router

use axum::{
    Router,
    routing::{get, post},
};
use platform::clock::Clock;
use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::domain::repository::{ContentRepository, CounterStore, EngagementLedger};
use crate::infra::postgres::PgEngagementRepository;
use crate::presentation::handlers::{self, EngagementAppState};

/// Create the Engagement router with PostgreSQL repository
pub fn engagement_router(
    repo: PgEngagementRepository,
    clock: Arc<dyn Clock>,
    config: EngagementConfig,
) -> Router {
    engagement_router_generic(repo, clock, config)
}

/// Create a generic Engagement router for any repository implementation
///
/// Writes need a `RequestIdentity` resolved upstream; without one every
/// caller is anonymous and only the feed answers.
pub fn engagement_router_generic<R>(repo: R, clock: Arc<dyn Clock>, config: EngagementConfig) -> Router
where
    R: EngagementLedger + CounterStore + ContentRepository + Send + Sync + 'static,
{
    let state = EngagementAppState {
        repo: Arc::new(repo),
        clock,
        config: Arc::new(config),
    };

    Router::new()
        .route("/toggle", post(handlers::toggle::<R>))
        .route("/posts", post(handlers::create_post::<R>))
        .route("/comments", post(handlers::create_comment::<R>))
        .route("/feed", get(handlers::feed::<R>))
        .with_state(state)
}
