//! Engagement & Reputation Ledger
//!
//! Clean Architecture structure:
//! - `domain/` - Content entities, target/action vocabulary, projection rules
//! - `application/` - Toggle, post, comment and feed use cases
//! - `infra/` - Postgres and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Model
//! - One ledger record per (actor, target, action); toggling flips it
//! - Counters and author reputation are projections of the ledger
//! - Weights: like +1, upvote +2, view 0; a new post credits its author +5
//! - Trending ranks by likes, then upvotes, then comments

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::EngagementConfig;
pub use error::{EngagementError, EngagementResult};
pub use infra::{MemoryEngagementRepository, PgEngagementRepository};
pub use presentation::router::{engagement_router, engagement_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
