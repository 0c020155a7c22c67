//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_comment;
pub mod create_post;
pub mod feed;
pub mod projector;
pub mod toggle_engagement;

// Re-exports
pub use config::EngagementConfig;
pub use create_comment::{CreateCommentInput, CreateCommentUseCase};
pub use create_post::{CreatePostInput, CreatePostUseCase};
pub use feed::{FeedQuery, FeedUseCase};
pub use projector::CounterProjector;
pub use toggle_engagement::{ToggleEngagementInput, ToggleEngagementUseCase};
