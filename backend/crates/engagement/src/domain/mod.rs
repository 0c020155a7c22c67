//! Domain Layer
//!
//! Entities, value objects, projection and ranking rules, repository traits.

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use entities::{Comment, CommentParent, EngagementKey, EngagementRecord, Post, Reel, Target};
pub use repository::{ContentRepository, CounterStore, EngagementLedger};
pub use value_objects::{
    ActionType, CounterField, FeedMode, Page, TargetRef, TargetType, ToggleOutcome, Visibility,
};
