//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! All writes are single-row; nothing here spans a transaction.

use kernel::id::{CommentId, UserId};

use crate::domain::entities::{Comment, EngagementKey, EngagementRecord, Post, Target};
use crate::domain::value_objects::{CounterField, FeedMode, Page, TargetRef};
use crate::error::EngagementResult;

/// Engagement record store keyed on the natural key
#[trait_variant::make(EngagementLedger: Send)]
pub trait LocalEngagementLedger {
    async fn exists(&self, key: &EngagementKey) -> EngagementResult<bool>;

    /// Insert unless a record with the same key exists.
    ///
    /// Returns false when the unique key rejected the row.
    async fn insert_if_absent(&self, record: &EngagementRecord) -> EngagementResult<bool>;

    /// Returns false when there was nothing to delete.
    async fn delete_if_exists(&self, key: &EngagementKey) -> EngagementResult<bool>;
}

/// Atomic increments on denormalized counters and reputation
#[trait_variant::make(CounterStore: Send)]
pub trait LocalCounterStore {
    /// `field` must be one of the target type's counters
    async fn increment_counter(
        &self,
        target: &TargetRef,
        field: CounterField,
        delta: i64,
    ) -> EngagementResult<()>;

    /// No floor: reputation may go negative
    async fn adjust_reputation(&self, user_id: &UserId, delta: i64) -> EngagementResult<()>;
}

/// Content rows
#[trait_variant::make(ContentRepository: Send)]
pub trait LocalContentRepository {
    /// Resolve a live target. Deleted items resolve to `None`.
    async fn find_target(&self, target: &TargetRef) -> EngagementResult<Option<Target>>;

    /// Live comment by id. Deleted comments resolve to `None`.
    async fn find_comment(&self, comment_id: &CommentId) -> EngagementResult<Option<Comment>>;

    async fn create_post(&self, post: &Post) -> EngagementResult<()>;

    async fn create_comment(&self, comment: &Comment) -> EngagementResult<()>;

    /// Non-deleted public posts in feed order
    async fn feed(&self, mode: FeedMode, page: Page) -> EngagementResult<Vec<Post>>;
}
