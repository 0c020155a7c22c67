//! In-memory repository
//!
//! Backs tests and local runs. Each trait method takes the lock once, so
//! every call is atomic on its own, the same granularity Postgres gives a
//! single statement.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::{CommentId, PostId, ReelId, UserId};
use uuid::Uuid;

use crate::domain::entities::{Comment, EngagementKey, EngagementRecord, Post, Reel, Target};
use crate::domain::repository::{ContentRepository, CounterStore, EngagementLedger};
use crate::domain::services::sort_feed;
use crate::domain::value_objects::{
    ActionType, CounterField, FeedMode, Page, TargetRef, TargetType,
};
use crate::error::{EngagementError, EngagementResult};

#[derive(Default)]
struct State {
    posts: HashMap<PostId, Post>,
    reels: HashMap<ReelId, Reel>,
    comments: HashMap<CommentId, Comment>,
    engagements: HashSet<EngagementKey>,
    reputation: HashMap<UserId, i64>,
}

impl State {
    fn counter_mut(&mut self, target: &TargetRef, field: CounterField) -> Option<&mut i64> {
        match target.target_type {
            TargetType::Post => {
                let post = self.posts.get_mut(&PostId::from_uuid(target.target_id))?;
                match field {
                    CounterField::Likes => Some(&mut post.likes_count),
                    CounterField::Comments => Some(&mut post.comments_count),
                    CounterField::Views => Some(&mut post.views_count),
                    CounterField::Upvotes => Some(&mut post.upvotes_count),
                }
            }
            TargetType::Reel => {
                let reel = self.reels.get_mut(&ReelId::from_uuid(target.target_id))?;
                match field {
                    CounterField::Likes => Some(&mut reel.likes_count),
                    CounterField::Comments => Some(&mut reel.comments_count),
                    CounterField::Views => Some(&mut reel.views_count),
                    CounterField::Upvotes => None,
                }
            }
            TargetType::Comment => {
                let comment = self
                    .comments
                    .get_mut(&CommentId::from_uuid(target.target_id))?;
                match field {
                    CounterField::Likes => Some(&mut comment.likes_count),
                    _ => None,
                }
            }
        }
    }

    fn live_author(&self, target: &TargetRef) -> Option<UserId> {
        match target.target_type {
            TargetType::Post => self
                .posts
                .get(&PostId::from_uuid(target.target_id))
                .filter(|p| !p.deleted)
                .map(|p| p.author_id),
            TargetType::Reel => self
                .reels
                .get(&ReelId::from_uuid(target.target_id))
                .filter(|r| !r.deleted)
                .map(|r| r.author_id),
            TargetType::Comment => self
                .comments
                .get(&CommentId::from_uuid(target.target_id))
                .filter(|c| !c.deleted)
                .map(|c| c.author_id),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryEngagementRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryEngagementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reels are created elsewhere; seed one directly
    pub fn insert_reel(&self, reel: Reel) {
        self.state().reels.insert(reel.reel_id, reel);
    }

    pub fn post(&self, post_id: &PostId) -> Option<Post> {
        self.state().posts.get(post_id).cloned()
    }

    pub fn reel(&self, reel_id: &ReelId) -> Option<Reel> {
        self.state().reels.get(reel_id).cloned()
    }

    pub fn comment(&self, comment_id: &CommentId) -> Option<Comment> {
        self.state().comments.get(comment_id).cloned()
    }

    /// Users never credited or debited read as zero
    pub fn reputation(&self, user_id: &UserId) -> i64 {
        self.state().reputation.get(user_id).copied().unwrap_or(0)
    }

    /// Ledger records for one target and action across all actors
    pub fn record_count(&self, target: &TargetRef, action: ActionType) -> usize {
        self.state()
            .engagements
            .iter()
            .filter(|k| k.target == *target && k.action == action)
            .count()
    }

    pub fn has_record(&self, key: &EngagementKey) -> bool {
        self.state().engagements.contains(key)
    }

    /// Soft-delete a content item. Returns false when it does not exist.
    pub fn mark_deleted(&self, target: &TargetRef) -> bool {
        let mut state = self.state();
        let id: Uuid = target.target_id;
        let deleted = match target.target_type {
            TargetType::Post => state.posts.get_mut(&PostId::from_uuid(id)).map(|p| &mut p.deleted),
            TargetType::Reel => state.reels.get_mut(&ReelId::from_uuid(id)).map(|r| &mut r.deleted),
            TargetType::Comment => state
                .comments
                .get_mut(&CommentId::from_uuid(id))
                .map(|c| &mut c.deleted),
        };
        match deleted {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Engagement Ledger Implementation
// ============================================================================

impl EngagementLedger for MemoryEngagementRepository {
    async fn exists(&self, key: &EngagementKey) -> EngagementResult<bool> {
        Ok(self.state().engagements.contains(key))
    }

    async fn insert_if_absent(&self, record: &EngagementRecord) -> EngagementResult<bool> {
        Ok(self.state().engagements.insert(record.key))
    }

    async fn delete_if_exists(&self, key: &EngagementKey) -> EngagementResult<bool> {
        Ok(self.state().engagements.remove(key))
    }
}

// ============================================================================
// Counter Store Implementation
// ============================================================================

impl CounterStore for MemoryEngagementRepository {
    async fn increment_counter(
        &self,
        target: &TargetRef,
        field: CounterField,
        delta: i64,
    ) -> EngagementResult<()> {
        if !target.target_type.has_counter(field) {
            return Err(EngagementError::PersistenceFailure(format!(
                "{} has no {} counter",
                target.target_type,
                field.column()
            )));
        }

        // Postgres updates zero rows for a missing id; mirror that
        if let Some(counter) = self.state().counter_mut(target, field) {
            *counter += delta;
        }
        Ok(())
    }

    async fn adjust_reputation(&self, user_id: &UserId, delta: i64) -> EngagementResult<()> {
        *self.state().reputation.entry(*user_id).or_insert(0) += delta;
        Ok(())
    }
}

// ============================================================================
// Content Repository Implementation
// ============================================================================

impl ContentRepository for MemoryEngagementRepository {
    async fn find_target(&self, target: &TargetRef) -> EngagementResult<Option<Target>> {
        Ok(self.state().live_author(target).map(|author_id| Target {
            target: *target,
            author_id,
        }))
    }

    async fn find_comment(&self, comment_id: &CommentId) -> EngagementResult<Option<Comment>> {
        Ok(self
            .state()
            .comments
            .get(comment_id)
            .filter(|c| !c.deleted)
            .cloned())
    }

    async fn create_post(&self, post: &Post) -> EngagementResult<()> {
        self.state().posts.insert(post.post_id, post.clone());
        Ok(())
    }

    async fn create_comment(&self, comment: &Comment) -> EngagementResult<()> {
        self.state()
            .comments
            .insert(comment.comment_id, comment.clone());
        Ok(())
    }

    async fn feed(&self, mode: FeedMode, page: Page) -> EngagementResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .state()
            .posts
            .values()
            .filter(|p| p.is_listed())
            .cloned()
            .collect();
        sort_feed(mode, &mut posts);

        Ok(posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}
