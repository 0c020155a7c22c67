//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, ReelId, UserId};

use crate::domain::value_objects::{ActionType, TargetRef, TargetType, Visibility};

/// Microblog post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub code_snippet: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub likes_count: i64,
    pub comments_count: i64,
    pub views_count: i64,
    pub upvotes_count: i64,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// New post with zeroed counters
    pub fn new(
        author_id: UserId,
        content: String,
        code_snippet: Option<String>,
        language: Option<String>,
        tags: Vec<String>,
        visibility: Visibility,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            post_id: PostId::new(),
            author_id,
            content,
            code_snippet,
            language,
            tags,
            visibility,
            likes_count: 0,
            comments_count: 0,
            views_count: 0,
            upvotes_count: 0,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Listed in feeds
    pub fn is_listed(&self) -> bool {
        !self.deleted && self.visibility == Visibility::Public
    }
}

/// Short video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reel {
    pub reel_id: ReelId,
    pub author_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub visibility: Visibility,
    pub likes_count: i64,
    pub comments_count: i64,
    pub views_count: i64,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parent content of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent {
    Post(PostId),
    Reel(ReelId),
}

impl CommentParent {
    pub fn target(&self) -> TargetRef {
        match self {
            CommentParent::Post(id) => TargetRef::post(*id),
            CommentParent::Reel(id) => TargetRef::reel(*id),
        }
    }

    pub fn post_id(&self) -> Option<PostId> {
        match self {
            CommentParent::Post(id) => Some(*id),
            CommentParent::Reel(_) => None,
        }
    }

    pub fn reel_id(&self) -> Option<ReelId> {
        match self {
            CommentParent::Reel(id) => Some(*id),
            CommentParent::Post(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: CommentId,
    pub author_id: UserId,
    pub content: String,
    pub parent: CommentParent,
    /// Reply target within the same thread
    pub parent_comment_id: Option<CommentId>,
    pub likes_count: i64,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        author_id: UserId,
        content: String,
        parent: CommentParent,
        parent_comment_id: Option<CommentId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            comment_id: CommentId::new(),
            author_id,
            content,
            parent,
            parent_comment_id,
            likes_count: 0,
            deleted: false,
            created_at: now,
        }
    }
}

/// A live, non-deleted content item as seen by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub target: TargetRef,
    pub author_id: UserId,
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        self.target.target_type
    }
}

/// Idempotence key: at most one record per (actor, target, action)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngagementKey {
    pub actor_id: UserId,
    pub target: TargetRef,
    pub action: ActionType,
}

/// Existence of the record is the fact; it is never updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementRecord {
    pub key: EngagementKey,
    pub created_at: DateTime<Utc>,
}
