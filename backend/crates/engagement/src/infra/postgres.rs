//! PostgreSQL Repository Implementations

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, ReelId, UserId};
use platform::deadline::with_deadline;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    Comment, CommentParent, EngagementKey, EngagementRecord, Post, Target,
};
use crate::domain::repository::{ContentRepository, CounterStore, EngagementLedger};
use crate::domain::value_objects::{CounterField, FeedMode, Page, TargetRef, TargetType, Visibility};
use crate::error::{EngagementError, EngagementResult};

/// Table and primary key column of a target type
fn target_table(target_type: TargetType) -> (&'static str, &'static str) {
    match target_type {
        TargetType::Post => ("posts", "post_id"),
        TargetType::Reel => ("reels", "reel_id"),
        TargetType::Comment => ("comments", "comment_id"),
    }
}

/// PostgreSQL-backed engagement repository
#[derive(Clone)]
pub struct PgEngagementRepository {
    pool: PgPool,
    store_timeout: Duration,
}

impl PgEngagementRepository {
    pub fn new(pool: PgPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// Run one store call under the configured deadline
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> EngagementResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        Ok(with_deadline(operation, self.store_timeout, async {
            fut.await.map_err(EngagementError::from)
        })
        .await?)
    }
}

// ============================================================================
// Engagement Ledger Implementation
// ============================================================================

impl EngagementLedger for PgEngagementRepository {
    async fn exists(&self, key: &EngagementKey) -> EngagementResult<bool> {
        self.bounded(
            "engagements.exists",
            sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM engagements
                    WHERE actor_id = $1 AND target_type = $2 AND target_id = $3 AND action_type = $4
                )
                "#,
            )
            .bind(key.actor_id.as_uuid())
            .bind(key.target.target_type.as_str())
            .bind(key.target.target_id)
            .bind(key.action.as_str())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn insert_if_absent(&self, record: &EngagementRecord) -> EngagementResult<bool> {
        let key = &record.key;
        let result = self
            .bounded(
                "engagements.insert",
                sqlx::query(
                    r#"
                    INSERT INTO engagements (actor_id, target_type, target_id, action_type, created_at)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (actor_id, target_type, target_id, action_type) DO NOTHING
                    "#,
                )
                .bind(key.actor_id.as_uuid())
                .bind(key.target.target_type.as_str())
                .bind(key.target.target_id)
                .bind(key.action.as_str())
                .bind(record.created_at)
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_if_exists(&self, key: &EngagementKey) -> EngagementResult<bool> {
        let result = self
            .bounded(
                "engagements.delete",
                sqlx::query(
                    r#"
                    DELETE FROM engagements
                    WHERE actor_id = $1 AND target_type = $2 AND target_id = $3 AND action_type = $4
                    "#,
                )
                .bind(key.actor_id.as_uuid())
                .bind(key.target.target_type.as_str())
                .bind(key.target.target_id)
                .bind(key.action.as_str())
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Counter Store Implementation
// ============================================================================

impl CounterStore for PgEngagementRepository {
    async fn increment_counter(
        &self,
        target: &TargetRef,
        field: CounterField,
        delta: i64,
    ) -> EngagementResult<()> {
        let (table, id_column) = target_table(target.target_type);
        if !target.target_type.has_counter(field) {
            return Err(EngagementError::PersistenceFailure(format!(
                "{table} has no {} column",
                field.column()
            )));
        }

        // Identifiers come from closed enums only
        let column = field.column();
        let sql = format!("UPDATE {table} SET {column} = {column} + $2 WHERE {id_column} = $1");

        self.bounded(
            "content.increment_counter",
            sqlx::query(&sql)
                .bind(target.target_id)
                .bind(delta)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn adjust_reputation(&self, user_id: &UserId, delta: i64) -> EngagementResult<()> {
        self.bounded(
            "users.adjust_reputation",
            sqlx::query("UPDATE users SET reputation = reputation + $2 WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .bind(delta)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

// ============================================================================
// Content Repository Implementation
// ============================================================================

impl ContentRepository for PgEngagementRepository {
    async fn find_target(&self, target: &TargetRef) -> EngagementResult<Option<Target>> {
        let (table, id_column) = target_table(target.target_type);
        let sql = format!("SELECT author_id FROM {table} WHERE {id_column} = $1 AND deleted = false");

        let author_id = self
            .bounded(
                "content.find_target",
                sqlx::query_scalar::<_, Uuid>(&sql)
                    .bind(target.target_id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(author_id.map(|author_id| Target {
            target: *target,
            author_id: UserId::from_uuid(author_id),
        }))
    }

    async fn find_comment(&self, comment_id: &CommentId) -> EngagementResult<Option<Comment>> {
        let row = self
            .bounded(
                "comments.find",
                sqlx::query_as::<_, CommentRow>(
                    r#"
                    SELECT
                        comment_id,
                        author_id,
                        content,
                        post_id,
                        reel_id,
                        parent_comment_id,
                        likes_count,
                        deleted,
                        created_at
                    FROM comments
                    WHERE comment_id = $1 AND deleted = false
                    "#,
                )
                .bind(comment_id.as_uuid())
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(CommentRow::into_comment).transpose()
    }

    async fn create_post(&self, post: &Post) -> EngagementResult<()> {
        self.bounded(
            "posts.create",
            sqlx::query(
                r#"
                INSERT INTO posts (
                    post_id,
                    author_id,
                    content,
                    code_snippet,
                    language,
                    tags,
                    visibility,
                    likes_count,
                    comments_count,
                    views_count,
                    upvotes_count,
                    deleted,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(post.post_id.as_uuid())
            .bind(post.author_id.as_uuid())
            .bind(&post.content)
            .bind(&post.code_snippet)
            .bind(&post.language)
            .bind(&post.tags)
            .bind(post.visibility.as_str())
            .bind(post.likes_count)
            .bind(post.comments_count)
            .bind(post.views_count)
            .bind(post.upvotes_count)
            .bind(post.deleted)
            .bind(post.created_at)
            .bind(post.updated_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn create_comment(&self, comment: &Comment) -> EngagementResult<()> {
        self.bounded(
            "comments.create",
            sqlx::query(
                r#"
                INSERT INTO comments (
                    comment_id,
                    author_id,
                    content,
                    post_id,
                    reel_id,
                    parent_comment_id,
                    likes_count,
                    deleted,
                    created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(comment.comment_id.as_uuid())
            .bind(comment.author_id.as_uuid())
            .bind(&comment.content)
            .bind(comment.parent.post_id().map(|id| id.into_uuid()))
            .bind(comment.parent.reel_id().map(|id| id.into_uuid()))
            .bind(comment.parent_comment_id.map(|id| id.into_uuid()))
            .bind(comment.likes_count)
            .bind(comment.deleted)
            .bind(comment.created_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn feed(&self, mode: FeedMode, page: Page) -> EngagementResult<Vec<Post>> {
        let order_by = match mode {
            FeedMode::Latest => "created_at DESC, post_id",
            FeedMode::Trending => {
                "likes_count DESC, upvotes_count DESC, comments_count DESC, created_at DESC"
            }
        };
        let sql = format!(
            r#"
            SELECT
                post_id,
                author_id,
                content,
                code_snippet,
                language,
                tags,
                visibility,
                likes_count,
                comments_count,
                views_count,
                upvotes_count,
                deleted,
                created_at,
                updated_at
            FROM posts
            WHERE deleted = false AND visibility = 'PUBLIC'
            ORDER BY {order_by}
            LIMIT $1 OFFSET $2
            "#
        );

        let rows = self
            .bounded(
                "posts.feed",
                sqlx::query_as::<_, PostRow>(&sql)
                    .bind(i64::from(page.limit()))
                    .bind(i64::from(page.offset()))
                    .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(PostRow::into_post).collect()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    author_id: Uuid,
    content: String,
    code_snippet: Option<String>,
    language: Option<String>,
    tags: Vec<String>,
    visibility: String,
    likes_count: i64,
    comments_count: i64,
    views_count: i64,
    upvotes_count: i64,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> EngagementResult<Post> {
        let visibility: Visibility = self
            .visibility
            .parse()
            .map_err(|e| EngagementError::PersistenceFailure(format!("posts.visibility: {e}")))?;

        Ok(Post {
            post_id: PostId::from_uuid(self.post_id),
            author_id: UserId::from_uuid(self.author_id),
            content: self.content,
            code_snippet: self.code_snippet,
            language: self.language,
            tags: self.tags,
            visibility,
            likes_count: self.likes_count,
            comments_count: self.comments_count,
            views_count: self.views_count,
            upvotes_count: self.upvotes_count,
            deleted: self.deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    author_id: Uuid,
    content: String,
    post_id: Option<Uuid>,
    reel_id: Option<Uuid>,
    parent_comment_id: Option<Uuid>,
    likes_count: i64,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> EngagementResult<Comment> {
        let parent = match (self.post_id, self.reel_id) {
            (Some(post_id), None) => CommentParent::Post(PostId::from_uuid(post_id)),
            (None, Some(reel_id)) => CommentParent::Reel(ReelId::from_uuid(reel_id)),
            _ => {
                return Err(EngagementError::PersistenceFailure(format!(
                    "comment {} has no single parent",
                    self.comment_id
                )));
            }
        };

        Ok(Comment {
            comment_id: CommentId::from_uuid(self.comment_id),
            author_id: UserId::from_uuid(self.author_id),
            content: self.content,
            parent,
            parent_comment_id: self.parent_comment_id.map(CommentId::from_uuid),
            likes_count: self.likes_count,
            deleted: self.deleted,
            created_at: self.created_at,
        })
    }
}
