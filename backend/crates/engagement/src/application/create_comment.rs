//! Create Comment Use Case
//!
//! Stores the comment and bumps the parent post's or reel's
//! `comments_count`. Comments earn no reputation.

use std::sync::Arc;

use kernel::id::CommentId;
use kernel::identity::RequestIdentity;
use platform::clock::Clock;

use crate::application::config::EngagementConfig;
use crate::application::create_post::validate_content;
use crate::domain::entities::{Comment, CommentParent};
use crate::domain::repository::{ContentRepository, CounterStore};
use crate::domain::value_objects::CounterField;
use crate::error::{EngagementError, EngagementResult};

#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    pub parent: CommentParent,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
}

pub struct CreateCommentUseCase<R, C>
where
    R: ContentRepository,
    C: CounterStore,
{
    content: Arc<R>,
    counters: Arc<C>,
    clock: Arc<dyn Clock>,
    config: Arc<EngagementConfig>,
}

impl<R, C> CreateCommentUseCase<R, C>
where
    R: ContentRepository,
    C: CounterStore,
{
    pub fn new(
        content: Arc<R>,
        counters: Arc<C>,
        clock: Arc<dyn Clock>,
        config: Arc<EngagementConfig>,
    ) -> Self {
        Self {
            content,
            counters,
            clock,
            config,
        }
    }

    pub async fn execute(
        &self,
        identity: &RequestIdentity,
        input: CreateCommentInput,
    ) -> EngagementResult<Comment> {
        let author = identity.require_authenticated()?;
        let body = validate_content(&input.content, self.config.max_content_chars)?;

        let parent = input.parent.target();
        if self.content.find_target(&parent).await?.is_none() {
            return Err(EngagementError::TargetNotFound);
        }

        if let Some(reply_to) = input.parent_comment_id {
            let replied = self
                .content
                .find_comment(&reply_to)
                .await?
                .ok_or(EngagementError::TargetNotFound)?;
            // Replies stay within one post or reel
            if replied.parent != input.parent {
                return Err(EngagementError::InvalidInput(
                    "Reply must belong to the same thread".into(),
                ));
            }
        }

        let comment = Comment::new(
            author.user_id,
            body,
            input.parent,
            input.parent_comment_id,
            self.clock.now(),
        );
        self.content.create_comment(&comment).await?;

        self.counters
            .increment_counter(&parent, CounterField::Comments, 1)
            .await?;

        tracing::info!(
            user_id = %author.user_id,
            comment_id = %comment.comment_id,
            parent = %parent,
            "Comment created"
        );

        Ok(comment)
    }
}
