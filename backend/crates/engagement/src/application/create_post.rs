//! Create Post Use Case
//!
//! Stores the post and credits its author a fixed reputation award. The
//! award does not go through the ledger.

use std::sync::Arc;

use kernel::identity::RequestIdentity;
use platform::clock::Clock;

use crate::application::config::EngagementConfig;
use crate::domain::entities::Post;
use crate::domain::repository::{ContentRepository, CounterStore};
use crate::domain::services::POST_CREATION_REPUTATION;
use crate::domain::value_objects::Visibility;
use crate::error::{EngagementError, EngagementResult};

#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub content: String,
    pub code_snippet: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    /// Defaults to public
    pub visibility: Option<Visibility>,
}

pub struct CreatePostUseCase<R, C>
where
    R: ContentRepository,
    C: CounterStore,
{
    content: Arc<R>,
    counters: Arc<C>,
    clock: Arc<dyn Clock>,
    config: Arc<EngagementConfig>,
}

impl<R, C> CreatePostUseCase<R, C>
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
        input: CreatePostInput,
    ) -> EngagementResult<Post> {
        let author = identity.require_authenticated()?;

        let content = validate_content(&input.content, self.config.max_content_chars)?;
        let tags = normalize_tags(input.tags);
        if tags.len() > self.config.max_tags {
            return Err(EngagementError::InvalidInput(format!(
                "At most {} tags are allowed",
                self.config.max_tags
            )));
        }

        let post = Post::new(
            author.user_id,
            content,
            non_blank(input.code_snippet),
            non_blank(input.language),
            tags,
            input.visibility.unwrap_or_default(),
            self.clock.now(),
        );
        self.content.create_post(&post).await?;

        self.counters
            .adjust_reputation(&author.user_id, POST_CREATION_REPUTATION)
            .await?;

        tracing::info!(
            user_id = %author.user_id,
            post_id = %post.post_id,
            visibility = post.visibility.as_str(),
            "Post created"
        );

        Ok(post)
    }
}

/// Trimmed body; empty or oversized bodies are rejected
pub(crate) fn validate_content(content: &str, max_chars: usize) -> EngagementResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(EngagementError::InvalidInput("Content cannot be empty".into()));
    }
    if content.chars().count() > max_chars {
        return Err(EngagementError::InvalidInput(format!(
            "Content must be at most {max_chars} characters"
        )));
    }
    Ok(content.to_string())
}

/// Trimmed, blank-free, first occurrence wins
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.iter().any(|t: &String| t == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
