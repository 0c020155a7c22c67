//! Feed Use Case
//!
//! Public, non-deleted posts. Anonymous callers may read.

use std::sync::Arc;

use crate::domain::entities::Post;
use crate::domain::repository::ContentRepository;
use crate::domain::value_objects::{FeedMode, Page};
use crate::error::{EngagementError, EngagementResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedQuery {
    pub mode: FeedMode,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub struct FeedUseCase<R>
where
    R: ContentRepository,
{
    content: Arc<R>,
}

impl<R> FeedUseCase<R>
where
    R: ContentRepository,
{
    pub fn new(content: Arc<R>) -> Self {
        Self { content }
    }

    pub async fn execute(&self, query: FeedQuery) -> EngagementResult<Vec<Post>> {
        let page = Page::new(
            query.limit.unwrap_or(Page::DEFAULT_LIMIT),
            query.offset.unwrap_or(0),
        )
        .ok_or_else(|| {
            EngagementError::InvalidInput(format!("limit must be between 1 and {}", Page::MAX_LIMIT))
        })?;

        self.content.feed(query.mode, page).await
    }
}
