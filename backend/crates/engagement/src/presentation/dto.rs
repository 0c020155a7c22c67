//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, ReelId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{CreateCommentInput, CreatePostInput, FeedQuery, ToggleEngagementInput};
use crate::domain::entities::{Comment, CommentParent, Post};
use crate::domain::value_objects::{ActionType, FeedMode, TargetType, ToggleOutcome, Visibility};
use crate::error::{EngagementError, EngagementResult};

// ============================================================================
// Toggle
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub action: ActionType,
}

impl From<ToggleRequest> for ToggleEngagementInput {
    fn from(req: ToggleRequest) -> Self {
        Self {
            target_type: req.target_type,
            target_id: req.target_id,
            action: req.action,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub outcome: ToggleOutcome,
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    pub code_snippet: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub visibility: Option<Visibility>,
}

impl From<CreatePostRequest> for CreatePostInput {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            content: req.content,
            code_snippet: req.code_snippet,
            language: req.language,
            tags: req.tags,
            visibility: req.visibility,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: PostId,
    pub author_id: Uuid,
    pub content: String,
    pub code_snippet: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub likes_count: i64,
    pub comments_count: i64,
    pub views_count: i64,
    pub upvotes_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id,
            author_id: post.author_id.into_uuid(),
            content: post.content,
            code_snippet: post.code_snippet,
            language: post.language,
            tags: post.tags,
            visibility: post.visibility,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            views_count: post.views_count,
            upvotes_count: post.upvotes_count,
            created_at: post.created_at,
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

/// Exactly one of `post_id` and `reel_id` names the parent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Option<PostId>,
    pub reel_id: Option<ReelId>,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
}

impl TryFrom<CreateCommentRequest> for CreateCommentInput {
    type Error = EngagementError;

    fn try_from(req: CreateCommentRequest) -> EngagementResult<Self> {
        let parent = match (req.post_id, req.reel_id) {
            (Some(post_id), None) => CommentParent::Post(post_id),
            (None, Some(reel_id)) => CommentParent::Reel(reel_id),
            _ => {
                return Err(EngagementError::InvalidInput(
                    "Exactly one of postId and reelId is required".into(),
                ));
            }
        };

        Ok(Self {
            parent,
            parent_comment_id: req.parent_comment_id,
            content: req.content,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: CommentId,
    pub author_id: Uuid,
    pub post_id: Option<PostId>,
    pub reel_id: Option<ReelId>,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            comment_id: comment.comment_id,
            author_id: comment.author_id.into_uuid(),
            post_id: comment.parent.post_id(),
            reel_id: comment.parent.reel_id(),
            parent_comment_id: comment.parent_comment_id,
            content: comment.content,
            likes_count: comment.likes_count,
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Feed
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    #[serde(default)]
    pub mode: FeedMode,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<FeedParams> for FeedQuery {
    fn from(params: FeedParams) -> Self {
        Self {
            mode: params.mode,
            limit: params.limit,
            offset: params.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_request_wire_format() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"targetType":"POST","targetId":"{id}","action":"UPVOTE"}}"#);
        let req: ToggleRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.target_type, TargetType::Post);
        assert_eq!(req.action, ActionType::Upvote);
        assert_eq!(req.target_id, id);
    }

    #[test]
    fn test_toggle_response_wire_format() {
        let json = serde_json::to_string(&ToggleResponse {
            outcome: ToggleOutcome::Removed,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"REMOVED"}"#);
    }

    #[test]
    fn test_comment_request_needs_exactly_one_parent() {
        let both = CreateCommentRequest {
            post_id: Some(PostId::new()),
            reel_id: Some(ReelId::new()),
            parent_comment_id: None,
            content: "hi".into(),
        };
        assert!(CreateCommentInput::try_from(both).is_err());

        let neither = CreateCommentRequest {
            post_id: None,
            reel_id: None,
            parent_comment_id: None,
            content: "hi".into(),
        };
        assert!(CreateCommentInput::try_from(neither).is_err());

        let reel_id = ReelId::new();
        let on_reel = CreateCommentRequest {
            post_id: None,
            reel_id: Some(reel_id),
            parent_comment_id: None,
            content: "hi".into(),
        };
        let input = CreateCommentInput::try_from(on_reel).unwrap();
        assert_eq!(input.parent, CommentParent::Reel(reel_id));
    }

    #[test]
    fn test_feed_params_default_to_latest() {
        let params: FeedParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.mode, FeedMode::Latest);
        assert!(params.limit.is_none());
    }
}
