//! Domain Services
//!
//! Pure functions for projection and ranking.

use std::cmp::{Ordering, Reverse};

use kernel::id::UserId;

use crate::domain::entities::{Post, Target};
use crate::domain::value_objects::{ActionType, CounterField, FeedMode, TargetRef, ToggleOutcome};

/// Reputation credited to the author of a new post
pub const POST_CREATION_REPUTATION: i64 = 5;

/// Writes implied by one effective toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub target: TargetRef,
    pub field: CounterField,
    /// +1 or -1
    pub counter_delta: i64,
    pub author_id: UserId,
    /// Zero for actions that carry no reputation
    pub reputation_delta: i64,
}

impl Projection {
    pub fn carries_reputation(&self) -> bool {
        self.reputation_delta != 0
    }
}

/// Net effect of a toggle on counters and author reputation.
///
/// `field` must already be validated against the target type.
pub fn project(
    target: &Target,
    field: CounterField,
    action: ActionType,
    outcome: ToggleOutcome,
) -> Projection {
    let sign = outcome.delta();
    Projection {
        target: target.target,
        field,
        counter_delta: sign,
        author_id: target.author_id,
        reputation_delta: sign * action.reputation_weight(),
    }
}

/// Lexicographic: likes, then upvotes, then comments, all descending
pub fn trending_order(a: &Post, b: &Post) -> Ordering {
    let key = |p: &Post| Reverse((p.likes_count, p.upvotes_count, p.comments_count));
    key(a).cmp(&key(b))
}

/// Newest first
pub fn latest_order(a: &Post, b: &Post) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Stable sort of `posts` for a feed mode
pub fn sort_feed(mode: FeedMode, posts: &mut [Post]) {
    match mode {
        FeedMode::Latest => posts.sort_by(latest_order),
        FeedMode::Trending => posts.sort_by(trending_order),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{TargetType, Visibility};
    use chrono::{Duration, Utc};

    fn post(likes: i64, upvotes: i64, comments: i64) -> Post {
        let mut post = Post::new(
            UserId::new(),
            "hello".into(),
            None,
            None,
            vec![],
            Visibility::Public,
            Utc::now(),
        );
        post.likes_count = likes;
        post.upvotes_count = upvotes;
        post.comments_count = comments;
        post
    }

    #[test]
    fn test_trending_is_lexicographic() {
        let a = post(3, 0, 5);
        let b = post(3, 1, 0);
        let c = post(1, 9, 9);
        let mut posts = vec![a.clone(), c.clone(), b.clone()];

        sort_feed(FeedMode::Trending, &mut posts);

        let ids: Vec<_> = posts.iter().map(|p| p.post_id).collect();
        assert_eq!(ids, vec![b.post_id, a.post_id, c.post_id]);
    }

    #[test]
    fn test_latest_is_newest_first() {
        let now = Utc::now();
        let mut older = post(9, 9, 9);
        older.created_at = now - Duration::minutes(5);
        let mut newer = post(0, 0, 0);
        newer.created_at = now;

        let mut posts = vec![older.clone(), newer.clone()];
        sort_feed(FeedMode::Latest, &mut posts);
        assert_eq!(posts[0].post_id, newer.post_id);
    }

    #[test]
    fn test_projection() {
        let target = Target {
            target: TargetRef::new(TargetType::Post, uuid::Uuid::new_v4()),
            author_id: UserId::new(),
        };

        let added = project(&target, CounterField::Upvotes, ActionType::Upvote, ToggleOutcome::Added);
        assert_eq!(added.counter_delta, 1);
        assert_eq!(added.reputation_delta, 2);

        let removed = project(&target, CounterField::Likes, ActionType::Like, ToggleOutcome::Removed);
        assert_eq!(removed.counter_delta, -1);
        assert_eq!(removed.reputation_delta, -1);

        let viewed = project(&target, CounterField::Views, ActionType::View, ToggleOutcome::Added);
        assert!(!viewed.carries_reputation());
    }
}
