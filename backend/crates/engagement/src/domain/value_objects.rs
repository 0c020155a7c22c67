//! Domain Value Objects
//!
//! Closed vocabularies for targets, actions and counters. SQL column and
//! table names are derived from these enums only.

use std::fmt;
use std::str::FromStr;

use kernel::id::{CommentId, PostId, ReelId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of content an engagement points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Post,
    Reel,
    Comment,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Post => "POST",
            TargetType::Reel => "REEL",
            TargetType::Comment => "COMMENT",
        }
    }

    /// Counters carried by this content type
    pub fn counters(&self) -> &'static [CounterField] {
        match self {
            TargetType::Post => &[
                CounterField::Likes,
                CounterField::Comments,
                CounterField::Views,
                CounterField::Upvotes,
            ],
            TargetType::Reel => &[
                CounterField::Likes,
                CounterField::Comments,
                CounterField::Views,
            ],
            TargetType::Comment => &[CounterField::Likes],
        }
    }

    pub fn has_counter(&self, field: CounterField) -> bool {
        self.counters().contains(&field)
    }

    /// Counter an action moves on this type, `None` when unsupported
    pub fn counter_for(&self, action: ActionType) -> Option<CounterField> {
        let field = action.counter();
        self.has_counter(field).then_some(field)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POST" => Ok(TargetType::Post),
            "REEL" => Ok(TargetType::Reel),
            "COMMENT" => Ok(TargetType::Comment),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A discrete user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Like,
    View,
    Upvote,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Like => "LIKE",
            ActionType::View => "VIEW",
            ActionType::Upvote => "UPVOTE",
        }
    }

    pub fn counter(&self) -> CounterField {
        match self {
            ActionType::Like => CounterField::Likes,
            ActionType::View => CounterField::Views,
            ActionType::Upvote => CounterField::Upvotes,
        }
    }

    /// Reputation the target's author gains per active record
    pub fn reputation_weight(&self) -> i64 {
        match self {
            ActionType::Like => 1,
            ActionType::Upvote => 2,
            ActionType::View => 0,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(ActionType::Like),
            "VIEW" => Ok(ActionType::View),
            "UPVOTE" => Ok(ActionType::Upvote),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Denormalized counter column on a content row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterField {
    Likes,
    Comments,
    Views,
    Upvotes,
}

impl CounterField {
    pub fn column(&self) -> &'static str {
        match self {
            CounterField::Likes => "likes_count",
            CounterField::Comments => "comments_count",
            CounterField::Views => "views_count",
            CounterField::Upvotes => "upvotes_count",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Polymorphic reference to a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub target_type: TargetType,
    pub target_id: Uuid,
}

impl TargetRef {
    pub fn new(target_type: TargetType, target_id: Uuid) -> Self {
        Self {
            target_type,
            target_id,
        }
    }

    pub fn post(id: PostId) -> Self {
        Self::new(TargetType::Post, id.into_uuid())
    }

    pub fn reel(id: ReelId) -> Self {
        Self::new(TargetType::Reel, id.into_uuid())
    }

    pub fn comment(id: CommentId) -> Self {
        Self::new(TargetType::Comment, id.into_uuid())
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target_type, self.target_id)
    }
}

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    /// Sign applied to counters and reputation
    pub fn delta(&self) -> i64 {
        match self {
            ToggleOutcome::Added => 1,
            ToggleOutcome::Removed => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedMode {
    /// Newest first
    #[default]
    Latest,
    /// Likes, then upvotes, then comments, all descending
    Trending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl FromStr for Visibility {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Validated feed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    /// `None` when `limit` is outside `1..=MAX_LIMIT`
    pub fn new(limit: u32, offset: u32) -> Option<Self> {
        (1..=Self::MAX_LIMIT)
            .contains(&limit)
            .then_some(Self { limit, offset })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
