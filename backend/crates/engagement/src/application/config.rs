//! Application Configuration

use std::time::Duration;

use platform::config::env_duration;

/// Default deadline for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest post or comment body, in characters
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 10_000;

/// Most tags on one post
pub const DEFAULT_MAX_TAGS: usize = 10;

#[derive(Debug, Clone)]
pub struct EngagementConfig {
    /// Deadline applied to every store call
    pub store_timeout: Duration,
    pub max_content_chars: usize,
    pub max_tags: usize,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            max_tags: DEFAULT_MAX_TAGS,
        }
    }
}

impl EngagementConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }

    /// Read `STORE_TIMEOUT`
    pub fn from_env() -> Self {
        Self {
            store_timeout: env_duration("STORE_TIMEOUT", DEFAULT_STORE_TIMEOUT),
            ..Default::default()
        }
    }
}
