//! Refresh Token Entity
//!
//! Opaque, single-use token exchanged for a new token pair. Only the
//! SHA-256 of the token is stored. Tokens descending from one login share a
//! family and are revoked together on reuse or logout.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{RefreshTokenId, UserId};
use platform::crypto;
use uuid::Uuid;

/// Random bytes in a refresh token
const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token_id: RefreshTokenId,
    pub user_id: UserId,
    pub family_id: Uuid,
    /// Lowercase hex SHA-256 of the plaintext token
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    /// Fixed at issuance
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshToken {
    /// Mint a token. Returns the entity and the plaintext handed to the client.
    ///
    /// `family_id` is `None` for a fresh login and the parent's family on
    /// rotation.
    pub fn issue(
        user_id: UserId,
        family_id: Option<Uuid>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> (Self, String) {
        let plaintext = crypto::random_token(REFRESH_TOKEN_BYTES);
        let token = Self {
            token_id: RefreshTokenId::new(),
            user_id,
            family_id: family_id.unwrap_or_else(Uuid::new_v4),
            token_hash: Self::hash(&plaintext),
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
        };
        (token, plaintext)
    }

    /// Storage form of a presented token
    pub fn hash(plaintext: &str) -> String {
        crypto::sha256_hex(plaintext.as_bytes())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_hashes_plaintext() {
        let now = Utc::now();
        let (token, plaintext) = RefreshToken::issue(UserId::new(), None, Duration::hours(168), now);
        assert_eq!(token.token_hash, RefreshToken::hash(&plaintext));
        assert_ne!(token.token_hash, plaintext);
        assert_eq!(token.expires_at, now + Duration::hours(168));
        assert!(!token.revoked);
    }

    #[test]
    fn test_rotation_keeps_family() {
        let now = Utc::now();
        let user_id = UserId::new();
        let (first, _) = RefreshToken::issue(user_id, None, Duration::hours(1), now);
        let (second, _) = RefreshToken::issue(user_id, Some(first.family_id), Duration::hours(1), now);
        assert_eq!(first.family_id, second.family_id);
        assert_ne!(first.token_hash, second.token_hash);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let (token, _) = RefreshToken::issue(UserId::new(), None, Duration::seconds(10), now);
        assert!(!token.is_expired_at(now + Duration::seconds(9)));
        assert!(token.is_expired_at(now + Duration::seconds(10)));
    }
}
