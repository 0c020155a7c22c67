//! User Name Value Object
//!
//! The public handle of an account, used for display and in token claims.
//!
//! ## Rules
//! - NFKC normalized and trimmed, then validated
//! - Case is preserved and significant: `Alice` and `alice` are different
//! - 3 to 39 ASCII characters from `A-Z a-z 0-9 _ . -`
//! - Starts and ends with a letter or digit
//! - No consecutive dots
//! - Locally chosen names may not be reserved words (compared
//!   case-insensitively); provider logins skip that check

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters), same as GitHub logins
pub const USER_NAME_MAX_LENGTH: usize = 39;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "moderator",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "signup",
    "oauth",
    "callback",
    "me",
    "settings",
    "feed",
    "null",
    "undefined",
    "anonymous",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    Empty,
    TooShort { length: usize, min: usize },
    TooLong { length: usize, max: usize },
    InvalidCharacter { char: char, position: usize },
    InvalidBoundary { char: char },
    ConsecutiveDots,
    Reserved { word: String },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User name cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "User name must be at least {min} characters (got {length})")
            }
            Self::TooLong { length, max } => {
                write!(f, "User name must be at most {max} characters (got {length})")
            }
            Self::InvalidCharacter { char, position } => write!(
                f,
                "User name contains invalid character '{char}' at position {position}"
            ),
            Self::InvalidBoundary { char } => {
                write!(f, "User name must start and end with a letter or digit (found '{char}')")
            }
            Self::ConsecutiveDots => write!(f, "User name cannot contain consecutive dots (..)"),
            Self::Reserved { word } => write!(f, "'{word}' is a reserved user name"),
        }
    }
}

impl std::error::Error for UserNameError {}

/// Validated user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// User name chosen at signup
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let name = Self::normalize(input.as_ref());
        Self::validate(&name)?;

        let folded = name.to_ascii_lowercase();
        if RESERVED_WORDS.contains(&folded.as_str()) {
            return Err(UserNameError::Reserved { word: name });
        }
        Ok(Self(name))
    }

    /// Login reported by an external identity provider
    pub fn from_provider(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let name = Self::normalize(input.as_ref());
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    fn validate(name: &str) -> Result<(), UserNameError> {
        let length = name.chars().count();
        if length == 0 {
            return Err(UserNameError::Empty);
        }
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        for (position, ch) in name.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&ch)) {
                return Err(UserNameError::InvalidCharacter { char: ch, position });
            }
        }

        // Non-empty and all ASCII past this point
        for ch in [name.chars().next(), name.chars().next_back()]
            .into_iter()
            .flatten()
        {
            if !ch.is_ascii_alphanumeric() {
                return Err(UserNameError::InvalidBoundary { char: ch });
            }
        }

        if name.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = UserName::new("  alice  ").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_case_is_preserved() {
            let upper = UserName::new("Alice").unwrap();
            let lower = UserName::new("alice").unwrap();
            assert_eq!(upper.as_str(), "Alice");
            assert_ne!(upper, lower);
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) becomes ASCII 'A'
            let name = UserName::new("Ａlice").unwrap();
            assert_eq!(name.as_str(), "Alice");
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert_eq!(UserName::new("   "), Err(UserNameError::Empty));
        }

        #[test]
        fn test_too_short() {
            assert_eq!(
                UserName::new("ab"),
                Err(UserNameError::TooShort { length: 2, min: 3 })
            );
        }

        #[test]
        fn test_bounds() {
            assert!(UserName::new("abc").is_ok());
            assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
            assert!(matches!(
                UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
                Err(UserNameError::TooLong { .. })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_allowed_specials() {
            assert!(UserName::new("alice_bob").is_ok());
            assert!(UserName::new("alice.bob").is_ok());
            assert!(UserName::new("alice-bob").is_ok());
        }

        #[test]
        fn test_invalid_characters() {
            assert!(matches!(
                UserName::new("alice@bob"),
                Err(UserNameError::InvalidCharacter { char: '@', .. })
            ));
            assert!(matches!(
                UserName::new("日本語ユーザー"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
            assert!(matches!(
                UserName::new("alice bob"),
                Err(UserNameError::InvalidCharacter { char: ' ', .. })
            ));
        }

        #[test]
        fn test_boundaries() {
            assert!(matches!(
                UserName::new("_alice"),
                Err(UserNameError::InvalidBoundary { char: '_' })
            ));
            assert!(matches!(
                UserName::new("alice."),
                Err(UserNameError::InvalidBoundary { char: '.' })
            ));
            assert_eq!(UserName::new("al..ice"), Err(UserNameError::ConsecutiveDots));
        }
    }

    mod reserved {
        use super::*;

        #[test]
        fn test_reserved_case_insensitive() {
            assert!(matches!(
                UserName::new("Admin"),
                Err(UserNameError::Reserved { .. })
            ));
        }

        #[test]
        fn test_provider_login_skips_reserved() {
            let name = UserName::from_provider("admin").unwrap();
            assert_eq!(name.as_str(), "admin");
            assert!(UserName::from_provider("-bad").is_err());
        }
    }
}
