//! User Password Value Object
//!
//! Domain value object for user passwords with NIST SP 800-63B compliance.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{UserPassword, RawPassword};
//!
//! let raw = RawPassword::new("MySecurePass123!".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use platform::password::{self, ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// New password, checked against the policy
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let message = match e {
                PasswordPolicyError::TooShort { min, actual } => {
                    format!("Password must be at least {min} characters (got {actual})")
                }
                PasswordPolicyError::TooLong { max, actual } => {
                    format!("Password must be at most {max} characters (got {actual})")
                }
                PasswordPolicyError::EmptyOrWhitespace => "Password cannot be empty".to_string(),
                PasswordPolicyError::InvalidCharacter => {
                    "Password contains invalid control characters".to_string()
                }
                PasswordPolicyError::CommonPattern => {
                    "Password is too common or follows a predictable pattern".to_string()
                }
            };
            AuthError::InvalidInput(message)
        })?;

        Ok(Self(clear_text))
    }

    /// Password presented at login; normalized, never rejected
    pub fn presented(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    /// Burn one Argon2 verification without a real hash.
    ///
    /// Keeps unknown-account and no-password logins as slow as a wrong password.
    pub fn verify_dummy(&self, pepper: Option<&[u8]>) -> bool {
        password::verify_dummy(&self.0, pepper)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string as stored on the user row
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    /// Wrap the stored hash. Not parsed here: an unparsable value fails
    /// verification instead of failing the load.
    pub fn from_db(phc_string: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(phc_string))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification; false on mismatch or corrupt hash
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("ValidPass123!".to_string()).is_ok());

        let short_pass = "a1".repeat(3);
        assert!(matches!(
            RawPassword::new(short_pass),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            RawPassword::new("password123".to_string()),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_presented_password_skips_policy() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&RawPassword::presented("TestPassword123!".into()), None));
        // too short for the policy, but simply a mismatch at login
        assert!(!hashed.verify(&RawPassword::presented("short".into()), None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let pepper = b"app_secret_pepper";
        let hashed = UserPassword::from_raw(&raw, Some(pepper)).unwrap();

        assert!(hashed.verify(&raw, Some(pepper)));
        assert!(!hashed.verify(&raw, None));
    }

    #[test]
    fn test_corrupt_stored_hash_never_verifies() {
        let stored = UserPassword::from_db("$2a$10$not-argon");
        let raw = RawPassword::presented("whatever".into());
        assert!(!stored.verify(&raw, None));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }
}
