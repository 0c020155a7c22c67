//! Repository Traits
//!
//! Interfaces for data persistence and the external identity provider.
//! Implementations live in the infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{RefreshTokenId, UserId};
use uuid::Uuid;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::value_object::{
    email::Email, external_profile::ExternalProfile, user_name::UserName,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user.
    ///
    /// Fails with `DuplicateIdentity` when the store's unique index on
    /// user name, email or external id rejects the row.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Set or clear `banned_until`. Returns false when the user does not exist.
    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AuthResult<bool>;
}

/// Refresh token repository trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>>;

    /// Revoke one token if it is still active.
    ///
    /// Returns true only for the caller that flipped it, so two concurrent
    /// rotations of the same token cannot both succeed.
    async fn revoke(&self, token_id: &RefreshTokenId) -> AuthResult<bool>;

    /// Revoke every token in a family. Returns the number newly revoked.
    async fn revoke_family(&self, family_id: Uuid) -> AuthResult<u64>;
}

/// OAuth identity provider
#[trait_variant::make(ExternalIdentityBroker: Send)]
pub trait LocalExternalIdentityBroker {
    /// Provider page the user is sent to for consent
    fn authorize_url(&self) -> String;

    /// Exchange an authorization code for the provider profile.
    ///
    /// Any transport, status or decoding failure is `ExternalExchangeFailed`.
    async fn exchange_code(&self, code: &str) -> AuthResult<ExternalProfile>;
}
