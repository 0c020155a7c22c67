//! In-memory repository
//!
//! Stands in for Postgres in tests and local runs. Enforces the same unique
//! keys as the migrations (user name, email, external id, token hash).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use kernel::id::{RefreshTokenId, UserId};
use platform::crypto;
use uuid::Uuid;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    tokens: HashMap<RefreshTokenId, RefreshToken>,
}

#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Grant or revoke admin rights. Admins are provisioned out of band.
    pub fn set_admin(&self, user_id: &UserId, is_admin: bool) -> bool {
        match self.state().users.get_mut(user_id) {
            Some(user) => {
                user.is_admin = is_admin;
                true
            }
            None => false,
        }
    }

    /// Tokens of one family, in no particular order
    pub fn family(&self, family_id: Uuid) -> Vec<RefreshToken> {
        self.state()
            .tokens
            .values()
            .filter(|t| t.family_id == family_id)
            .cloned()
            .collect()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state();
        let duplicate = state.users.values().any(|u| {
            u.user_id == user.user_id
                || u.user_name == user.user_name
                || u.email == user.email
                || (u.external_id.is_some() && u.external_id == user.external_id)
        });
        if duplicate {
            return Err(AuthError::DuplicateIdentity);
        }

        state.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.state().users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .state()
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<User>> {
        Ok(self
            .state()
            .users
            .values()
            .find(|u| u.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.state().users.values().any(|u| &u.email == email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self.state().users.values().any(|u| &u.user_name == user_name))
    }

    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AuthResult<bool> {
        match self.state().users.get_mut(user_id) {
            Some(user) => {
                user.set_ban(until, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl RefreshTokenRepository for MemoryAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        let mut state = self.state();
        if state
            .tokens
            .values()
            .any(|t| t.token_hash == token.token_hash)
        {
            return Err(AuthError::DuplicateIdentity);
        }

        state.tokens.insert(token.token_id, token.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>> {
        Ok(self
            .state()
            .tokens
            .values()
            .find(|t| crypto::constant_time_eq(t.token_hash.as_bytes(), token_hash.as_bytes()))
            .cloned())
    }

    async fn revoke(&self, token_id: &RefreshTokenId) -> AuthResult<bool> {
        match self.state().tokens.get_mut(token_id) {
            Some(token) if !token.revoked => {
                token.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_family(&self, family_id: Uuid) -> AuthResult<u64> {
        let mut revoked = 0;
        for token in self.state().tokens.values_mut() {
            if token.family_id == family_id && !token.revoked {
                token.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
