//! Ban User Use Case
//!
//! Admin-only. Sets or lifts `banned_until`; login, external login and
//! refresh refuse the account while the ban is in force.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::identity::RequestIdentity;
use platform::clock::Clock;

use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct BanUserInput {
    pub user_id: UserId,
    /// `None` lifts the ban
    pub until: Option<DateTime<Utc>>,
}

pub struct BanUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> BanUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }

    pub async fn execute(&self, identity: &RequestIdentity, input: BanUserInput) -> AuthResult<()> {
        let admin = identity.require_admin()?;

        let now = self.clock.now();
        if let Some(until) = input.until
            && until <= now
        {
            return Err(AuthError::InvalidInput("Ban end must be in the future".into()));
        }

        if !self
            .user_repo
            .set_banned_until(&input.user_id, input.until, now)
            .await?
        {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(
            admin_id = %admin.user_id,
            user_id = %input.user_id,
            until = ?input.until,
            "User ban updated"
        );
        Ok(())
    }
}
