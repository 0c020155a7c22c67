//! User Entity
//!
//! An account. Usable for password login when it has a password hash and
//! for external login when it has an external id; it may have both.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, case-sensitive
    pub user_name: UserName,
    /// Unique, lower-cased
    pub email: Email,
    /// Absent for external-only accounts
    pub password: Option<UserPassword>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// May go negative
    pub reputation: i64,
    pub is_admin: bool,
    pub banned_until: Option<DateTime<Utc>>,
    /// Provider account id, unique when present
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Account created by password signup
    pub fn new_local(
        user_name: UserName,
        email: Email,
        password: UserPassword,
        display_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let display_name = Self::display_name_or(display_name, &user_name);
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password: Some(password),
            display_name,
            avatar_url: None,
            bio: None,
            reputation: 0,
            is_admin: false,
            banned_until: None,
            external_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Account created on first external login
    pub fn new_external(
        user_name: UserName,
        email: Email,
        external_id: String,
        display_name: Option<String>,
        avatar_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let display_name = Self::display_name_or(display_name, &user_name);
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password: None,
            display_name,
            avatar_url,
            bio: None,
            reputation: 0,
            is_admin: false,
            banned_until: None,
            external_id: Some(external_id),
            created_at: now,
            updated_at: now,
        }
    }

    fn display_name_or(display_name: Option<String>, user_name: &UserName) -> String {
        display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| user_name.as_str().to_string())
    }

    /// Ban end, if the ban is still in force at `now`
    pub fn active_ban(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.banned_until.filter(|until| *until > now)
    }

    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        self.active_ban(now).is_some()
    }

    /// Set (`Some`) or lift (`None`) a ban
    pub fn set_ban(&mut self, until: Option<DateTime<Utc>>, now: DateTime<Utc>) {
        self.banned_until = until;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> User {
        User::new_external(
            UserName::from_provider("octocat").unwrap(),
            Email::new("octo@example.com").unwrap(),
            "583231".into(),
            Some("   ".into()),
            None,
            now,
        )
    }

    #[test]
    fn test_new_external_defaults() {
        let now = Utc::now();
        let user = sample(now);
        assert_eq!(user.reputation, 0);
        assert!(!user.is_admin);
        assert!(user.password.is_none());
        // blank display name falls back to the user name
        assert_eq!(user.display_name, "octocat");
        assert_eq!(user.external_id.as_deref(), Some("583231"));
    }

    #[test]
    fn test_ban_window() {
        let now = Utc::now();
        let mut user = sample(now);
        assert!(!user.is_banned_at(now));

        let until = now + Duration::hours(1);
        user.set_ban(Some(until), now);
        assert_eq!(user.active_ban(now), Some(until));
        assert!(!user.is_banned_at(until));
        assert!(!user.is_banned_at(until + Duration::seconds(1)));

        user.set_ban(None, now);
        assert!(!user.is_banned_at(now));
    }
}
