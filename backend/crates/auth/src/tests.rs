//! Use case scenarios against the in-memory repository

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use kernel::identity::RequestIdentity;
use platform::clock::{Clock, FixedClock};

use crate::application::{
    AuthConfig, AuthPayload, BanUserInput, BanUserUseCase, ExternalSignInUseCase,
    RefreshTokenUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
    TokenIssuer, ValidateTokenUseCase,
};
use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{ExternalIdentityBroker, RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, external_profile::ExternalProfile, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};
use crate::infra::memory::MemoryAuthRepository;

const PASSWORD: &str = "correct horse battery";

struct Harness {
    repo: Arc<MemoryAuthRepository>,
    clock: Arc<FixedClock>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

fn harness() -> Harness {
    let clock = Arc::new(FixedClock::at_unix(1_700_000_000));
    let config = Arc::new(AuthConfig::development());
    let tokens = Arc::new(TokenIssuer::new(&config, clock.clone()));
    Harness {
        repo: Arc::new(MemoryAuthRepository::new()),
        clock,
        tokens,
        config,
    }
}

impl Harness {
    async fn sign_up(&self, user_name: &str, email: &str) -> AuthResult<AuthPayload> {
        SignUpUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.tokens.clone(),
            self.config.clone(),
        )
        .execute(SignUpInput {
            user_name: user_name.into(),
            email: email.into(),
            password: PASSWORD.into(),
            display_name: None,
        })
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthPayload> {
        SignInUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.tokens.clone(),
            self.config.clone(),
        )
        .execute(SignInInput {
            email: email.into(),
            password: password.into(),
        })
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<AuthPayload> {
        RefreshTokenUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.tokens.clone(),
            self.config.clone(),
        )
        .execute(refresh_token)
        .await
    }

    async fn sign_out(&self, refresh_token: &str) -> AuthResult<()> {
        SignOutUseCase::new(self.repo.clone())
            .execute(refresh_token)
            .await
    }

    async fn external_sign_in(&self, broker: FakeBroker, code: &str) -> AuthResult<AuthPayload> {
        ExternalSignInUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            Arc::new(broker),
            self.tokens.clone(),
            self.config.clone(),
        )
        .execute(code)
        .await
    }

    fn ban_use_case(&self) -> BanUserUseCase<MemoryAuthRepository> {
        BanUserUseCase::new(self.repo.clone(), self.clock.clone())
    }

    fn validate(&self) -> ValidateTokenUseCase {
        ValidateTokenUseCase::new(self.tokens.clone())
    }

    async fn family_of(&self, refresh_token: &str) -> Vec<RefreshToken> {
        let stored = self
            .repo
            .find_by_hash(&RefreshToken::hash(refresh_token))
            .await
            .unwrap()
            .unwrap();
        self.repo.family(stored.family_id)
    }
}

struct FakeBroker {
    profile: ExternalProfile,
}

impl FakeBroker {
    fn octocat(email: Option<&str>) -> Self {
        Self {
            profile: ExternalProfile {
                external_id: "583231".into(),
                login: "octocat".into(),
                email: email.map(Into::into),
                display_name: Some("The Octocat".into()),
                avatar_url: Some("https://avatars.example/u/583231".into()),
            },
        }
    }
}

impl ExternalIdentityBroker for FakeBroker {
    fn authorize_url(&self) -> String {
        "https://provider.example/authorize".into()
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<ExternalProfile> {
        if code == "rejected" {
            return Err(AuthError::ExternalExchangeFailed("bad_verification_code".into()));
        }
        Ok(self.profile.clone())
    }
}

/// User store that answers every existence check with "no", leaving the
/// unique indexes behind `create` as the only duplicate guard.
struct UncheckedUserStore {
    inner: Arc<MemoryAuthRepository>,
}

impl UserRepository for UncheckedUserStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        UserRepository::create(self.inner.as_ref(), user).await
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.inner.find_by_id(user_id).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<User>> {
        self.inner.find_by_external_id(external_id).await
    }

    async fn exists_by_email(&self, _email: &Email) -> AuthResult<bool> {
        Ok(false)
    }

    async fn exists_by_user_name(&self, _user_name: &UserName) -> AuthResult<bool> {
        Ok(false)
    }

    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AuthResult<bool> {
        self.inner.set_banned_until(user_id, until, now).await
    }
}

impl Harness {
    async fn sign_up_unchecked(&self, user_name: &str, email: &str) -> AuthResult<AuthPayload> {
        let users = UncheckedUserStore {
            inner: self.repo.clone(),
        };
        SignUpUseCase::new(
            Arc::new(users),
            self.repo.clone(),
            self.tokens.clone(),
            self.config.clone(),
        )
        .execute(SignUpInput {
            user_name: user_name.into(),
            email: email.into(),
            password: PASSWORD.into(),
            display_name: None,
        })
        .await
    }
}

#[cfg(test)]
mod sign_up_tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_validate() {
        let h = harness();
        let payload = h.sign_up("alice", "Alice@Example.com").await.unwrap();

        assert_eq!(payload.user.email.as_str(), "alice@example.com");
        assert_eq!(payload.user.reputation, 0);
        assert!(!payload.user.is_admin);
        assert_eq!(payload.user.display_name, "alice");

        let claims = h.validate().execute(&payload.access_token.token).unwrap();
        assert_eq!(claims.user_id, payload.user.user_id);
        assert_eq!(claims.sub, payload.user.user_id.to_string());
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_admin);
    }

    #[tokio::test]
    async fn test_duplicate_identity() {
        let h = harness();
        h.sign_up("alice", "alice@example.com").await.unwrap();

        let same_email = h.sign_up("alice2", "ALICE@example.com").await;
        assert!(matches!(same_email, Err(AuthError::DuplicateIdentity)));

        let same_name = h.sign_up("alice", "other@example.com").await;
        assert!(matches!(same_name, Err(AuthError::DuplicateIdentity)));
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_that_passed_existence_check() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();

        let same_email = h.sign_up_unchecked("alice2", "alice@example.com").await;
        assert!(matches!(same_email, Err(AuthError::DuplicateIdentity)));

        let same_name = h.sign_up_unchecked("alice", "other@example.com").await;
        assert!(matches!(same_name, Err(AuthError::DuplicateIdentity)));

        let stored = h
            .repo
            .find_by_email(&Email::new("alice@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, first.user.user_id);
        assert!(
            h.repo
                .find_by_email(&Email::new("other@example.com").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let h = harness();
        assert!(matches!(
            h.sign_up("a", "alice@example.com").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            h.sign_up("alice", "not-an-email").await,
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let h = harness();
        let result = SignUpUseCase::new(
            h.repo.clone(),
            h.repo.clone(),
            h.tokens.clone(),
            h.config.clone(),
        )
        .execute(SignUpInput {
            user_name: "alice".into(),
            email: "alice@example.com".into(),
            password: "short".into(),
            display_name: None,
        })
        .await;
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
        assert!(!h.repo.exists_by_email(&"alice@example.com".parse().unwrap()).await.unwrap());
    }
}

#[cfg(test)]
mod sign_in_tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in() {
        let h = harness();
        let created = h.sign_up("alice", "alice@example.com").await.unwrap();

        let payload = h.sign_in(" ALICE@example.com ", PASSWORD).await.unwrap();
        assert_eq!(payload.user.user_id, created.user.user_id);
        assert_ne!(payload.refresh_token, created.refresh_token);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let h = harness();
        h.sign_up("alice", "alice@example.com").await.unwrap();

        let wrong = h.sign_in("alice@example.com", "wrong password!").await.unwrap_err();
        let unknown = h.sign_in("bob@example.com", PASSWORD).await.unwrap_err();
        let malformed = h.sign_in("bob", PASSWORD).await.unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(malformed, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_banned_account() {
        let h = harness();
        let created = h.sign_up("alice", "alice@example.com").await.unwrap();
        let until = h.clock.now() + Duration::days(1);
        h.repo
            .set_banned_until(&created.user.user_id, Some(until), h.clock.now())
            .await
            .unwrap();

        // Ban state is not revealed to a wrong password
        let wrong = h.sign_in("alice@example.com", "wrong password!").await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        match h.sign_in("alice@example.com", PASSWORD).await {
            Err(AuthError::AccountBanned { until: reported }) => assert_eq!(reported, until),
            other => panic!("expected AccountBanned, got {other:?}"),
        }

        // The ban lapses at its end time
        h.clock.set(until);
        assert!(h.sign_in("alice@example.com", PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_access_token_expiry() {
        let h = harness();
        let payload = h.sign_up("alice", "alice@example.com").await.unwrap();

        h.clock.advance(Duration::minutes(14));
        assert!(h.validate().execute(&payload.access_token.token).is_ok());

        h.clock.advance(Duration::minutes(1));
        assert!(matches!(
            h.validate().execute(&payload.access_token.token),
            Err(AuthError::ExpiredToken)
        ));
        assert_eq!(
            h.validate().identify(Some(&payload.access_token.token)),
            RequestIdentity::Anonymous
        );
    }
}

#[cfg(test)]
mod refresh_tests {
    use super::*;

    #[tokio::test]
    async fn test_rotation_is_single_use() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();

        let second = h.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_eq!(second.user.user_id, first.user.user_id);

        let family = h.family_of(&second.refresh_token).await;
        assert_eq!(family.len(), 2);
        assert_eq!(family.iter().filter(|t| !t.revoked).count(), 1);
    }

    #[tokio::test]
    async fn test_reuse_revokes_family() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();
        let second = h.refresh(&first.refresh_token).await.unwrap();

        let reuse = h.refresh(&first.refresh_token).await;
        assert!(matches!(reuse, Err(AuthError::RefreshTokenInvalid)));

        // The legitimate successor is gone too
        let successor = h.refresh(&second.refresh_token).await;
        assert!(matches!(successor, Err(AuthError::RefreshTokenInvalid)));
        assert!(h.family_of(&second.refresh_token).await.iter().all(|t| t.revoked));
    }

    #[tokio::test]
    async fn test_other_families_survive_reuse() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();
        let other_login = h.sign_in("alice@example.com", PASSWORD).await.unwrap();

        h.refresh(&first.refresh_token).await.unwrap();
        let _ = h.refresh(&first.refresh_token).await;

        assert!(h.refresh(&other_login.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_refresh_token() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();

        h.clock.advance(Duration::hours(168));
        let result = h.refresh(&first.refresh_token).await;
        assert!(matches!(result, Err(AuthError::RefreshTokenInvalid)));
    }

    #[tokio::test]
    async fn test_unknown_refresh_token() {
        let h = harness();
        let result = h.refresh("not-a-real-token").await;
        assert!(matches!(result, Err(AuthError::RefreshTokenInvalid)));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_family() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();
        let second = h.refresh(&first.refresh_token).await.unwrap();

        h.sign_out(&second.refresh_token).await.unwrap();
        assert!(matches!(
            h.refresh(&second.refresh_token).await,
            Err(AuthError::RefreshTokenInvalid)
        ));

        // Idempotent, including for tokens never issued
        h.sign_out(&second.refresh_token).await.unwrap();
        h.sign_out("never-issued").await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_sees_ban_and_admin_changes() {
        let h = harness();
        let first = h.sign_up("alice", "alice@example.com").await.unwrap();

        h.repo.set_admin(&first.user.user_id, true);
        let promoted = h.refresh(&first.refresh_token).await.unwrap();
        let claims = h.validate().execute(&promoted.access_token.token).unwrap();
        assert!(claims.is_admin);

        let until = h.clock.now() + Duration::hours(1);
        h.repo
            .set_banned_until(&first.user.user_id, Some(until), h.clock.now())
            .await
            .unwrap();
        let banned = h.refresh(&promoted.refresh_token).await;
        assert!(matches!(banned, Err(AuthError::AccountBanned { .. })));
        assert!(h.family_of(&promoted.refresh_token).await.iter().all(|t| t.revoked));
    }
}

#[cfg(test)]
mod external_sign_in_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_login_creates_account() {
        let h = harness();
        let payload = h
            .external_sign_in(FakeBroker::octocat(None), "code")
            .await
            .unwrap();

        let user = &payload.user;
        assert_eq!(user.user_name.as_str(), "octocat");
        assert_eq!(user.email.as_str(), "583231+octocat@users.noreply.github.com");
        assert_eq!(user.display_name, "The Octocat");
        assert_eq!(user.external_id.as_deref(), Some("583231"));
        assert!(user.password.is_none());
        assert_eq!(user.reputation, 0);
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_second_login_links_same_account() {
        let h = harness();
        let first = h
            .external_sign_in(FakeBroker::octocat(Some("octo@example.com")), "code")
            .await
            .unwrap();
        let second = h
            .external_sign_in(FakeBroker::octocat(Some("octo@example.com")), "code")
            .await
            .unwrap();

        assert_eq!(first.user.user_id, second.user.user_id);
        assert_eq!(second.user.email.as_str(), "octo@example.com");
    }

    #[tokio::test]
    async fn test_external_account_cannot_password_login() {
        let h = harness();
        h.external_sign_in(FakeBroker::octocat(Some("octo@example.com")), "code")
            .await
            .unwrap();

        let result = h.sign_in("octo@example.com", PASSWORD).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_collision_with_local_account() {
        let h = harness();
        h.sign_up("octocat", "someone@example.com").await.unwrap();

        let result = h
            .external_sign_in(FakeBroker::octocat(Some("octo@example.com")), "code")
            .await;
        assert!(matches!(result, Err(AuthError::DuplicateIdentity)));
    }

    #[tokio::test]
    async fn test_exchange_failure_and_empty_code() {
        let h = harness();
        assert!(matches!(
            h.external_sign_in(FakeBroker::octocat(None), "rejected").await,
            Err(AuthError::ExternalExchangeFailed(_))
        ));
        assert!(matches!(
            h.external_sign_in(FakeBroker::octocat(None), "  ").await,
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_banned_external_account() {
        let h = harness();
        let first = h
            .external_sign_in(FakeBroker::octocat(None), "code")
            .await
            .unwrap();
        h.repo
            .set_banned_until(
                &first.user.user_id,
                Some(h.clock.now() + Duration::hours(2)),
                h.clock.now(),
            )
            .await
            .unwrap();

        let result = h.external_sign_in(FakeBroker::octocat(None), "code").await;
        assert!(matches!(result, Err(AuthError::AccountBanned { .. })));
    }
}

#[cfg(test)]
mod ban_user_tests {
    use super::*;

    #[tokio::test]
    async fn test_ban_requires_admin() {
        let h = harness();
        let target = h.sign_up("alice", "alice@example.com").await.unwrap();
        let input = || BanUserInput {
            user_id: target.user.user_id,
            until: Some(h.clock.now() + Duration::days(7)),
        };

        let anonymous = h.ban_use_case().execute(&RequestIdentity::Anonymous, input()).await;
        assert!(matches!(anonymous, Err(AuthError::Unauthorized)));

        let member = RequestIdentity::authenticated(UserId::new(), "mallory", false);
        let forbidden = h.ban_use_case().execute(&member, input()).await;
        assert!(matches!(forbidden, Err(AuthError::Forbidden)));

        let admin = RequestIdentity::authenticated(UserId::new(), "root", true);
        h.ban_use_case().execute(&admin, input()).await.unwrap();
        assert!(matches!(
            h.sign_in("alice@example.com", PASSWORD).await,
            Err(AuthError::AccountBanned { .. })
        ));

        // Lift the ban
        h.ban_use_case()
            .execute(
                &admin,
                BanUserInput {
                    user_id: target.user.user_id,
                    until: None,
                },
            )
            .await
            .unwrap();
        assert!(h.sign_in("alice@example.com", PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_ban_unknown_user_or_past_date() {
        let h = harness();
        let admin = RequestIdentity::authenticated(UserId::new(), "root", true);

        let unknown = h
            .ban_use_case()
            .execute(
                &admin,
                BanUserInput {
                    user_id: UserId::new(),
                    until: Some(h.clock.now() + Duration::days(1)),
                },
            )
            .await;
        assert!(matches!(unknown, Err(AuthError::UserNotFound)));

        let target = h.sign_up("alice", "alice@example.com").await.unwrap();
        let past = h
            .ban_use_case()
            .execute(
                &admin,
                BanUserInput {
                    user_id: target.user.user_id,
                    until: Some(h.clock.now() - Duration::seconds(1)),
                },
            )
            .await;
        assert!(matches!(past, Err(AuthError::InvalidInput(_))));
    }
}
