//! PostgreSQL Repository Implementations

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::{RefreshTokenId, UserId};
use platform::deadline::with_deadline;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    user_id,
    user_name,
    email,
    password_hash,
    display_name,
    avatar_url,
    bio,
    reputation,
    is_admin,
    banned_until,
    external_id,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
    store_timeout: Duration,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// Delete refresh tokens that expired before `now`
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = self
            .bounded(
                "refresh_tokens.cleanup",
                sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
                    .bind(now)
                    .execute(&self.pool),
            )
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired refresh tokens");

        Ok(deleted)
    }

    /// Run one store call under the configured deadline
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        Ok(with_deadline(operation, self.store_timeout, async {
            fut.await.map_err(AuthError::from)
        })
        .await?)
    }

    async fn find_user_where(
        &self,
        operation: &'static str,
        predicate: &str,
        value: &str,
    ) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate} = $1");
        let row = self
            .bounded(
                operation,
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(value)
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(UserRow::into_user))
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.bounded(
            "users.create",
            sqlx::query(
                r#"
                INSERT INTO users (
                    user_id,
                    user_name,
                    email,
                    password_hash,
                    display_name,
                    avatar_url,
                    bio,
                    reputation,
                    is_admin,
                    banned_until,
                    external_id,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(user.user_id.as_uuid())
            .bind(user.user_name.as_str())
            .bind(user.email.as_str())
            .bind(user.password.as_ref().map(UserPassword::as_phc_string))
            .bind(&user.display_name)
            .bind(&user.avatar_url)
            .bind(&user.bio)
            .bind(user.reputation)
            .bind(user.is_admin)
            .bind(user.banned_until)
            .bind(&user.external_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = self
            .bounded(
                "users.find_by_id",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(user_id.as_uuid())
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.find_user_where("users.find_by_email", "email", email.as_str())
            .await
    }

    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<User>> {
        self.find_user_where("users.find_by_external_id", "external_id", external_id)
            .await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        self.bounded(
            "users.exists_by_email",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        self.bounded(
            "users.exists_by_user_name",
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)",
            )
            .bind(user_name.as_str())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let result = self
            .bounded(
                "users.set_banned_until",
                sqlx::query("UPDATE users SET banned_until = $2, updated_at = $3 WHERE user_id = $1")
                    .bind(user_id.as_uuid())
                    .bind(until)
                    .bind(now)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        self.bounded(
            "refresh_tokens.create",
            sqlx::query(
                r#"
                INSERT INTO refresh_tokens (
                    token_id,
                    user_id,
                    family_id,
                    token_hash,
                    created_at,
                    expires_at,
                    revoked
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(token.token_id.as_uuid())
            .bind(token.user_id.as_uuid())
            .bind(token.family_id)
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.revoked)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>> {
        let row = self
            .bounded(
                "refresh_tokens.find_by_hash",
                sqlx::query_as::<_, RefreshTokenRow>(
                    r#"
                    SELECT
                        token_id,
                        user_id,
                        family_id,
                        token_hash,
                        created_at,
                        expires_at,
                        revoked
                    FROM refresh_tokens
                    WHERE token_hash = $1
                    "#,
                )
                .bind(token_hash)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(RefreshTokenRow::into_token))
    }

    async fn revoke(&self, token_id: &RefreshTokenId) -> AuthResult<bool> {
        let result = self
            .bounded(
                "refresh_tokens.revoke",
                sqlx::query(
                    "UPDATE refresh_tokens SET revoked = true WHERE token_id = $1 AND revoked = false",
                )
                .bind(token_id.as_uuid())
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_family(&self, family_id: Uuid) -> AuthResult<u64> {
        let result = self
            .bounded(
                "refresh_tokens.revoke_family",
                sqlx::query(
                    "UPDATE refresh_tokens SET revoked = true WHERE family_id = $1 AND revoked = false",
                )
                .bind(family_id)
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: String,
    password_hash: Option<String>,
    display_name: String,
    avatar_url: Option<String>,
    bio: Option<String>,
    reputation: i64,
    is_admin: bool,
    banned_until: Option<DateTime<Utc>>,
    external_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.user_name),
            email: Email::from_db(self.email),
            password: self.password_hash.map(UserPassword::from_db),
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            bio: self.bio,
            reputation: self.reputation,
            is_admin: self.is_admin,
            banned_until: self.banned_until,
            external_id: self.external_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token_id: Uuid,
    user_id: Uuid,
    family_id: Uuid,
    token_hash: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

impl RefreshTokenRow {
    fn into_token(self) -> RefreshToken {
        RefreshToken {
            token_id: RefreshTokenId::from_uuid(self.token_id),
            user_id: UserId::from_uuid(self.user_id),
            family_id: self.family_id,
            token_hash: self.token_hash,
            created_at: self.created_at,
            expires_at: self.expires_at,
            revoked: self.revoked,
        }
    }
}
