//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::identity::AuthenticatedIdentity;
use serde::{Deserialize, Serialize};

use crate::application::session::AuthPayload;
use crate::domain::entity::user::User;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// GitHub callback request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSignInRequest {
    pub code: String,
}

// ============================================================================
// Refresh / Sign Out
// ============================================================================

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// Moderation
// ============================================================================

/// Ban request. A null `until` lifts the ban.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanUserRequest {
    pub until: Option<DateTime<Utc>>,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of an account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub reputation: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: user.user_name.to_string(),
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
            reputation: user.reputation,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Token pair plus account, returned by every sign-in path
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl From<AuthPayload> for AuthResponse {
    fn from(payload: AuthPayload) -> Self {
        Self {
            user: UserSummary::from(&payload.user),
            access_token: payload.access_token.token,
            access_token_expires_at: payload.access_token.expires_at,
            refresh_token: payload.refresh_token,
            refresh_token_expires_at: payload.refresh_expires_at,
        }
    }
}

/// Current request identity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub username: String,
    pub is_admin: bool,
}

impl From<&AuthenticatedIdentity> for MeResponse {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            user_id: identity.user_id.to_string(),
            username: identity.username.clone(),
            is_admin: identity.is_admin,
        }
    }
}
