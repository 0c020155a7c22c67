//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and broker traits
//! - `application/` - Use cases, token issuer, configuration
//! - `infra/` - Postgres and in-memory repositories, GitHub broker
//! - `presentation/` - HTTP handlers, DTOs, router, identity middleware
//!
//! ## Features
//! - Signup and login with email + password
//! - GitHub OAuth login with account creation on first use
//! - Stateless HS256 access tokens
//! - Rotating, single-use refresh tokens grouped in families
//! - Admin bans
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B policy for new passwords)
//! - Unknown accounts still pay for one hash verification
//! - Ban state is only revealed after the password verifies
//! - Reusing a rotated refresh token revokes its whole family

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::{Claims, TokenIssuer};
pub use error::{AuthError, AuthResult};
pub use infra::{GithubConfig, GithubIdentityBroker, MemoryAuthRepository, PgAuthRepository};
pub use presentation::middleware::resolve_identity;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
