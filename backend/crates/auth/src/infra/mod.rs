//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod github;
pub mod memory;
pub mod postgres;

pub use github::{GithubConfig, GithubIdentityBroker};
pub use memory::MemoryAuthRepository;
pub use postgres::PgAuthRepository;
