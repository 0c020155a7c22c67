//! Infrastructure Layer
//!
//! Postgres and in-memory store implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryEngagementRepository;
pub use postgres::PgEngagementRepository;
