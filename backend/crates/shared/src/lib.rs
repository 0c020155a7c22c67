//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! auth and engagement crates:
//! - Common error types and result aliases
//! - Typed ID wrappers for users and content
//! - The per-request caller identity and its access guards
//!
//! Only things whose meaning is identical across every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod identity;
