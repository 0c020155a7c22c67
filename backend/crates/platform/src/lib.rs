//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, Base64url, random tokens)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Injectable wall clock
//! - Store call deadlines
//! - Environment / duration parsing for configuration

pub mod clock;
pub mod config;
pub mod crypto;
pub mod deadline;
pub mod password;
