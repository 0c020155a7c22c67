//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::EngagementAppState;
pub use router::{engagement_router, engagement_router_generic};
