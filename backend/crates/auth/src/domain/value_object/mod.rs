//! Value Object Module

pub mod email;
pub mod external_profile;
pub mod user_name;
pub mod user_password;
