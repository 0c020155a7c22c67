//! External Profile
//!
//! Identity reported by an OAuth provider after a successful code exchange.

/// Provider-side account data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    /// Stable provider account id (GitHub numeric id as a string)
    pub external_id: String,
    /// Provider login, used as the local user name
    pub login: String,
    /// Primary email, if the provider disclosed one
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
