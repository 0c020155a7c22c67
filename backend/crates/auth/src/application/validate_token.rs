//! Validate Token Use Case
//!
//! Access token to claims, and the optional-bearer variant that produces
//! a request identity.

use std::sync::Arc;

use kernel::identity::RequestIdentity;

use crate::application::token::{Claims, TokenIssuer};
use crate::error::AuthResult;

pub struct ValidateTokenUseCase {
    tokens: Arc<TokenIssuer>,
}

impl ValidateTokenUseCase {
    pub fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }

    /// `InvalidToken` or `ExpiredToken` on failure
    pub fn execute(&self, token: &str) -> AuthResult<Claims> {
        self.tokens.validate(token)
    }

    /// Anonymous when the bearer is absent or fails validation
    pub fn identify(&self, bearer: Option<&str>) -> RequestIdentity {
        self.tokens.identify(bearer)
    }
}
