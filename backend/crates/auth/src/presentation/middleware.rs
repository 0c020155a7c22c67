//! Auth Middleware
//!
//! Resolves the bearer token into a [`RequestIdentity`] request extension.
//! Never rejects: a missing or invalid token yields an anonymous identity,
//! and each operation enforces its own authorization.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::identity::RequestIdentity;
use std::sync::Arc;

use crate::application::token::TokenIssuer;

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn resolve_identity(
    State(tokens): State<Arc<TokenIssuer>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = tokens.identify(bearer_token(req.headers()));
    if let RequestIdentity::Authenticated(caller) = &identity {
        tracing::debug!(user_id = %caller.user_id, "Request authenticated");
    }

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Token from `Authorization: Bearer <token>`, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
