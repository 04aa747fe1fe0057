//! Access guard middleware for memsys-server.
//!
//! Every guarded request is a navigation: the bearer token (if any) resolves
//! to a principal, and the access guard decides whether the request path may
//! be served. Disallowed requests are answered with `303 See Other` pointing
//! at the guard's redirect target.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use memsys_core::guard::{AccessTier, Decision};
use memsys_core::Principal;
use std::sync::Arc;
use tracing::debug;

use crate::state::AppState;

/// Authenticated session attached to allowed requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    /// Hash of the bearer token, used to revoke the session on logout
    pub token_hash: String,
}

/// Access guard middleware for axum
pub async fn access_guard(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let session = match token {
        Some(token) => state.sessions.resolve(&token).await,
        None => None,
    };
    let principal = session.as_ref().map(|s| &s.principal);
    let path = request.uri().path().to_owned();

    match state.guard.evaluate(&path, principal) {
        Decision::Allow => {
            if let Some(session) = session {
                request.extensions_mut().insert(AuthContext {
                    principal: session.principal,
                    token_hash: session.token_hash,
                });
            }
            next.run(request).await
        }
        Decision::Redirect(target) => {
            debug!(
                "Redirecting {} ({:?}) to {}",
                path,
                AccessTier::of(principal),
                target
            );
            Redirect::to(target).into_response()
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Missing or malformed headers count as no token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(bearer_token(&headers).is_none());
    }
}
