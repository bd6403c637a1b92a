//! Guard for the session-issuing endpoint.
//!
//! Tasklane never checks passwords. An identity proxy in front of it
//! authenticates the user, then calls the issuing endpoint with the shared
//! issuer key in [`ISSUER_KEY_HEADER`]. Without a configured key the endpoint
//! is not mounted at all.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::observability::metrics;

/// Header carrying the shared issuer key
pub const ISSUER_KEY_HEADER: &str = "x-tasklane-issuer-key";

/// Compare a presented issuer key against the configured one in constant time
pub fn issuer_key_matches(provided: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(ISSUER_KEY_HEADER).and_then(|value| value.to_str().ok()).map(str::trim)
}

/// Middleware admitting only callers that present the issuer key
pub async fn require_issuer(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state.session_config.issuer_secret.as_deref().unwrap_or_default();
    let admitted = presented_key(request.headers())
        .is_some_and(|provided| issuer_key_matches(provided, expected));

    if !admitted {
        metrics::record_authentication("issuer_rejected");
        warn!(path = %request.uri().path(), "session issue rejected: bad issuer key");
        return Err(ApiError::unauthorized("Unauthorized: issuer key required"));
    }

    Ok(next.run(request).await)
}
