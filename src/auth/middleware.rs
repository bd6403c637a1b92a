//! Axum middleware resolving the session token on each request.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::{field, warn, Instrument};

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::auth::models::{AuthContext, AuthError};
use crate::observability::metrics;
use crate::session_span;

/// Pull the session token from `Authorization: Bearer` or, failing that, the session cookie.
pub fn extract_token(headers: &HeaderMap, jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim().to_string())
        })
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        jar.get(cookie_name).map(|cookie| cookie.value().to_string()).filter(|v| !v.is_empty())
    })
}

/// Middleware entry point that authenticates requests using the [`SessionService`](crate::auth::SessionService).
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let token = extract_token(request.headers(), &jar, &state.session_config.cookie_name);
    let span = session_span!(
        "authenticate",
        token.as_deref().unwrap_or_default(),
        http.method = %request.method(),
        http.path = %request.uri().path()
    );

    async move {
        match resolve(&state, token).await {
            Ok(context) => {
                tracing::Span::current().record("user_id", field::display(&context.user_id));
                metrics::record_authentication("authenticated");
                request.extensions_mut().insert(context);
                Ok(next.run(request).await)
            }
            Err(err) => {
                let status = match &err {
                    AuthError::MissingToken => "missing_token",
                    AuthError::InvalidSession => "rejected",
                    AuthError::Storage(_) => "store_unavailable",
                };
                metrics::record_authentication(status);
                warn!(error = %err, "authentication failed");
                Err(ApiError::from(err))
            }
        }
    }
    .instrument(span)
    .await
}

async fn resolve(state: &AppState, token: Option<String>) -> Result<AuthContext, AuthError> {
    let token = token.ok_or(AuthError::MissingToken)?;

    state
        .sessions
        .get_session(&token)
        .await?
        .map(AuthContext::from)
        .ok_or(AuthError::InvalidSession)
}
