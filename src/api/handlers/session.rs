//! Handlers for issuing sessions and for the caller's own session.

use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, UNAUTHORIZED_MESSAGE};
use crate::api::extract::ValidatedJson;
use crate::api::AppState;
use crate::auth::{AuthContext, IssuedSession};
use crate::config::SessionConfig;
use crate::validation::{IssueSessionRequest, LogoutRequest, RequestContract};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub expires_at: i64,
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

fn expired_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), String::new())).path("/").build()
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: usize,
    pub message: String,
}

impl LogoutResponse {
    fn new(revoked: usize) -> Self {
        Self { revoked, message: format!("Logged out from {} session(s)", revoked) }
    }
}

/// Open a session for an identity the upstream proxy has verified.
#[instrument(skip_all)]
pub async fn issue_session_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<IssueSessionRequest>,
) -> Result<(StatusCode, CookieJar, Json<IssuedSession>), ApiError> {
    let user_id = request.user_id;
    let issued = state.sessions.create_session(request.into_identity()).await?;

    info!(%user_id, "Session issued");
    let jar = jar.add(session_cookie(&state.session_config, issued.token.clone()));
    Ok((StatusCode::CREATED, jar, Json(issued)))
}

pub async fn current_session_handler(
    Extension(context): Extension<AuthContext>,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: context.user_id,
        email: context.email,
        name: context.name,
        expires_at: context.expires_at,
    })
}

/// Rotate the caller's token. The presented token stops working immediately.
#[instrument(skip_all, fields(user_id = %context.user_id))]
pub async fn refresh_session_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<IssuedSession>), ApiError> {
    let issued = state
        .sessions
        .refresh_session(context.token())
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    info!("Session token rotated");
    let jar = jar.add(session_cookie(&state.session_config, issued.token.clone()));
    Ok((jar, Json(issued)))
}

/// Logout takes an optional JSON body; no body means `{"all_sessions": false}`.
fn logout_options(body: &Bytes) -> Result<LogoutRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(LogoutRequest::default());
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    LogoutRequest::validate_payload(&payload).map_err(ApiError::from)
}

/// Revoke the presented session, or every session of its user.
#[instrument(skip_all, fields(user_id = %context.user_id))]
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<LogoutResponse>), ApiError> {
    let options = logout_options(&body)?;

    let revoked = if options.all_sessions {
        state.sessions.delete_all_for_user(context.user_id).await?
    } else {
        usize::from(state.sessions.delete_session(context.token()).await?)
    };

    info!(revoked, all_sessions = options.all_sessions, "Session logged out");
    Ok((jar.remove(expired_cookie(&state.session_config)), Json(LogoutResponse::new(revoked))))
}
