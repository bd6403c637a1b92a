use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use tracing::warn;

use crate::auth::issuer::require_issuer;
use crate::auth::middleware::authenticate;

use super::{
    handlers::{
        current_session_handler, health_handler, issue_session_handler, logout_handler,
        refresh_session_handler,
    },
    AppState,
};

pub fn build_router(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), authenticate);

    let secured_api = Router::new()
        .route("/api/v1/session", get(current_session_handler).delete(logout_handler))
        .route("/api/v1/session/refresh", post(refresh_session_handler))
        .route_layer(auth_layer);

    let mut router = Router::new().route("/health", get(health_handler)).merge(secured_api);

    if state.session_config.issuer_secret.is_some() {
        let issuer_layer = middleware::from_fn_with_state(state.clone(), require_issuer);
        let issuing_api = Router::new()
            .route("/api/v1/session", post(issue_session_handler))
            .route_layer(issuer_layer);
        router = router.merge(issuing_api);
    } else {
        warn!("TASKLANE_SESSION_ISSUER_SECRET is unset; session issuing is disabled");
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
