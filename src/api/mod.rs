//! HTTP surface: session endpoints, error rendering and validating extractors.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;

use std::sync::Arc;

use crate::auth::SessionService;
use crate::config::SessionConfig;

pub use error::ApiError;
pub use extract::{ValidatedJson, ValidatedQuery};
pub use routes::build_router;
pub use server::start_api_server;

/// Shared state handed to handlers and the auth middleware
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub session_config: Arc<SessionConfig>,
}

impl AppState {
    pub fn new(sessions: SessionService, session_config: SessionConfig) -> Self {
        Self { sessions, session_config: Arc::new(session_config) }
    }
}
