//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! Session tokens are bearer credentials and never appear in logs. Spans carry
//! a `token_hint` (the first eight hex characters) so a single session can be
//! followed through the logs without exposing the token itself.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Number of leading token characters safe to log.
pub const TOKEN_HINT_LEN: usize = 8;

/// Short, non-secret prefix of a token for log correlation
pub fn token_hint(token: &str) -> &str {
    token.get(..TOKEN_HINT_LEN).unwrap_or("")
}

/// Create a tracing span for a session lifecycle operation.
///
/// ```rust,ignore
/// let span = session_span!("refresh", token);
/// ```
#[macro_export]
macro_rules! session_span {
    ($operation:expr, $token:expr) => {
        tracing::info_span!(
            "session_operation",
            operation = %$operation,
            token_hint = %$crate::observability::logging::token_hint($token),
            user_id = tracing::field::Empty
        )
    };
    ($operation:expr, $token:expr, $($field:tt)*) => {
        tracing::info_span!(
            "session_operation",
            operation = %$operation,
            token_hint = %$crate::observability::logging::token_hint($token),
            user_id = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Create a tracing span for a key-value store round-trip.
#[macro_export]
macro_rules! store_span {
    ($operation:expr, $backend:expr) => {
        tracing::debug_span!(
            "store_operation",
            operation = %$operation,
            backend = %$backend
        )
    };
    ($operation:expr, $backend:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "store_operation",
            operation = %$operation,
            backend = %$backend,
            $($field)*
        )
    };
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Returns whether this
/// call installed the subscriber; a second call leaves the first one in place.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let installed = if config.json_logging {
        tracing::subscriber::set_global_default(
            fmt().json().with_env_filter(filter).with_current_span(true).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(fmt().with_env_filter(filter).finish())
    };

    match installed {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "Global subscriber already installed; keeping it");
            false
        }
    }
}

/// Log configuration at startup
pub fn log_config_info(config: &crate::config::AppConfig) {
    tracing::info!(
        server_address = %config.server.bind_address(),
        store_backend = ?config.store.backend,
        session_ttl_seconds = config.session.ttl_seconds,
        session_key_prefix = %config.session.key_prefix,
        session_issuing_enabled = config.session.issuer_secret.is_some(),
        metrics_enabled = %config.observability.enable_metrics,
        "Tasklane configuration"
    );
}
