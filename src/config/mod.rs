//! # Configuration Management
//!
//! Environment-driven configuration for the Tasklane session service. Every
//! section has sensible defaults so a bare `tasklane` binary starts against
//! the in-memory store.

mod settings;

pub use settings::{
    AppConfig, ObservabilityConfig, ServerConfig, SessionConfig, StoreBackend, StoreConfig,
    DEFAULT_SESSION_TTL_SECONDS, MAX_SESSION_TTL_SECONDS, MIN_ISSUER_SECRET_LEN,
};
