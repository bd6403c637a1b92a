//! # Tasklane
//!
//! Session authentication and request validation for the Tasklane
//! multi-tenant task tracker.
//!
//! ## Architecture
//!
//! ```text
//! HTTP request → Auth Middleware → Handler (ValidatedJson / ValidatedQuery)
//!                     ↓
//!              Session Service → Session Store (memory | redis)
//! ```
//!
//! ## Core Components
//!
//! - **Token Generator**: 256-bit opaque tokens from the OS random source
//! - **Session Store**: TTL key-value adapter with in-memory and Redis backends
//! - **Session Service**: create, resolve, rotate and revoke sessions
//! - **Request Validators**: workspace, project and task contracts
//! - **Auth Middleware**: resolves bearer tokens or session cookies into an identity
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tasklane::auth::{SessionIdentity, SessionService};
//! use tasklane::storage::MemorySessionStore;
//!
//! # async fn run() -> tasklane::Result<()> {
//! let sessions = SessionService::new(Arc::new(MemorySessionStore::new()));
//! let issued = sessions
//!     .create_session(SessionIdentity {
//!         user_id: uuid::Uuid::new_v4(),
//!         email: "ada@example.com".into(),
//!         name: "Ada".into(),
//!     })
//!     .await?;
//! assert!(sessions.get_session(&issued.token).await?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod storage;
pub mod validation;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use observability::init_observability;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
