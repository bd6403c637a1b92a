//! Authentication module entry point.
//!
//! Session-based authentication for Tasklane: opaque token generation, the
//! session lifecycle over a TTL key-value store, the axum middleware that
//! resolves tokens into an [`AuthContext`] for downstream handlers, and the
//! issuer-key guard in front of session creation.

pub mod issuer;
pub mod middleware;
pub mod models;
pub mod session;
pub mod token;

pub use models::{AuthContext, AuthError, IssuedSession, Session, SessionIdentity, SessionRecord};
pub use session::{SessionService, SESSION_KEY_PREFIX, USER_INDEX_PREFIX};
pub use token::{generate_token, OsTokenGenerator, TokenGenerator};
