//! Data models for login sessions.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::Error;

/// Identity snapshot captured when a session is issued.
///
/// The snapshot is not re-checked against the user record on later reads; a
/// renamed user keeps the old name until the session is reissued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

/// Wire shape of a stored session: `{userId, email, name, createdAt, expiresAt}`.
///
/// Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity { user_id: self.user_id, email: self.email.clone(), name: self.name.clone() }
    }
}

/// A live session resolved from its token
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Session {
    pub(crate) fn from_record(token: &str, record: SessionRecord) -> Self {
        Self {
            token: token.to_string(),
            user_id: record.user_id,
            email: record.email,
            name: record.name,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity { user_id: self.user_id, email: self.email.clone(), name: self.name.clone() }
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires_at).single()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token handed to the client on login or refresh
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: i64,
}

impl std::fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedSession")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Identity attached to an authenticated request
#[derive(Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub expires_at: i64,
    token: String,
}

impl AuthContext {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl From<Session> for AuthContext {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
            name: session.name,
            expires_at: session.expires_at,
            token: session.token,
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Reasons a request fails authentication.
///
/// Unknown and expired tokens share one variant so responses never reveal
/// which of the two applied.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: session token missing")]
    MissingToken,
    #[error("unauthorized: invalid or expired session")]
    InvalidSession,
    #[error(transparent)]
    Storage(#[from] Error),
}
