//! Session lifecycle management for opaque bearer tokens.
//!
//! Sessions live in a [`SessionStore`] under `"session:" + token` with the
//! store's native TTL. The record also carries an absolute `expiresAt` that is
//! re-checked on every read, so a record the store has not evicted yet is
//! still never handed back once it is past its expiry.
//!
//! Refresh rotates: the old record is deleted before the new token exists.
//! The delete and the create are two round-trips, not one transaction; a
//! crash in between leaves the user logged out, never holding two tokens.
//! Concurrent refreshes of one token are serialized by the delete itself:
//! only the caller whose delete removed the record receives a new session.
//!
//! Each user also has a token set under `"user_sessions:" + user_id` so every
//! session of that user can be revoked at once. The set may name tokens that
//! were already revoked or expired; those are skipped when it is walked.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::auth::models::{IssuedSession, Session, SessionIdentity, SessionRecord};
use crate::auth::token::{is_well_formed, OsTokenGenerator, TokenGenerator};
use crate::config::{SessionConfig, DEFAULT_SESSION_TTL_SECONDS};
use crate::errors::Result;
use crate::observability::metrics::{self, LookupOutcome};
use crate::observability::token_hint;
use crate::storage::SessionStore;

/// Default store key prefix
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Prefix of the per-user token set
pub const USER_INDEX_PREFIX: &str = "user_sessions:";

/// Creates, resolves, rotates and revokes sessions
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    tokens: Arc<dyn TokenGenerator>,
    ttl: Duration,
    key_prefix: String,
}

impl SessionService {
    /// Create a session service with the default seven-day lifetime
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            tokens: Arc::new(OsTokenGenerator),
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS),
            key_prefix: SESSION_KEY_PREFIX.to_string(),
        }
    }

    /// Create a session service using the configured lifetime and key prefix
    pub fn from_config(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self { ttl: config.ttl(), key_prefix: config.key_prefix.clone(), ..Self::new(store) }
    }

    /// Replace the token source
    pub fn with_token_generator(mut self, tokens: Arc<dyn TokenGenerator>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store key for a token
    pub fn session_key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }

    /// Store key of the token set for `user_id`
    pub fn user_index_key(&self, user_id: Uuid) -> String {
        format!("{}{}", USER_INDEX_PREFIX, user_id)
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Issue a new session for `identity`.
    ///
    /// # Errors
    ///
    /// - If the random source fails
    /// - If a store write fails, including a lifetime the store cannot represent
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn create_session(&self, identity: SessionIdentity) -> Result<IssuedSession> {
        let token = self.tokens.generate()?;
        let index_key = self.user_index_key(identity.user_id);
        let created_at = Utc::now().timestamp_millis();
        let expires_at = created_at.saturating_add(self.ttl_millis());

        let record = SessionRecord {
            user_id: identity.user_id,
            email: identity.email,
            name: identity.name,
            created_at,
            expires_at,
        };
        let payload = serde_json::to_string(&record)?;

        self.store.put(&self.session_key(&token), payload, self.ttl).await?;
        self.store.add_member(&index_key, &token, self.ttl).await?;
        metrics::record_session_created();

        info!(token_hint = %token_hint(&token), expires_at, "Session created");

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve `token` to a live session.
    ///
    /// Unknown, malformed and expired tokens all yield `Ok(None)`. An expired
    /// record found in the store is deleted before returning.
    ///
    /// # Errors
    ///
    /// - If a store round-trip fails
    #[instrument(skip(self, token), fields(token_hint = %token_hint(token)))]
    pub async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        if !is_well_formed(token) {
            metrics::record_session_lookup(LookupOutcome::Malformed);
            return Ok(None);
        }

        let key = self.session_key(token);
        let Some(payload) = self.store.get(&key).await? else {
            metrics::record_session_lookup(LookupOutcome::Missing);
            return Ok(None);
        };

        let record: SessionRecord = match serde_json::from_str(&payload) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "Discarding unreadable session record");
                self.store.delete(&key).await?;
                metrics::record_session_lookup(LookupOutcome::Missing);
                return Ok(None);
            }
        };

        if record.is_expired_at(Utc::now().timestamp_millis()) {
            debug!(expires_at = record.expires_at, "Purging expired session");
            self.store.delete(&key).await?;
            metrics::record_session_lookup(LookupOutcome::Expired);
            return Ok(None);
        }

        metrics::record_session_lookup(LookupOutcome::Live);
        Ok(Some(Session::from_record(token, record)))
    }

    /// Revoke `token`. Revoking an unknown token succeeds; the result says
    /// whether a live session was actually removed.
    ///
    /// # Errors
    ///
    /// - If the store delete fails
    #[instrument(skip(self, token), fields(token_hint = %token_hint(token)))]
    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        if !is_well_formed(token) {
            return Ok(false);
        }

        let removed = self.store.delete(&self.session_key(token)).await?;
        if removed {
            metrics::record_session_revoked();
            info!("Session revoked");
        }
        Ok(removed)
    }

    /// Revoke every session of `user_id`; returns how many live sessions were removed.
    ///
    /// # Errors
    ///
    /// - If a store round-trip fails; sessions revoked before the failure stay revoked
    #[instrument(skip(self))]
    pub async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize> {
        let index_key = self.user_index_key(user_id);
        let tokens = self.store.members(&index_key).await?;

        let mut revoked = 0;
        for token in tokens.iter().filter(|token| is_well_formed(token)) {
            if self.store.delete(&self.session_key(token)).await? {
                metrics::record_session_revoked();
                revoked += 1;
            }
        }
        self.store.delete(&index_key).await?;

        info!(revoked, indexed = tokens.len(), "Revoked all sessions for user");
        Ok(revoked)
    }

    /// Rotate `token`: invalidate it and issue a new session for the same identity.
    ///
    /// Returns `Ok(None)` when the token is not live, including when a
    /// concurrent refresh already rotated it.
    ///
    /// # Errors
    ///
    /// - If a store round-trip fails
    /// - If the random source fails (the old token is already revoked by then)
    #[instrument(skip(self, token), fields(token_hint = %token_hint(token)))]
    pub async fn refresh_session(&self, token: &str) -> Result<Option<IssuedSession>> {
        let Some(session) = self.get_session(token).await? else {
            return Ok(None);
        };

        if !self.store.delete(&self.session_key(token)).await? {
            debug!("Session rotated by a concurrent refresh");
            return Ok(None);
        }
        self.store.remove_member(&self.user_index_key(session.user_id), token).await?;

        let issued = self.create_session(session.identity()).await?;
        metrics::record_session_refreshed();

        info!(
            new_token_hint = %token_hint(&issued.token),
            expires_at = issued.expires_at,
            "Session refreshed"
        );

        Ok(Some(issued))
    }
}
