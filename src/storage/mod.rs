//! # Session Storage
//!
//! Key-value persistence for session records. Every backend offers native
//! per-key expiry; the lifecycle layer never caches records in-process, so
//! each operation here is a full round-trip to the backend.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::{Error, Result};

pub use memory::MemorySessionStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisSessionStore;

/// Key-value backend holding serialized session records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Short backend name used in logs and metrics labels
    fn backend(&self) -> &'static str;

    /// Store `value` under `key`; the backend evicts it once `ttl` elapses.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Fetch the value stored under `key`, if it has not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key`, record or member set. Returns whether a live value was
    /// actually removed; deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Add `member` to the set at `key` and reset the set's expiry to `ttl`.
    async fn add_member(&self, key: &str, member: &str, ttl: Duration) -> Result<()>;

    /// Remove `member` from the set at `key`; absent sets and members are fine.
    async fn remove_member(&self, key: &str, member: &str) -> Result<()>;

    /// Members of the set at `key`, empty once the set has expired.
    async fn members(&self, key: &str) -> Result<Vec<String>>;
}

/// Build the store selected by configuration
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn SessionStore>> {
    match config.backend {
        StoreBackend::Memory => {
            let store = Arc::new(MemorySessionStore::new());
            MemorySessionStore::spawn_sweeper(&store, config.sweep_interval());
            info!(backend = "memory", "Session store ready");
            Ok(store)
        }
        #[cfg(feature = "redis")]
        StoreBackend::Redis => {
            let store = RedisSessionStore::connect(&config.redis_url).await?;
            info!(backend = "redis", "Session store ready");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        StoreBackend::Redis => {
            Err(Error::config("Redis backend requested but the `redis` feature is disabled"))
        }
    }
}

/// Reject keys no backend should ever see
pub(crate) fn ensure_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::validation_field("Store key cannot be empty", "key"));
    }
    Ok(())
}
