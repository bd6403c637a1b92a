//! Redis-backed session store.
//!
//! Records are written with `SET key value EX ttl`, so Redis owns eviction.
//! Member sets use `SADD` and `EXPIRE` in one `MULTI` block.
//! No retries happen here: a failed round-trip surfaces as
//! [`Error::Storage`](crate::errors::Error::Storage) and the caller decides.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::{debug, error, Instrument};

use super::{ensure_key, SessionStore};
use crate::errors::{Error, Result};
use crate::observability::metrics;
use crate::store_span;

/// Session store talking to a single Redis server over a multiplexed connection
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Open a connection and verify the server answers `PING`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(|e| {
            Error::storage_with_source("Failed to create Redis client", Box::new(e))
        })?;

        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::storage_with_source("Failed to connect to Redis", Box::new(e)))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::storage_with_source("Redis ping failed", Box::new(e)))?;

        debug!("Redis connection established");
        Ok(Self { connection })
    }

    fn observe<T>(operation: &'static str, result: redis::RedisResult<T>) -> Result<T> {
        metrics::record_store_operation(operation, result.is_ok());
        result.map_err(|e| {
            error!(operation, error = %e, "Redis operation failed");
            Error::from(e).with_context(format!("redis {}", operation))
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        ensure_key(key)?;
        let mut connection = self.connection.clone();
        let seconds = expiry_seconds(ttl)?;
        let result: redis::RedisResult<()> = connection
            .set_ex(key, value, seconds)
            .instrument(store_span!("put", "redis", ttl_seconds = seconds))
            .await;
        Self::observe("put", result)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        ensure_key(key)?;
        let mut connection = self.connection.clone();
        let result: redis::RedisResult<Option<String>> =
            connection.get(key).instrument(store_span!("get", "redis")).await;
        Self::observe("get", result)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        ensure_key(key)?;
        let mut connection = self.connection.clone();
        let result: redis::RedisResult<i64> =
            connection.del(key).instrument(store_span!("delete", "redis")).await;
        Self::observe("delete", result).map(|removed| removed > 0)
    }

    async fn add_member(&self, key: &str, member: &str, ttl: Duration) -> Result<()> {
        ensure_key(key)?;
        let mut connection = self.connection.clone();
        let seconds = expiry_seconds(ttl)?;
        let result: redis::RedisResult<()> = redis::pipe()
            .atomic()
            .sadd(key, member)
            .ignore()
            .expire(key, seconds as i64)
            .ignore()
            .query_async(&mut connection)
            .instrument(store_span!("add_member", "redis", ttl_seconds = seconds))
            .await;
        Self::observe("add_member", result)
    }

    async fn remove_member(&self, key: &str, member: &str) -> Result<()> {
        ensure_key(key)?;
        let mut connection = self.connection.clone();
        let result: redis::RedisResult<i64> =
            connection.srem(key, member).instrument(store_span!("remove_member", "redis")).await;
        Self::observe("remove_member", result).map(|_| ())
    }

    async fn members(&self, key: &str) -> Result<Vec<String>> {
        ensure_key(key)?;
        let mut connection = self.connection.clone();
        let result: redis::RedisResult<Vec<String>> =
            connection.smembers(key).instrument(store_span!("members", "redis")).await;
        Self::observe("members", result)
    }
}

/// Whole seconds for `EX`/`EXPIRE`. Zero is rejected by Redis, so a
/// sub-second TTL still gets one second; values past `i64::MAX` are refused.
fn expiry_seconds(ttl: Duration) -> Result<u64> {
    let seconds = ttl.as_secs().max(1);
    if seconds > i64::MAX as u64 {
        return Err(Error::storage(format!("TTL of {}s is beyond what Redis accepts", seconds)));
    }
    Ok(seconds)
}
