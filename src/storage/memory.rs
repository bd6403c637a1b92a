//! In-process session store with per-key deadlines.
//!
//! Expired entries are invisible to `get` and `delete` the moment their
//! deadline passes; a background sweeper reclaims their memory. Member sets
//! live in a second map with the same deadline rules.

use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{ensure_key, SessionStore};
use crate::errors::{Error, Result};
use crate::observability::metrics;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    deadline: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

#[derive(Debug, Clone)]
struct MemberSet {
    members: HashSet<String>,
    deadline: Instant,
}

impl MemberSet {
    fn is_live(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

fn deadline_after(now: Instant, ttl: Duration) -> Result<Instant> {
    now.checked_add(ttl).ok_or_else(|| {
        Error::storage(format!("TTL of {}s is beyond the store clock", ttl.as_secs()))
    })
}

/// `DashMap`-backed store for development and tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, Entry>,
    sets: DashMap<String, MemberSet>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and set whose deadline has passed; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len() + self.sets.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        self.sets.retain(|_, set| set.is_live(now));
        before.saturating_sub(self.entries.len() + self.sets.len())
    }

    /// Periodically purge expired entries until the store is dropped.
    pub fn spawn_sweeper(store: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(store);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = weak.upgrade() else { break };
                let purged = store.purge_expired();
                if purged > 0 {
                    debug!(purged, "Swept expired session records");
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        ensure_key(key)?;
        let deadline = deadline_after(Instant::now(), ttl)?;
        self.entries.insert(key.to_string(), Entry { value, deadline });
        metrics::record_store_operation("put", true);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        ensure_key(key)?;
        let now = Instant::now();
        let value = self
            .entries
            .get(key)
            .and_then(|entry| entry.is_live(now).then(|| entry.value.clone()));

        if value.is_none() {
            // Evict an expired record now rather than waiting for the sweeper.
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }

        metrics::record_store_operation("get", true);
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        ensure_key(key)?;
        let now = Instant::now();
        let removed_entry = self.entries.remove(key).is_some_and(|(_, entry)| entry.is_live(now));
        let removed_set = self.sets.remove(key).is_some_and(|(_, set)| set.is_live(now));
        metrics::record_store_operation("delete", true);
        Ok(removed_entry || removed_set)
    }

    async fn add_member(&self, key: &str, member: &str, ttl: Duration) -> Result<()> {
        ensure_key(key)?;
        let now = Instant::now();
        let deadline = deadline_after(now, ttl)?;
        let mut set = self
            .sets
            .entry(key.to_string())
            .or_insert_with(|| MemberSet { members: HashSet::new(), deadline });
        if !set.is_live(now) {
            set.members.clear();
        }
        set.members.insert(member.to_string());
        set.deadline = deadline;
        metrics::record_store_operation("add_member", true);
        Ok(())
    }

    async fn remove_member(&self, key: &str, member: &str) -> Result<()> {
        ensure_key(key)?;
        if let Some(mut set) = self.sets.get_mut(key) {
            set.members.remove(member);
        }
        self.sets.remove_if(key, |_, set| set.members.is_empty());
        metrics::record_store_operation("remove_member", true);
        Ok(())
    }

    async fn members(&self, key: &str) -> Result<Vec<String>> {
        ensure_key(key)?;
        let now = Instant::now();
        let members: Vec<String> = self
            .sets
            .get(key)
            .filter(|set| set.is_live(now))
            .map(|set| set.members.iter().cloned().collect())
            .unwrap_or_default();
        metrics::record_store_operation("members", true);
        Ok(members)
    }
}
