//! In-process snapshot cache.
//!
//! Implements the `SnapshotCache` port with a map guarded by a tokio
//! `RwLock`. Entries expire according to the TTL supplied on `put`, measured
//! against an injected [`Clock`]. Expired entries are dropped lazily when the
//! next write for the same slot lands, and swept on every write once the map
//! grows past [`SWEEP_THRESHOLD`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{SnapshotCache, SnapshotCacheError};
use crate::domain::{ClientrawFile, SitePath};

/// Entry count above which writes also purge expired entries.
pub const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone)]
struct Entry {
    tokens: Vec<String>,
    expires_at: DateTime<Utc>,
}

/// Memory-backed TTL cache keyed by site path and file.
pub struct InMemorySnapshotCache {
    entries: RwLock<HashMap<(String, ClientrawFile), Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySnapshotCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotCache for InMemorySnapshotCache {
    async fn get(
        &self,
        path: &SitePath,
        file: ClientrawFile,
    ) -> Result<Option<Vec<String>>, SnapshotCacheError> {
        let now = self.clock.utc();
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(path.to_string(), file))
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.tokens.clone()))
    }

    async fn put(
        &self,
        path: &SitePath,
        file: ClientrawFile,
        tokens: Vec<String>,
        ttl: Duration,
    ) -> Result<(), SnapshotCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| SnapshotCacheError::backend(format!("invalid ttl: {err}")))?;
        let now = self.clock.utc();
        let mut entries = self.entries.write().await;
        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, entry| entry.expires_at > now);
        }
        entries.insert(
            (path.to_string(), file),
            Entry {
                tokens,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
