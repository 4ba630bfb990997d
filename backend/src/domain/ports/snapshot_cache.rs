//! Port interface for caching fetched snapshots between requests.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ClientrawFile, SitePath};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum SnapshotCacheError {
        /// Cache backend is unavailable.
        Backend { message: String } => "snapshot cache backend failure: {message}",
    }
}

/// Time-bounded store for fetched clientraw tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Read cached tokens for `file` under `path` if still fresh.
    async fn get(
        &self,
        path: &SitePath,
        file: ClientrawFile,
    ) -> Result<Option<Vec<String>>, SnapshotCacheError>;

    /// Store tokens for `ttl`.
    async fn put(
        &self,
        path: &SitePath,
        file: ClientrawFile,
        tokens: Vec<String>,
        ttl: Duration,
    ) -> Result<(), SnapshotCacheError>;
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSnapshotCache;

#[async_trait]
impl SnapshotCache for NoOpSnapshotCache {
    async fn get(
        &self,
        _path: &SitePath,
        _file: ClientrawFile,
    ) -> Result<Option<Vec<String>>, SnapshotCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _path: &SitePath,
        _file: ClientrawFile,
        _tokens: Vec<String>,
        _ttl: Duration,
    ) -> Result<(), SnapshotCacheError> {
        Ok(())
    }
}
