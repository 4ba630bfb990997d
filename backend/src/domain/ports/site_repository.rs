//! Port abstraction for site persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Site, SiteKey, UserId};

use super::{InsertOutcome, define_port_error};

define_port_error! {
    /// Persistence errors raised by site repository adapters.
    pub enum SitePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "site repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "site repository query failed: {message}",
    }
}

/// Storage for registered sites.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Fetch the site registered under `key`.
    async fn find_by_key(&self, key: &SiteKey) -> Result<Option<Site>, SitePersistenceError>;

    /// Store `site` unless its key is already taken.
    ///
    /// Implementations must make the check and the write a single atomic
    /// step so concurrent registrations never share a key.
    async fn insert_if_absent(&self, site: &Site) -> Result<InsertOutcome, SitePersistenceError>;

    /// Sites owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Site>, SitePersistenceError>;
}
