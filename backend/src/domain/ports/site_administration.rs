//! Driving port for the admin registration surface.

use async_trait::async_trait;

use crate::domain::{Error, Site, User};

/// Domain use-case port for registering and listing sites.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteAdministration: Send + Sync {
    /// Validate `path`, derive a free key and store a new site owned by
    /// `owner`.
    async fn register(&self, owner: &User, path: &str) -> Result<Site, Error>;

    /// Sites owned by `owner`, oldest first.
    async fn list_sites(&self, owner: &User) -> Result<Vec<Site>, Error>;
}
