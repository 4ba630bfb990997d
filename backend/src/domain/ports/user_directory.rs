//! Driving port resolving authenticated identities to local users.

use async_trait::async_trait;

use crate::domain::{Error, Identity, User};

/// Domain use-case port for identity lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the user for `identity`, creating it on first sight.
    async fn resolve(&self, identity: &Identity) -> Result<User, Error>;
}
