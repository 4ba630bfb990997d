//! In-memory repository adapters.
//!
//! Used when no database is configured and by HTTP integration tests. Each
//! repository serialises writes through a tokio `RwLock`, which makes the
//! check and insert in `insert_if_absent` atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    InsertOutcome, SitePersistenceError, SiteRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Identity, Site, SiteKey, User, UserId};

/// Sites held in process memory; lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySiteRepository {
    sites: RwLock<HashMap<SiteKey, Site>>,
}

#[async_trait]
impl SiteRepository for InMemorySiteRepository {
    async fn find_by_key(&self, key: &SiteKey) -> Result<Option<Site>, SitePersistenceError> {
        Ok(self.sites.read().await.get(key).cloned())
    }

    async fn insert_if_absent(&self, site: &Site) -> Result<InsertOutcome, SitePersistenceError> {
        let mut sites = self.sites.write().await;
        if sites.contains_key(site.key()) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        sites.insert(site.key().clone(), site.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Site>, SitePersistenceError> {
        let mut owned: Vec<Site> = self
            .sites
            .read()
            .await
            .values()
            .filter(|site| site.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            a.audit()
                .created_at
                .cmp(&b.audit().created_at)
                .then_with(|| a.key().cmp(b.key()))
        });
        Ok(owned)
    }
}

/// Users held in process memory, keyed by identity.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Identity, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(identity).cloned())
    }

    async fn insert_if_absent(&self, user: &User) -> Result<InsertOutcome, UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.identity()) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        users.insert(user.identity().clone(), user.clone());
        Ok(InsertOutcome::Inserted)
    }
}
