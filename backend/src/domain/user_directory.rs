//! Lazy user provisioning behind the [`UserDirectory`] port.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{UserDirectory, UserPersistenceError, UserRepository};
use crate::domain::{AuditTrail, Error, Identity, User, UserId};

/// Looks users up by identity and creates them on first sight.
#[derive(Clone)]
pub struct UserDirectoryService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserDirectoryService {
    /// Create a directory over `users`.
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    async fn find(&self, identity: &Identity) -> Result<Option<User>, Error> {
        self.users
            .find_by_identity(identity)
            .await
            .map_err(map_user_repository_error)
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryService {
    async fn resolve(&self, identity: &Identity) -> Result<User, Error> {
        if let Some(user) = self.find(identity).await? {
            return Ok(user);
        }

        let audit = AuditTrail::created(identity.clone(), self.clock.utc());
        let candidate = User::new(UserId::random(), identity.clone(), audit);
        let outcome = self
            .users
            .insert_if_absent(&candidate)
            .await
            .map_err(map_user_repository_error)?;
        if outcome.is_inserted() {
            info!(user = %candidate.id(), "user created");
            return Ok(candidate);
        }

        // Lost a race with a concurrent first request for the same identity.
        self.find(identity)
            .await?
            .ok_or_else(|| Error::internal("user vanished after conflicting insert"))
    }
}

fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}
