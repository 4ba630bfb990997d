//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Identity, User};

use super::{InsertOutcome, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Storage for users keyed by identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the user recorded for `identity`.
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Store `user` unless a record for its identity already exists.
    async fn insert_if_absent(&self, user: &User) -> Result<InsertOutcome, UserPersistenceError>;
}
