//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InsertOutcome, UserPersistenceError, UserRepository};
use crate::domain::{AuditTrail, Identity, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let parse = |raw: String| {
        Identity::new(raw).map_err(|err| {
            UserPersistenceError::query(format!("invalid identity in database: {err}"))
        })
    };
    let audit = AuditTrail {
        created_at: row.created_at,
        created_by: parse(row.created_by)?,
        updated_at: row.updated_at,
        updated_by: parse(row.updated_by)?,
    };
    Ok(User::new(
        UserId::from_uuid(row.id),
        parse(row.identity)?,
        audit,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::identity.eq(identity.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn insert_if_absent(&self, user: &User) -> Result<InsertOutcome, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;
        let audit = user.audit();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            identity: user.identity().as_ref(),
            created_at: audit.created_at,
            created_by: audit.created_by.as_ref(),
            updated_at: audit.updated_at,
            updated_by: audit.updated_by.as_ref(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::identity)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(match inserted {
            0 => InsertOutcome::AlreadyExists,
            _ => InsertOutcome::Inserted,
        })
    }
}
