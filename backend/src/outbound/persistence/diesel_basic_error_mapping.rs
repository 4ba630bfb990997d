//! Diesel and pool error mapping shared by the site and user repositories.
//!
//! Both repositories expose the same `Connection` / `Query` error shape, so
//! the mapping takes the target constructors as closures.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the repository's connection constructor.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure through the repository's query or connection
/// constructor.
///
/// Database detail is logged at `debug` and never copied into the error
/// message.
pub(super) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}
