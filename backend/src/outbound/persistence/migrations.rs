//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from the `backend/migrations` directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// A synchronous connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying connection error.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply {
        /// Underlying harness error.
        message: String,
    },
    /// The blocking task running the migrations did not complete.
    #[error("migration task failed: {message}")]
    Task {
        /// Join error detail.
        message: String,
    },
}

/// Apply every pending migration against `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on a blocking
/// thread.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })?
}

fn apply(database_url: &str) -> Result<(), MigrationError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    info!(count = applied.len(), "database migrations applied");
    Ok(())
}
