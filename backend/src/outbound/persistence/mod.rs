//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the site and user repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic inserts**: `insert_if_absent` relies on `ON CONFLICT DO NOTHING`
//!   and reports the outcome from the affected row count.
//!
//! # Example
//!
//! ```no_run
//! use weather_proxy::outbound::persistence::{DbPool, DieselSiteRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/weather")).await?;
//! let repo = DieselSiteRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_site_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_site_repository::DieselSiteRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
