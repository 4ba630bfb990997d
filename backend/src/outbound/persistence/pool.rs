//! Async connection pool for the site and user repositories.
//!
//! Wraps `diesel-async` and `bb8`. Repositories translate [`PoolError`] into
//! their own connection errors.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

/// Connections opened when no size is configured.
pub const DEFAULT_POOL_SIZE: u32 = 8;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(10);

define_port_error! {
    /// Failures raised while building the pool or checking out a connection.
    pub enum PoolError {
        /// No connection became available before the checkout timeout.
        Checkout { message: String } => "failed to get connection from pool: {message}",
        /// The pool could not be created, usually a bad URL or refused login.
        Build { message: String } => "failed to build connection pool: {message}",
    }
}

/// Pool settings.
///
/// # Example
///
/// ```
/// use weather_proxy::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://proxy@localhost/weather").with_max_size(4);
/// assert_eq!(config.database_url(), "postgres://proxy@localhost/weather");
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
}

impl PoolConfig {
    /// Settings for `database_url` with [`DEFAULT_POOL_SIZE`] connections.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Cap the number of open connections; zero is raised to one.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// PostgreSQL connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum number of pooled connections.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Shared PostgreSQL pool handed to every Diesel repository.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool, keeping one idle connection warm.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the URL is invalid or the first
    /// connection cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(1))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::build(err.to_string()))
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none frees up within ten seconds.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default(None, DEFAULT_POOL_SIZE)]
    #[case::explicit(Some(3), 3)]
    #[case::zero_is_clamped(Some(0), 1)]
    fn max_size_resolution(#[case] requested: Option<u32>, #[case] expected: u32) {
        let base = PoolConfig::new("postgres://localhost/weather");
        let config = match requested {
            Some(size) => base.with_max_size(size),
            None => base,
        };
        assert_eq!(config.max_size(), expected);
    }

    #[rstest]
    fn errors_keep_their_cause() {
        assert!(
            PoolError::checkout("connection refused")
                .to_string()
                .contains("connection refused")
        );
        assert!(PoolError::build("invalid URL").to_string().contains("invalid URL"));
    }
}
