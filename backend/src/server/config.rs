//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use weather_proxy::domain::StationFormat;
use weather_proxy::inbound::http::identity::IdentityHeader;
use weather_proxy::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) format: Arc<StationFormat>,
    pub(crate) identity_header: IdentityHeader,
    pub(crate) fetch_timeout: Duration,
    pub(crate) probe_sites: bool,
    pub(crate) snapshot_cache: bool,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage, site probing on and
    /// no snapshot cache.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, format: Arc<StationFormat>) -> Self {
        Self {
            bind_addr,
            format,
            identity_header: IdentityHeader::default(),
            fetch_timeout: Duration::from_secs(10),
            probe_sites: true,
            snapshot_cache: false,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool; sites and users are then stored in
    /// PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_identity_header(mut self, header: IdentityHeader) -> Self {
        self.identity_header = header;
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Toggle the reachability check run before a site is registered.
    #[must_use]
    pub fn with_site_probe(mut self, enabled: bool) -> Self {
        self.probe_sites = enabled;
        self
    }

    /// Toggle the in-process TTL cache for fetched station files.
    #[must_use]
    pub fn with_snapshot_cache(mut self, enabled: bool) -> Self {
        self.snapshot_cache = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
