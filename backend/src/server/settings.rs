//! Runtime settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `WEATHER_PROXY_*` environment variables and
//! configuration files.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use weather_proxy::inbound::http::identity::DEFAULT_IDENTITY_HEADER;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Settings controlling the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEATHER_PROXY")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; sites are kept in memory when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_pool_size: Option<u32>,
    /// Station format table; the built-in Weather Display table when absent.
    pub station_format_path: Option<PathBuf>,
    /// Header carrying the authenticated identity.
    pub identity_header: Option<String>,
    /// Timeout applied to every upstream station request.
    pub fetch_timeout_secs: Option<u64>,
    /// Check that `clientraw.txt` is reachable before registering a site.
    #[ortho_config(default = true)]
    pub probe_sites: bool,
    /// Cache fetched station files for their refresh interval.
    #[ortho_config(default = false)]
    pub snapshot_cache: bool,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Identity header name, `x-authenticated-user` unless overridden.
    pub fn identity_header(&self) -> &str {
        self.identity_header
            .as_deref()
            .unwrap_or(DEFAULT_IDENTITY_HEADER)
    }

    /// Upstream request timeout, ten seconds unless overridden.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(
            self.fetch_timeout_secs
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        )
    }
}
