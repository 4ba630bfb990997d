//! Service entry-point: loads settings and the station format, prepares
//! storage and serves the JSONP, admin and health endpoints.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use weather_proxy::domain::StationFormat;
use weather_proxy::inbound::http::health::HealthState;
use weather_proxy::inbound::http::identity::IdentityHeader;
use weather_proxy::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let config = build_config(&settings).await?;
    info!(addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}

/// Layer CLI arguments over `WEATHER_PROXY_*` variables and config files.
fn load_settings<I>(args: I) -> Result<ServerSettings>
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    ServerSettings::load_from_iter(args).wrap_err("failed to load settings")
}

fn load_station_format(settings: &ServerSettings) -> Result<StationFormat> {
    match &settings.station_format_path {
        Some(path) => StationFormat::load(path)
            .wrap_err_with(|| format!("failed to load station format {}", path.display())),
        None => StationFormat::builtin().wrap_err("built-in station format is invalid"),
    }
}

async fn build_config(settings: &ServerSettings) -> Result<ServerConfig> {
    let format = load_station_format(settings)?;
    info!(format = format.name(), "station format loaded");

    let identity_header = IdentityHeader::parse(settings.identity_header())
        .wrap_err("invalid identity header name")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;

    let config = ServerConfig::new(bind_addr, Arc::new(format))
        .with_identity_header(identity_header)
        .with_fetch_timeout(settings.fetch_timeout())
        .with_site_probe(settings.probe_sites)
        .with_snapshot_cache(settings.snapshot_cache);

    let config = match &settings.database_url {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            let mut pool_config = PoolConfig::new(url.as_str());
            if let Some(size) = settings.database_pool_size {
                pool_config = pool_config.with_max_size(size);
            }
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("failed to create database pool")?;
            config.with_db_pool(pool)
        }
        None => {
            info!("no database configured; sites are kept in memory");
            config
        }
    };

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("weather_proxy")
            .endpoint("/metrics")
            .build()
    }));

    Ok(config)
}

/// Build Prometheus middleware, logging and continuing without it on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> std::result::Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "metrics initialisation failed; continuing without /metrics");
            None
        }
    }
}
