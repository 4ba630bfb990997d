//! Builders wiring outbound adapters into the HTTP state ports.
//!
//! Storage is Diesel-backed when a pool is configured and in-memory
//! otherwise; probing and snapshot caching fall back to no-op adapters when
//! disabled.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use weather_proxy::domain::ports::{
    NoOpSiteProbe, NoOpSnapshotCache, SiteProbe, SiteRepository, SnapshotCache, UserRepository,
};
use weather_proxy::domain::{SiteRegistrationService, StationReportService, UserDirectoryService};
use weather_proxy::inbound::http::state::{HttpState, HttpStatePorts};
use weather_proxy::outbound::cache::InMemorySnapshotCache;
use weather_proxy::outbound::clientraw::ClientrawHttpSource;
use weather_proxy::outbound::memory::{InMemorySiteRepository, InMemoryUserRepository};
use weather_proxy::outbound::persistence::{DbPool, DieselSiteRepository, DieselUserRepository};

use super::ServerConfig;

fn build_repositories(pool: Option<&DbPool>) -> (Arc<dyn SiteRepository>, Arc<dyn UserRepository>) {
    match pool {
        Some(pool) => (
            Arc::new(DieselSiteRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemorySiteRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        ),
    }
}

fn build_probe(enabled: bool, source: &Arc<ClientrawHttpSource>) -> Arc<dyn SiteProbe> {
    if enabled {
        source.clone()
    } else {
        Arc::new(NoOpSiteProbe)
    }
}

fn build_cache(enabled: bool, clock: &Arc<dyn Clock>) -> Arc<dyn SnapshotCache> {
    if enabled {
        Arc::new(InMemorySnapshotCache::new(clock.clone()))
    } else {
        Arc::new(NoOpSnapshotCache)
    }
}

/// Assemble the domain services behind the HTTP handlers.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client for station fetches cannot
/// be constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (sites, users) = build_repositories(config.db_pool.as_ref());
    let source = Arc::new(
        ClientrawHttpSource::new(config.fetch_timeout, clock.clone())
            .map_err(|err| std::io::Error::other(format!("station HTTP client: {err}")))?,
    );

    let report = StationReportService::new(
        sites.clone(),
        source.clone(),
        build_cache(config.snapshot_cache, &clock),
        config.format.clone(),
    );
    let registration = SiteRegistrationService::new(
        sites,
        build_probe(config.probe_sites, &source),
        clock.clone(),
    );
    let directory = UserDirectoryService::new(users, clock);

    Ok(HttpState::new(HttpStatePorts {
        report: Arc::new(report),
        sites: Arc::new(registration),
        users: Arc::new(directory),
    }))
}

#[cfg(test)]
mod tests {
    //! Wiring checks against the in-memory adapters.

    use super::*;
    use rstest::{fixture, rstest};
    use weather_proxy::domain::{ErrorCode, Identity, StationFormat};

    #[fixture]
    fn config() -> ServerConfig {
        let addr = "127.0.0.1:0".parse().expect("valid address");
        ServerConfig::new(addr, Arc::new(StationFormat::builtin().expect("builtin format")))
            .with_site_probe(false)
    }

    #[rstest]
    #[actix_rt::test]
    async fn in_memory_state_reports_unknown_sites(config: ServerConfig) {
        let state = build_http_state(&config).expect("state builds");

        let err = state
            .report
            .report("0123456789abcde")
            .await
            .expect_err("no sites registered");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[actix_rt::test]
    async fn in_memory_state_registers_and_lists_sites(config: ServerConfig) {
        let state = build_http_state(&config.with_snapshot_cache(true)).expect("state builds");
        let identity = Identity::new("ada@example.com").expect("valid identity");
        let user = state.users.resolve(&identity).await.expect("user resolves");

        let site = state
            .sites
            .register(&user, "http://station.example/wx/")
            .await
            .expect("probe disabled, registration succeeds");
        let listed = state.sites.list_sites(&user).await.expect("listing works");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key(), site.key());
    }

    #[rstest]
    #[case::enabled(true)]
    #[case::disabled(false)]
    fn probe_selection_follows_flag(#[case] enabled: bool) {
        let source = Arc::new(
            ClientrawHttpSource::new(std::time::Duration::from_secs(1), Arc::new(DefaultClock))
                .expect("client builds"),
        );
        let probe = build_probe(enabled, &source);
        let shares_source = Arc::as_ptr(&probe).cast::<()>() == Arc::as_ptr(&source).cast::<()>();
        assert_eq!(shares_source, enabled);
    }
}
