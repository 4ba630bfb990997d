//! Shared HTTP adapter state.
//!
//! Handlers depend on domain ports only, so the wiring in `server` decides
//! whether Diesel, in-memory or test doubles sit behind them.

use std::sync::Arc;

use crate::domain::ports::{SiteAdministration, StationReportQuery, UserDirectory};

/// Port bundle injected into every handler through `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    /// Builds JSONP station reports.
    pub report: Arc<dyn StationReportQuery>,
    /// Registers and lists sites.
    pub sites: Arc<dyn SiteAdministration>,
    /// Resolves identities to users.
    pub users: Arc<dyn UserDirectory>,
}

/// Ports required to construct [`HttpState`].
pub struct HttpStatePorts {
    /// Implementation of [`StationReportQuery`].
    pub report: Arc<dyn StationReportQuery>,
    /// Implementation of [`SiteAdministration`].
    pub sites: Arc<dyn SiteAdministration>,
    /// Implementation of [`UserDirectory`].
    pub users: Arc<dyn UserDirectory>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use weather_proxy::domain::ports::{FixtureStationReportQuery, NoOpSiteProbe};
    /// use weather_proxy::domain::{SiteRegistrationService, UserDirectoryService};
    /// use weather_proxy::inbound::http::state::{HttpState, HttpStatePorts};
    /// use weather_proxy::outbound::memory::{InMemorySiteRepository, InMemoryUserRepository};
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::new(HttpStatePorts {
    ///     report: Arc::new(FixtureStationReportQuery),
    ///     sites: Arc::new(SiteRegistrationService::new(
    ///         Arc::new(InMemorySiteRepository::default()),
    ///         Arc::new(NoOpSiteProbe),
    ///         clock.clone(),
    ///     )),
    ///     users: Arc::new(UserDirectoryService::new(
    ///         Arc::new(InMemoryUserRepository::default()),
    ///         clock,
    ///     )),
    /// });
    /// let _report = state.report.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            report,
            sites,
            users,
        } = ports;
        Self {
            report,
            sites,
            users,
        }
    }
}
