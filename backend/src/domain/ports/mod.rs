//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod insert_outcome;
mod site_administration;
mod site_probe;
mod site_repository;
mod snapshot_cache;
mod snapshot_source;
mod station_report_query;
mod user_directory;
mod user_repository;

pub use insert_outcome::InsertOutcome;
#[cfg(test)]
pub use site_administration::MockSiteAdministration;
pub use site_administration::SiteAdministration;
#[cfg(test)]
pub use site_probe::MockSiteProbe;
pub use site_probe::{NoOpSiteProbe, SiteProbe, SiteProbeError};
#[cfg(test)]
pub use site_repository::MockSiteRepository;
pub use site_repository::{SitePersistenceError, SiteRepository};
#[cfg(test)]
pub use snapshot_cache::MockSnapshotCache;
pub use snapshot_cache::{NoOpSnapshotCache, SnapshotCache, SnapshotCacheError};
#[cfg(test)]
pub use snapshot_source::MockSnapshotSource;
pub use snapshot_source::{
    FIXTURE_TOKEN_COUNT, FixtureSnapshotSource, SnapshotSource, SnapshotSourceError,
};
#[cfg(test)]
pub use station_report_query::MockStationReportQuery;
pub use station_report_query::{FixtureStationReportQuery, StationReportQuery};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
