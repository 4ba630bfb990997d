//! Helpers for handler tests.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureStationReportQuery, MockSiteAdministration, MockUserDirectory, SiteAdministration,
    StationReportQuery, UserDirectory,
};

use super::state::{HttpState, HttpStatePorts};

/// State whose admin ports panic if called.
pub fn state_with_report(report: Arc<dyn StationReportQuery>) -> HttpState {
    let mut sites = MockSiteAdministration::new();
    sites.expect_register().never();
    sites.expect_list_sites().never();
    let mut users = MockUserDirectory::new();
    users.expect_resolve().never();
    HttpState::new(HttpStatePorts {
        report,
        sites: Arc::new(sites),
        users: Arc::new(users),
    })
}

/// State for admin handler tests; the report port returns `NotFound`.
pub fn state_with_admin(
    sites: Arc<dyn SiteAdministration>,
    users: Arc<dyn UserDirectory>,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        report: Arc::new(FixtureStationReportQuery),
        sites,
        users,
    })
}
