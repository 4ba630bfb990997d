//! Driving port for building a station report.
//!
//! The JSONP handler calls this port with the raw `id` parameter and renders
//! whatever comes back; it never talks to stations or storage directly.

use async_trait::async_trait;

use crate::domain::{Error, StationReport};

/// Domain use-case port for the public weather API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StationReportQuery: Send + Sync {
    /// Build the report for the site registered under `site_id`.
    async fn report(&self, site_id: &str) -> Result<StationReport, Error>;
}

/// Query that knows no sites; every lookup fails with "site does not exist".
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStationReportQuery;

#[async_trait]
impl StationReportQuery for FixtureStationReportQuery {
    async fn report(&self, _site_id: &str) -> Result<StationReport, Error> {
        Err(Error::not_found("site does not exist"))
    }
}
