//! Station report assembly: look up a site, fetch its four clientraw files in
//! order and map them through the station format.
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::domain::ports::{
    SitePersistenceError, SiteRepository, SnapshotCache, SnapshotSource, SnapshotSourceError,
    StationReportQuery,
};
use crate::domain::{
    ClientrawFile, CurrentReadings, Error, SeriesReadings, Site, SiteKey, SitePath, StationFormat,
    map_core, map_current, map_series, map_split_series,
};

/// Message returned when no site matches the requested id.
pub const SITE_NOT_FOUND_MESSAGE: &str = "site does not exist";
/// Message returned when a station file holds no usable data.
pub const FETCH_DATA_MESSAGE: &str = "unable to fetch data";

/// Readings for one site, grouped by source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StationReport {
    /// Every `clientraw.txt` field.
    #[schema(value_type = Object)]
    pub current: CurrentReadings,
    /// Per-minute history from `clientrawhour.txt`.
    #[schema(value_type = Object)]
    pub lasthour: SeriesReadings,
    /// Per-hour history from `clientrawextra.txt`.
    #[schema(value_type = Object)]
    pub lastday: SeriesReadings,
    /// Per-day history from `clientrawdaily.txt`.
    #[schema(value_type = Object)]
    pub lastmonth: SeriesReadings,
    /// Headline readings copied from `current`.
    #[schema(value_type = Object)]
    pub core: CurrentReadings,
}

/// Report service implementing [`StationReportQuery`].
#[derive(Clone)]
pub struct StationReportService {
    sites: Arc<dyn SiteRepository>,
    source: Arc<dyn SnapshotSource>,
    cache: Arc<dyn SnapshotCache>,
    format: Arc<StationFormat>,
}

impl StationReportService {
    /// Create a service over the given repository, fetcher, cache and table.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use weather_proxy::domain::StationReportService;
    /// # use weather_proxy::domain::StationFormat;
    /// # use weather_proxy::domain::ports::{FixtureSnapshotSource, NoOpSnapshotCache};
    /// # use weather_proxy::outbound::memory::InMemorySiteRepository;
    /// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let service = StationReportService::new(
    ///     Arc::new(InMemorySiteRepository::default()),
    ///     Arc::new(FixtureSnapshotSource),
    ///     Arc::new(NoOpSnapshotCache),
    ///     Arc::new(StationFormat::builtin()?),
    /// );
    /// # let _ = service;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        sites: Arc<dyn SiteRepository>,
        source: Arc<dyn SnapshotSource>,
        cache: Arc<dyn SnapshotCache>,
        format: Arc<StationFormat>,
    ) -> Self {
        Self {
            sites,
            source,
            cache,
            format,
        }
    }

    async fn find_site(&self, site_id: &str) -> Result<Site, Error> {
        // Ids that cannot be keys cannot be registered either.
        let Ok(key) = SiteKey::new(site_id) else {
            return Err(Error::not_found(SITE_NOT_FOUND_MESSAGE));
        };
        self.sites
            .find_by_key(&key)
            .await
            .map_err(map_site_repository_error)?
            .ok_or_else(|| Error::not_found(SITE_NOT_FOUND_MESSAGE))
    }

    async fn tokens(&self, path: &SitePath, file: ClientrawFile) -> Result<Vec<String>, Error> {
        match self.cache.get(path, file).await {
            Ok(Some(tokens)) => {
                debug!(%path, %file, "snapshot cache hit");
                return Ok(tokens);
            }
            Ok(None) => {}
            Err(err) => warn!(%path, %file, error = %err, "snapshot cache read failed"),
        }

        let tokens = self
            .source
            .fetch(path, file)
            .await
            .map_err(map_snapshot_error)?;

        if let Err(err) = self
            .cache
            .put(path, file, tokens.clone(), file.cache_ttl())
            .await
        {
            warn!(%path, %file, error = %err, "snapshot cache write failed");
        }
        Ok(tokens)
    }
}

#[async_trait]
impl StationReportQuery for StationReportService {
    async fn report(&self, site_id: &str) -> Result<StationReport, Error> {
        let site = self.find_site(site_id).await?;
        let path = site.path();
        let format = self.format.as_ref();

        let current_tokens = self.tokens(path, ClientrawFile::Current).await?;
        let current = map_current(&current_tokens, format.current());
        let core = map_core(&current, format.core());

        let hour_tokens = self.tokens(path, ClientrawFile::Hourly).await?;
        let lasthour = map_series(&hour_tokens, format.hourly(), format.units());

        let extra_tokens = self.tokens(path, ClientrawFile::Extra).await?;
        let lastday = map_split_series(&extra_tokens, format.daily(), format.units());

        let daily_tokens = self.tokens(path, ClientrawFile::Daily).await?;
        let lastmonth = map_series(&daily_tokens, format.monthly(), format.units());

        debug!(key = %site.key(), "station report assembled");
        Ok(StationReport {
            current,
            lasthour,
            lastday,
            lastmonth,
            core,
        })
    }
}

pub(crate) fn map_site_repository_error(error: SitePersistenceError) -> Error {
    match error {
        SitePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("site repository unavailable: {message}"))
        }
        SitePersistenceError::Query { message } => {
            Error::internal(format!("site repository error: {message}"))
        }
    }
}

fn map_snapshot_error(error: SnapshotSourceError) -> Error {
    warn!(error = %error, "station fetch failed");
    match error {
        SnapshotSourceError::Empty { .. } => Error::fetch_data(FETCH_DATA_MESSAGE),
        SnapshotSourceError::Transport { url, .. } | SnapshotSourceError::Status { url, .. } => {
            Error::content_fetch(format!("Error retrieving data from url: {url}"))
        }
    }
}
