//! Site registration service implementing the [`SiteAdministration`] port.
//!
//! Registration validates the path, optionally probes the station for
//! `clientraw.txt`, then offers successive digest-prefix keys to the
//! repository until one insert succeeds. The repository's conditional insert
//! is the only arbiter of key uniqueness.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{SiteAdministration, SiteProbe, SiteProbeError, SiteRepository};
use crate::domain::station_report::map_site_repository_error;
use crate::domain::{
    AuditTrail, ClientrawFile, Error, SITE_KEY_MAX_LEN, Site, SiteKey, SitePath,
    SiteValidationError, User,
};

/// Registration service over a site repository and a reachability probe.
#[derive(Clone)]
pub struct SiteRegistrationService {
    sites: Arc<dyn SiteRepository>,
    probe: Arc<dyn SiteProbe>,
    clock: Arc<dyn Clock>,
}

impl SiteRegistrationService {
    /// Create a registration service.
    pub fn new(
        sites: Arc<dyn SiteRepository>,
        probe: Arc<dyn SiteProbe>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sites,
            probe,
            clock,
        }
    }

    async fn validate(&self, raw: &str) -> Result<SitePath, Error> {
        let path = SitePath::parse(raw).map_err(map_validation_error)?;
        self.probe
            .probe(&path, ClientrawFile::PROBE)
            .await
            .map_err(map_probe_error)?;
        Ok(path)
    }
}

#[async_trait]
impl SiteAdministration for SiteRegistrationService {
    async fn register(&self, owner: &User, path: &str) -> Result<Site, Error> {
        let path = self.validate(path).await?;
        let audit = AuditTrail::created(owner.identity().clone(), self.clock.utc());

        for key in SiteKey::candidates(&path) {
            let site = Site::new(key, path.clone(), owner.id().clone(), audit.clone());
            let outcome = self
                .sites
                .insert_if_absent(&site)
                .await
                .map_err(map_site_repository_error)?;
            if outcome.is_inserted() {
                info!(key = %site.key(), %path, owner = %owner.id(), "site registered");
                return Ok(site);
            }
        }

        Err(Error::internal(format!(
            "every key up to {SITE_KEY_MAX_LEN} characters is taken for {path}"
        )))
    }

    async fn list_sites(&self, owner: &User) -> Result<Vec<Site>, Error> {
        self.sites
            .list_by_owner(owner.id())
            .await
            .map_err(map_site_repository_error)
    }
}

fn map_validation_error(error: SiteValidationError) -> Error {
    match error {
        SiteValidationError::InvalidProtocol => Error::invalid_protocol(error.to_string()),
        other => Error::invalid_request(other.to_string()),
    }
}

fn map_probe_error(error: SiteProbeError) -> Error {
    warn!(error = %error, "site probe failed");
    Error::content_fetch(format!(
        "Error retrieving testing value from url: {}",
        error.url()
    ))
}
