//! Reachability probe for candidate sites.

use async_trait::async_trait;
use tracing::debug;

use super::ClientrawHttpSource;
use crate::domain::ports::{SiteProbe, SiteProbeError};
use crate::domain::{ClientrawFile, SitePath};

#[async_trait]
impl SiteProbe for ClientrawHttpSource {
    async fn probe(&self, path: &SitePath, file: ClientrawFile) -> Result<(), SiteProbeError> {
        let url = path.file_url(file.file_name());
        debug!(%url, "probing site");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|error| SiteProbeError::unreachable(url.as_str(), error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SiteProbeError::status(url, status.as_u16()))
        }
    }
}
