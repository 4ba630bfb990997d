//! Driven port for checking a candidate site serves its files.

use async_trait::async_trait;

use crate::domain::{ClientrawFile, SitePath};

use super::define_port_error;

define_port_error! {
    /// Reasons a probe request failed.
    pub enum SiteProbeError {
        /// The request failed before a response arrived.
        Unreachable { url: String, message: String } =>
            "probe of {url} failed: {message}",
        /// The station answered with a non-success status.
        Status { url: String, status: u16 } =>
            "probe of {url} answered with HTTP {status}",
    }
}

impl SiteProbeError {
    /// URL that was probed.
    pub fn url(&self) -> &str {
        match self {
            Self::Unreachable { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

/// Port for a best-effort reachability check; content is not inspected.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteProbe: Send + Sync {
    /// Request `file` under `path` and report whether it was served.
    async fn probe(&self, path: &SitePath, file: ClientrawFile) -> Result<(), SiteProbeError>;
}

/// Probe that accepts every site; used when probing is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSiteProbe;

#[async_trait]
impl SiteProbe for NoOpSiteProbe {
    async fn probe(&self, _path: &SitePath, _file: ClientrawFile) -> Result<(), SiteProbeError> {
        Ok(())
    }
}
