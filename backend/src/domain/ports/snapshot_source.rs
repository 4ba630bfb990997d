//! Driven port for downloading clientraw snapshots from a station.
//!
//! Adapters return the whitespace-separated tokens of the first line of the
//! requested file. Mapping those tokens to readings is domain work.

use async_trait::async_trait;

use crate::domain::{ClientrawFile, SitePath};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while fetching a snapshot.
    pub enum SnapshotSourceError {
        /// The request failed before a response arrived.
        Transport { url: String, message: String } =>
            "failed to retrieve {url}: {message}",
        /// The station answered with a non-success status.
        Status { url: String, status: u16 } =>
            "{url} answered with HTTP {status}",
        /// The file was empty or its first line carried no tokens.
        Empty { url: String } =>
            "{url} contained no data",
    }
}

/// Port for reading one clientraw file from a site.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch and tokenise `file` under `path`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use weather_proxy::domain::ports::{FixtureSnapshotSource, SnapshotSource};
    /// use weather_proxy::domain::{ClientrawFile, SitePath};
    ///
    /// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let path = SitePath::parse("http://example.com/wx/")?;
    /// let tokens = FixtureSnapshotSource
    ///     .fetch(&path, ClientrawFile::Current)
    ///     .await?;
    /// assert!(!tokens.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    async fn fetch(
        &self,
        path: &SitePath,
        file: ClientrawFile,
    ) -> Result<Vec<String>, SnapshotSourceError>;
}

/// Deterministic source that numbers each token by position.
///
/// Every file yields `"12345"` followed by the token indices `1..=600`, enough
/// to cover any range in the bundled station format.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSnapshotSource;

/// Number of tokens produced by [`FixtureSnapshotSource`].
pub const FIXTURE_TOKEN_COUNT: usize = 601;

#[async_trait]
impl SnapshotSource for FixtureSnapshotSource {
    async fn fetch(
        &self,
        _path: &SitePath,
        _file: ClientrawFile,
    ) -> Result<Vec<String>, SnapshotSourceError> {
        let header = std::iter::once("12345".to_owned());
        Ok(header
            .chain((1..FIXTURE_TOKEN_COUNT).map(|index| index.to_string()))
            .collect())
    }
}
