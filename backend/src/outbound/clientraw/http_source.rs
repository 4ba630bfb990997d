//! Reqwest-backed clientraw source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout, HTTP
//! error mapping and first-line tokenisation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::domain::ports::{SnapshotSource, SnapshotSourceError};
use crate::domain::{ClientrawFile, SitePath};

const DEFAULT_USER_AGENT: &str = concat!("weather-proxy/", env!("CARGO_PKG_VERSION"));

/// Station file client performing plain HTTP GET requests.
///
/// Implements both [`SnapshotSource`] and, in `http_probe`, the
/// [`SiteProbe`](crate::domain::ports::SiteProbe) port.
#[derive(Clone)]
pub struct ClientrawHttpSource {
    pub(super) client: Client,
    clock: Arc<dyn Clock>,
}

impl ClientrawHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration, clock: Arc<dyn Clock>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, clock })
    }

    /// Snapshot URL with a timestamp query so intermediaries never serve a
    /// stale copy.
    fn snapshot_url(&self, path: &SitePath, file: ClientrawFile) -> String {
        format!(
            "{}?{}",
            path.file_url(file.file_name()),
            self.clock.utc().timestamp()
        )
    }
}

#[async_trait]
impl SnapshotSource for ClientrawHttpSource {
    async fn fetch(
        &self,
        path: &SitePath,
        file: ClientrawFile,
    ) -> Result<Vec<String>, SnapshotSourceError> {
        let url = self.snapshot_url(path, file);
        debug!(%url, "fetching station snapshot");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|error| map_transport_error(&url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(&url, status));
        }

        let body = response
            .text()
            .await
            .map_err(|error| map_transport_error(&url, &error))?;
        first_line_tokens(&body).ok_or_else(|| SnapshotSourceError::empty(url))
    }
}

/// Whitespace tokens of the first line, or `None` when there are none.
pub(super) fn first_line_tokens(body: &str) -> Option<Vec<String>> {
    let tokens: Vec<String> = body
        .lines()
        .next()?
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    (!tokens.is_empty()).then_some(tokens)
}

fn map_transport_error(url: &str, error: &reqwest::Error) -> SnapshotSourceError {
    let message = if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    };
    SnapshotSourceError::transport(url, message)
}

fn map_status_error(url: &str, status: StatusCode) -> SnapshotSourceError {
    SnapshotSourceError::status(url, status.as_u16())
}

#[cfg(test)]
mod tests {
    //! Transport behaviour against a local mock station.

    use super::*;
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use rstest::rstest;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> ClientrawHttpSource {
        let mut clock = MockClock::new();
        clock
            .expect_utc()
            .return_const(Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp"));
        ClientrawHttpSource::new(Duration::from_secs(2), Arc::new(clock)).expect("client")
    }

    fn site(server: &MockServer) -> SitePath {
        SitePath::parse(format!("{}/wx/", server.uri())).expect("site path")
    }

    #[rstest]
    #[case::single_line("12345 1.5 2.0", Some(vec!["12345", "1.5", "2.0"]))]
    #[case::extra_lines("a b\nc d", Some(vec!["a", "b"]))]
    #[case::padded("  a \t b  \r\n", Some(vec!["a", "b"]))]
    #[case::empty("", None)]
    #[case::blank_first_line("\nsecond line", None)]
    fn tokenises_only_the_first_line(#[case] body: &str, #[case] expected: Option<Vec<&str>>) {
        let expected = expected.map(|tokens| tokens.into_iter().map(str::to_owned).collect());
        assert_eq!(first_line_tokens(body), expected);
    }

    #[tokio::test]
    async fn fetches_tokens_with_a_timestamp_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wx/clientrawhour.txt"))
            .and(query_param("1700000000", ""))
            .respond_with(ResponseTemplate::new(200).set_body_string("12345 10 20 30\nignored"))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = source()
            .fetch(&site(&server), ClientrawFile::Hourly)
            .await
            .expect("tokens");

        assert_eq!(tokens, vec!["12345", "10", "20", "30"]);
    }

    #[tokio::test]
    async fn empty_bodies_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wx/clientraw.txt"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = source()
            .fetch(&site(&server), ClientrawFile::Current)
            .await
            .expect_err("empty body");

        assert!(matches!(err, SnapshotSourceError::Empty { .. }));
    }

    #[tokio::test]
    async fn non_success_statuses_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wx/clientrawdaily.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source()
            .fetch(&site(&server), ClientrawFile::Daily)
            .await
            .expect_err("missing file");

        assert!(matches!(err, SnapshotSourceError::Status { status: 404, .. }));
    }

    /// Address that was bound and released, so connections are refused.
    fn closed_port() -> std::net::SocketAddr {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local address")
    }

    #[tokio::test]
    async fn unreachable_hosts_are_transport_errors() {
        let path = SitePath::parse(format!("http://{}/wx/", closed_port())).expect("path");

        let err = source()
            .fetch(&path, ClientrawFile::Extra)
            .await
            .expect_err("connection refused");

        assert!(matches!(err, SnapshotSourceError::Transport { .. }));
    }

    #[tokio::test]
    async fn slow_stations_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("1 2 3")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = source()
            .fetch(&site(&server), ClientrawFile::Current)
            .await
            .expect_err("timeout");

        match err {
            SnapshotSourceError::Transport { message, .. } => {
                assert!(message.starts_with("timed out"), "message: {message}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
