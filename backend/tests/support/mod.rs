//! Shared helpers for the HTTP integration tests.
//!
//! Each test builds the real domain services over in-memory repositories and
//! a reqwest station fetcher pointed at a `wiremock` server standing in for a
//! weather station.
#![allow(dead_code, reason = "each test binary uses a subset of these helpers")]

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_proxy::Trace;
use weather_proxy::domain::ports::{NoOpSiteProbe, NoOpSnapshotCache, SiteProbe};
use weather_proxy::domain::{
    ClientrawFile, SiteRegistrationService, StationFormat, StationReportService,
    UserDirectoryService,
};
use weather_proxy::inbound::http::admin::{list_sites, register_site};
use weather_proxy::inbound::http::api::station_report;
use weather_proxy::inbound::http::state::{HttpState, HttpStatePorts};
use weather_proxy::outbound::clientraw::ClientrawHttpSource;
use weather_proxy::outbound::memory::{InMemorySiteRepository, InMemoryUserRepository};

/// Header the identity extractor reads by default.
pub const IDENTITY_HEADER: &str = "x-authenticated-user";
/// Directory under which the stub station publishes its files.
pub const STATION_DIR: &str = "/wx/";
/// Tokens per stub file: a header plus enough values for every range.
pub const TOKEN_COUNT: usize = 601;

/// Clientraw body whose token `i` is `i`, after a `12345` header token.
pub fn clientraw_body() -> String {
    std::iter::once("12345".to_owned())
        .chain((1..TOKEN_COUNT).map(|value| value.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serve all four clientraw files from [`STATION_DIR`].
pub async fn mount_station(server: &MockServer) {
    for file in ClientrawFile::ALL {
        mount_file(server, file, ResponseTemplate::new(200).set_body_string(clientraw_body()))
            .await;
    }
}

/// Serve one file with a custom response.
pub async fn mount_file(server: &MockServer, file: ClientrawFile, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("{STATION_DIR}{}", file.file_name())))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Base URL a user would register for the stub station.
pub fn station_url(server: &MockServer) -> String {
    format!("{}{STATION_DIR}", server.uri())
}

/// Wire the real services over in-memory storage with the built-in format.
pub fn build_state(probe_sites: bool) -> HttpState {
    build_state_with_format(
        probe_sites,
        StationFormat::builtin().expect("builtin format"),
    )
}

/// Wire the real services over in-memory storage with `format`.
pub fn build_state_with_format(probe_sites: bool, format: StationFormat) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let sites = Arc::new(InMemorySiteRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let source = Arc::new(
        ClientrawHttpSource::new(Duration::from_secs(2), clock.clone()).expect("client builds"),
    );
    let probe: Arc<dyn SiteProbe> = if probe_sites {
        source.clone()
    } else {
        Arc::new(NoOpSiteProbe)
    };
    let format = Arc::new(format);

    HttpState::new(HttpStatePorts {
        report: Arc::new(StationReportService::new(
            sites.clone(),
            source,
            Arc::new(NoOpSnapshotCache),
            format,
        )),
        sites: Arc::new(SiteRegistrationService::new(sites, probe, clock.clone())),
        users: Arc::new(UserDirectoryService::new(users, clock)),
    })
}

/// Application with the public routes, mirroring the server wiring.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(station_report)
        .service(list_sites)
        .service(register_site)
}
