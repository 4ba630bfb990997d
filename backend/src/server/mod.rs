//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use weather_proxy::Trace;
#[cfg(debug_assertions)]
use weather_proxy::doc::ApiDoc;
use weather_proxy::inbound::http::admin::{list_sites, register_site};
use weather_proxy::inbound::http::api::station_report;
use weather_proxy::inbound::http::health::{HealthState, live, ready};
use weather_proxy::inbound::http::identity::IdentityHeader;
use weather_proxy::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    identity_header: IdentityHeader,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        identity_header,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(identity_header)
        .wrap(Trace)
        .service(station_report)
        .service(list_sites)
        .service(register_site)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Bind the HTTP server and flip `health_state` to ready.
///
/// The returned [`Server`] does nothing until awaited.
///
/// # Errors
///
/// Fails if the station HTTP client cannot be built or the address cannot be
/// bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        bind_addr,
        identity_header,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::new(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            identity_header: identity_header.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
