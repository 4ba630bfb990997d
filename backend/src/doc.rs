//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the JSONP data endpoint, the admin surface and the
//! health probes together with the envelope schemas. Admin routes declare the
//! forwarded identity header as their security scheme.
//!
//! The generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::StationReport;
use crate::inbound::http::admin::{RegisterSiteForm, SiteList, SiteSummary};
use crate::inbound::http::envelope::{EnvelopeStatus, ErrorEnvelope};
use crate::inbound::http::identity::DEFAULT_IDENTITY_HEADER;

/// Enrich the generated document with the forwarded identity scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ForwardedIdentity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                DEFAULT_IDENTITY_HEADER,
                "Authenticated principal forwarded by the identity provider.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Weather station proxy API",
        description = "JSONP access to registered weather stations and site administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::api::station_report,
        crate::inbound::http::admin::list_sites,
        crate::inbound::http::admin::register_site,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        EnvelopeStatus,
        ErrorEnvelope,
        RegisterSiteForm,
        SiteList,
        SiteSummary,
        StationReport
    )),
    tags(
        (name = "api", description = "Station data for embedding pages"),
        (name = "admin", description = "Site registration for authenticated users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
