//! Site administration handlers.
//!
//! ```text
//! GET /admin
//! POST /admin  urlpath=http://station.example/wx/
//! ```
//!
//! Both routes require an [`AuthenticatedIdentity`]. The identity is resolved
//! to a local user (created on first sight) before any site work happens.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApiResult, Site, User};

use super::envelope::{ErrorEnvelope, SuccessEnvelope};
use super::identity::AuthenticatedIdentity;
use super::state::HttpState;

/// Location clients are redirected to after a registration.
pub const ADMIN_PATH: &str = "/admin";

/// Form body for `POST /admin`.
#[derive(Debug, Default, PartialEq, Eq, ToSchema)]
pub struct RegisterSiteForm {
    /// Base URL of the station's clientraw directory.
    pub urlpath: Option<String>,
}

impl RegisterSiteForm {
    /// Decode an `application/x-www-form-urlencoded` body.
    ///
    /// The content type is not checked. A missing body or field leaves
    /// `urlpath` unset, and a repeated field keeps its first value.
    pub fn from_body(body: &[u8]) -> Self {
        let urlpath = url::form_urlencoded::parse(body)
            .find(|(key, _)| key == "urlpath")
            .map(|(_, value)| value.into_owned());
        Self { urlpath }
    }
}

/// Registered site as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    /// Value to pass as `id` to `GET /api`.
    #[schema(example = "0123456789abcde")]
    pub key: String,
    /// Registered base URL.
    #[schema(example = "http://station.example/wx/")]
    pub path: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<&Site> for SiteSummary {
    fn from(site: &Site) -> Self {
        Self {
            key: site.key().to_string(),
            path: site.path().to_string(),
            created_at: site.audit().created_at,
        }
    }
}

/// Payload of `GET /admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SiteList {
    /// Sites in registration order.
    pub sites: Vec<SiteSummary>,
}

async fn resolve_user(state: &HttpState, identity: &AuthenticatedIdentity) -> ApiResult<User> {
    state.users.resolve(identity.identity()).await
}

/// List the caller's registered sites, oldest first.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Sites owned by the caller", body = SuccessEnvelope<SiteList>),
        (status = 401, description = "No authenticated identity", body = ErrorEnvelope),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelope)
    ),
    tags = ["admin"],
    operation_id = "listSites",
    security(("ForwardedIdentity" = []))
)]
#[get("/admin")]
pub async fn list_sites(
    state: web::Data<HttpState>,
    identity: AuthenticatedIdentity,
) -> ApiResult<web::Json<SuccessEnvelope<SiteList>>> {
    let user = resolve_user(&state, &identity).await?;
    let sites = state.sites.list_sites(&user).await?;
    Ok(web::Json(SuccessEnvelope::new(SiteList {
        sites: sites.iter().map(SiteSummary::from).collect(),
    })))
}

/// Register a new station and redirect back to the listing.
#[utoipa::path(
    post,
    path = "/admin",
    request_body(content = RegisterSiteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered; redirect to the listing"),
        (status = 400, description = "Invalid station URL", body = ErrorEnvelope),
        (status = 401, description = "No authenticated identity", body = ErrorEnvelope),
        (status = 502, description = "Station unreachable", body = ErrorEnvelope)
    ),
    tags = ["admin"],
    operation_id = "registerSite",
    security(("ForwardedIdentity" = []))
)]
#[post("/admin")]
pub async fn register_site(
    state: web::Data<HttpState>,
    identity: AuthenticatedIdentity,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let user = resolve_user(&state, &identity).await?;
    let path = RegisterSiteForm::from_body(&body).urlpath.unwrap_or_default();
    state.sites.register(&user, &path).await?;
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, ADMIN_PATH))
        .finish())
}
