//! JSONP station data endpoint.
//!
//! ```text
//! GET /api?id=0123456789abcde&callback=render
//! render({"status":"success","data":{"current":{...},"core":{...},...}})
//! ```
//!
//! Parameter problems are answered with plain JSON and HTTP 400 because no
//! usable callback exists. Once the callback is valid every outcome, failures
//! included, is wrapped in it and served with HTTP 200 so the page script
//! always runs.

use std::sync::OnceLock;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, web};
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::{ApiResult, Error};

use super::envelope::{ErrorEnvelope, SuccessEnvelope};
use super::error::envelope_for;
use super::state::HttpState;

/// Description returned when either query parameter is missing.
pub const MISSING_PARAMETERS_MESSAGE: &str = "id and callback parameter must be provided";
/// Longest accepted callback name.
pub const CALLBACK_MAX: usize = 128;

const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript; charset=utf-8";

static CALLBACK_RE: OnceLock<Regex> = OnceLock::new();

fn callback_regex() -> &'static Regex {
    CALLBACK_RE.get_or_init(|| {
        // Dotted identifier path such as `render` or `app.widgets.render`.
        let pattern = r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("callback regex failed to compile: {error}"))
    })
}

/// Query string accepted by `GET /api`.
#[derive(Debug, Default, PartialEq, Eq, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApiQuery {
    /// Site key issued at registration.
    pub id: Option<String>,
    /// JavaScript function path receiving the envelope.
    pub callback: Option<String>,
}

impl ApiQuery {
    /// Read `id` and `callback` from a raw query string.
    ///
    /// Repeated parameters keep their first value and unknown ones are
    /// ignored, so malformed query strings still reach the envelope path.
    ///
    /// # Examples
    /// ```
    /// use weather_proxy::inbound::http::api::ApiQuery;
    ///
    /// let query = ApiQuery::from_query_string("id=abc&id=def&callback=cb&x=1");
    /// assert_eq!(query.id.as_deref(), Some("abc"));
    /// assert_eq!(query.callback.as_deref(), Some("cb"));
    /// ```
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "id" => &mut query.id,
                "callback" => &mut query.callback,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

/// A callback name that is safe to echo into a script response.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Callback(String);

impl Callback {
    fn parse(raw: &str) -> Result<Self, Error> {
        let candidate = raw.trim();
        if candidate.len() > CALLBACK_MAX || !callback_regex().is_match(candidate) {
            return Err(Error::invalid_request(
                "callback must be a valid JavaScript identifier",
            ));
        }
        Ok(Self(candidate.to_owned()))
    }

    fn wrap(&self, json: &str) -> String {
        format!("{}({json})", self.0)
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Serve a station report wrapped in the caller's callback.
#[utoipa::path(
    get,
    path = "/api",
    params(ApiQuery),
    responses(
        (
            status = 200,
            description = "Envelope wrapped in the callback; success or error",
            content_type = "application/javascript",
            body = String
        ),
        (status = 400, description = "Missing or invalid parameters", body = ErrorEnvelope)
    ),
    tags = ["api"],
    operation_id = "stationReport"
)]
#[get("/api")]
pub async fn station_report(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let ApiQuery { id, callback } = ApiQuery::from_query_string(request.query_string());
    let (Some(id), Some(callback)) = (required(id.as_deref()), required(callback.as_deref()))
    else {
        return Err(Error::missing_parameter(MISSING_PARAMETERS_MESSAGE));
    };
    let callback = Callback::parse(callback)?;

    let body = match state.report.report(id).await {
        Ok(report) => serde_json::to_string(&SuccessEnvelope::new(report)),
        Err(err) => {
            debug!(site = id, code = ?err.code(), "station report failed");
            serde_json::to_string(&envelope_for(&err))
        }
    }
    .map_err(|err| {
        warn!(error = %err, "failed to serialise station envelope");
        Error::internal(format!("failed to serialise station envelope: {err}"))
    })?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, JAVASCRIPT_CONTENT_TYPE))
        .body(callback.wrap(&body)))
}
