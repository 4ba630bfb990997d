//! Authenticated identity extraction.
//!
//! The hosted identity provider terminates authentication in front of the
//! service and forwards the principal in a request header. Handlers take an
//! [`AuthenticatedIdentity`] argument; requests without the header are
//! rejected with 401 before the handler runs.

use std::future::{Ready, ready};

use actix_web::http::header::HeaderName;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use tracing::debug;

use crate::domain::{Error, Identity};

/// Header used when no override is configured.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-authenticated-user";

/// Name of the header carrying the authenticated identity.
///
/// Register it with `App::app_data`; the extractor falls back to
/// [`DEFAULT_IDENTITY_HEADER`] when it is absent.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use weather_proxy::inbound::http::identity::IdentityHeader;
///
/// let header = IdentityHeader::parse("x-forwarded-user").expect("valid header name");
/// let _app = App::new().app_data(header);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeader(HeaderName);

impl IdentityHeader {
    /// Parse a header name, rejecting values that are not valid tokens.
    pub fn parse(name: &str) -> Result<Self, actix_web::http::header::InvalidHeaderName> {
        HeaderName::from_bytes(name.trim().as_bytes()).map(Self)
    }

    /// Header the extractor reads.
    pub fn name(&self) -> &HeaderName {
        &self.0
    }
}

impl Default for IdentityHeader {
    fn default() -> Self {
        Self(HeaderName::from_static(DEFAULT_IDENTITY_HEADER))
    }
}

/// Principal forwarded by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity(Identity);

impl AuthenticatedIdentity {
    /// Borrow the validated identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Take ownership of the identity.
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedIdentity, Error> {
    let fallback = IdentityHeader::default();
    let header = req.app_data::<IdentityHeader>().unwrap_or(&fallback);
    let raw = req
        .headers()
        .get(header.name())
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    Identity::new(raw.trim())
        .map(AuthenticatedIdentity)
        .map_err(|err| {
            debug!(header = %header.name(), reason = %err, "request lacks an identity");
            Error::unauthorized("authentication required")
        })
}

impl FromRequest for AuthenticatedIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;

    async fn echo(identity: AuthenticatedIdentity) -> HttpResponse {
        HttpResponse::Ok().body(identity.identity().to_string())
    }

    #[rstest]
    #[case::present(Some("ada@example.com"), StatusCode::OK)]
    #[case::padded(Some("  ada@example.com  "), StatusCode::OK)]
    #[case::blank(Some("   "), StatusCode::UNAUTHORIZED)]
    #[case::missing(None, StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn default_header_gates_requests(
        #[case] header: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let app =
            actix_test::init_service(App::new().route("/", web::get().to(echo))).await;
        let mut request = actix_test::TestRequest::get().uri("/");
        if let Some(value) = header {
            request = request.insert_header((DEFAULT_IDENTITY_HEADER, value));
        }

        let response = actix_test::call_service(&app, request.to_request()).await;

        assert_eq!(response.status(), expected);
        if expected == StatusCode::OK {
            let body = actix_test::read_body(response).await;
            assert_eq!(body.as_ref(), b"ada@example.com");
        }
    }

    #[actix_web::test]
    async fn honours_configured_header() {
        let header = IdentityHeader::parse("x-forwarded-user").expect("valid header");
        let app = actix_test::init_service(
            App::new()
                .app_data(header)
                .route("/", web::get().to(echo)),
        )
        .await;

        let default_only = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((DEFAULT_IDENTITY_HEADER, "ada@example.com"))
            .to_request();
        let response = actix_test::call_service(&app, default_only).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let configured = actix_test::TestRequest::get()
            .uri("/")
            .insert_header(("x-forwarded-user", "ada@example.com"))
            .to_request();
        let response = actix_test::call_service(&app, configured).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn rejects_invalid_header_names() {
        assert!(IdentityHeader::parse("not a header").is_err());
    }
}
