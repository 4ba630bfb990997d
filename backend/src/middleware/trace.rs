//! Request tracing middleware.
//!
//! Every request runs inside a [`TraceId`] scope and a `request` span. An
//! incoming `trace-id` header holding a UUID is adopted so ids can be
//! correlated across the identity proxy and this service; otherwise a fresh
//! id is generated. The id is echoed on the response, errors included.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory; wrap the `App` with it.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use weather_proxy::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

#[doc(hidden)]
pub struct TraceMiddleware<S> {
    service: S,
}

fn incoming_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.parse().ok())
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = incoming_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "request",
            %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        // Extractors may run while the inner future is built.
        let inner = TraceId::in_scope(trace_id, || self.service.call(req));
        let fut = async move {
            let mut res = inner.await?;
            info!(status = res.status().as_u16(), "request completed");
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(err) => warn!(error = %err, "trace id is not a valid header value"),
            }
            Ok(res)
        };
        Box::pin(TraceId::scope(trace_id, fut).instrument(span))
    }
}
