//! Prometheus middleware for the `metrics` feature.
//!
//! Startup may fail to register the collectors; the server then keeps running
//! and this layer passes requests straight through.

use std::sync::Arc;

use actix_service::boxed::{self, BoxService};
use actix_service::{Service, ServiceExt as _, Transform};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

type BoxedApp = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

/// Request metrics when a registry is available, a pass-through otherwise.
#[derive(Clone)]
pub(crate) struct MetricsLayer(Option<Arc<PrometheusMetrics>>);

impl MetricsLayer {
    pub(crate) fn new(metrics: Option<PrometheusMetrics>) -> Self {
        Self(metrics.map(Arc::new))
    }

    #[cfg(test)]
    fn is_recording(&self) -> bool {
        self.0.is_some()
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedApp;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(metrics) = self.0.clone() else {
            let passthrough = service.map(ServiceResponse::map_into_boxed_body);
            return Box::pin(async move { Ok(boxed::service(passthrough)) });
        };
        let recording = Compat::new(PrometheusMetrics::clone(&metrics)).new_transform(service);
        Box::pin(async move { Ok(boxed::service(recording.await?)) })
    }
}
