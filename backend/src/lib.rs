//! Weather station JSONP proxy.
//!
//! Registered sites are polled for their clientraw files, mapped through a
//! station format table and served to embedding pages as JSONP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
