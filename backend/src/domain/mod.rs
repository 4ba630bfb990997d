//! Domain primitives, services and ports.
//!
//! Purpose: keep the weather proxy's rules (key derivation, URL validation,
//! field mapping, report assembly) free of HTTP and storage concerns. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - Site, SiteKey, SitePath: registered stations and key derivation.
//! - StationFormat: validated field table for the clientraw files.
//! - StationReportService, SiteRegistrationService, UserDirectoryService:
//!   domain services behind the driving ports.

pub mod audit;
pub mod clientraw;
pub mod error;
pub mod field_mapping;
pub mod ports;
pub mod site;
pub mod site_registration;
pub mod station_format;
pub mod station_report;
pub mod trace_id;
pub mod user;
pub mod user_directory;

pub use self::audit::AuditTrail;
pub use self::clientraw::ClientrawFile;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::field_mapping::{
    CurrentReadings, Reading, SeriesReadings, map_core, map_current, map_series, map_split_series,
};
pub use self::site::{
    SITE_KEY_MAX_LEN, SITE_KEY_MIN_LEN, Site, SiteKey, SitePath, SiteValidationError,
};
pub use self::site_registration::SiteRegistrationService;
pub use self::station_format::{
    CoreField, CurrentField, STATION_FORMAT_VERSION, SeriesField, SplitSeriesField,
    StationFormat, StationFormatError, TokenRange,
};
pub use self::station_report::{
    FETCH_DATA_MESSAGE, SITE_NOT_FOUND_MESSAGE, StationReport, StationReportService,
};
pub use self::trace_id::TraceId;
pub use self::user::{IDENTITY_MAX, Identity, User, UserId, UserValidationError};
pub use self::user_directory::UserDirectoryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use weather_proxy::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("site does not exist"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
