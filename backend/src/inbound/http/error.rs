//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers turn
//! domain failures into the error envelope with a matching status code.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::envelope::ErrorEnvelope;

/// Description returned in place of internal failure details.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::MissingParameter | ErrorCode::InvalidProtocol => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ContentFetch | ErrorCode::FetchData => StatusCode::BAD_GATEWAY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the client-facing envelope, hiding internal details.
pub(crate) fn envelope_for(err: &Error) -> ErrorEnvelope {
    if matches!(err.code(), ErrorCode::InternalError) {
        error!(
            description = err.message(),
            trace_id = err.trace_id(),
            "internal error redacted"
        );
        ErrorEnvelope::new(INTERNAL_ERROR_MESSAGE)
    } else {
        ErrorEnvelope::new(err.message())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(envelope_for(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak framework details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_ERROR_MESSAGE)
    }
}
