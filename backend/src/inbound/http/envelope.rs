//! Response envelopes shared by the JSON and JSONP endpoints.
//!
//! ```text
//! {"status":"success","data":{...}}
//! {"status":"error","description":"site does not exist"}
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Discriminator carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// The request succeeded and `data` is present.
    Success,
    /// The request failed; see `description`.
    Error,
}

/// Successful payload wrapper.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessEnvelope<T> {
    status: EnvelopeStatus,
    data: T,
}

impl<T> SuccessEnvelope<T> {
    /// Wrap `data` with `"status": "success"`.
    pub fn new(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data,
        }
    }
}

/// Failure wrapper exposing only a free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    status: EnvelopeStatus,
    #[schema(example = "site does not exist")]
    description: String,
}

impl ErrorEnvelope {
    /// Wrap a client-facing description with `"status": "error"`.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            description: description.into(),
        }
    }

    /// Message shown to the client.
    pub fn description(&self) -> &str {
        &self.description
    }
}
