//! HTTP inbound adapter: the JSONP data endpoint, the admin surface and
//! health probes.

pub mod admin;
pub mod api;
pub mod envelope;
pub mod error;
pub mod health;
pub mod identity;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;
