//! Request middleware.
//!
//! [`Trace`] tags every request with a [`crate::TraceId`] so logs and error
//! responses can be correlated.

pub mod trace;

pub use trace::Trace;
