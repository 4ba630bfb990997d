//! Request correlation identifier held in task-local storage.
//!
//! The HTTP middleware enters a scope per request; anything running inside it
//! (handlers, services, error constructors) reads the id with
//! [`TraceId::current`]. Task-locals do not follow `tokio::spawn`, so spawned
//! work must be wrapped in [`TraceId::scope`] explicitly.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Correlation id for one request.
///
/// # Examples
/// ```
/// use weather_proxy::TraceId;
///
/// let id: TraceId = "6f1c2d3e-0000-4000-8000-000000000001".parse().expect("uuid");
/// assert_eq!(TraceId::in_scope(id, TraceId::current), Some(id));
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Drive `fut` with `trace_id` in scope.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run `f` synchronously with `trace_id` in scope.
    pub fn in_scope<F, R>(trace_id: Self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        TRACE_ID.sync_scope(trace_id, f)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}
