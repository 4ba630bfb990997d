//! Clientraw outbound adapters.
//!
//! A thin HTTP implementation of the `SnapshotSource` and `SiteProbe` ports
//! sharing one reqwest client.

mod http_probe;
mod http_source;

pub use http_source::ClientrawHttpSource;
