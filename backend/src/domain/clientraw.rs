//! The four snapshot files a weather station publishes.

use std::fmt;
use std::time::Duration;

/// One of the fixed-name text files served by a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientrawFile {
    /// `clientraw.txt`: the current reading.
    Current,
    /// `clientrawhour.txt`: per-minute history for the last hour.
    Hourly,
    /// `clientrawextra.txt`: per-hour history for the last day.
    Extra,
    /// `clientrawdaily.txt`: per-day history for the last month.
    Daily,
}

impl ClientrawFile {
    /// Files in the order a station report fetches them.
    pub const ALL: [Self; 4] = [Self::Current, Self::Hourly, Self::Extra, Self::Daily];

    /// File requested when probing a candidate site.
    pub const PROBE: Self = Self::Current;

    /// File name appended to a site path.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Current => "clientraw.txt",
            Self::Hourly => "clientrawhour.txt",
            Self::Extra => "clientrawextra.txt",
            Self::Daily => "clientrawdaily.txt",
        }
    }

    /// How long a fetched copy stays fresh when snapshot caching is enabled.
    pub const fn cache_ttl(self) -> Duration {
        match self {
            Self::Current => Duration::from_secs(5),
            Self::Hourly => Duration::from_secs(3600),
            Self::Extra => Duration::from_secs(3600 * 20),
            Self::Daily => Duration::from_secs(3600 * 24),
        }
    }
}

impl fmt::Display for ClientrawFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
