//! Registered weather-station sites.
//!
//! A [`Site`] pairs a base URL ([`SitePath`]) with a short [`SiteKey`] derived
//! from the SHA-224 digest of that URL. Keys are the shortest digest prefix of
//! at least [`SITE_KEY_MIN_LEN`] characters not already taken; see
//! [`SiteKey::candidates`].

use std::fmt;

use sha2::{Digest, Sha224};
use url::Url;

use super::{AuditTrail, UserId};

/// Shortest key handed out for a site.
pub const SITE_KEY_MIN_LEN: usize = 15;
/// Length of a hex-encoded SHA-224 digest; the longest possible key.
pub const SITE_KEY_MAX_LEN: usize = 56;

/// Validation errors for site keys and paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteValidationError {
    /// The key length fell outside the derivable range.
    #[error("site key must be between {min} and {max} characters")]
    KeyLength {
        /// Shortest valid key.
        min: usize,
        /// Longest valid key.
        max: usize,
    },
    /// The key contained characters other than lowercase hex digits.
    #[error("site key must be lowercase hexadecimal")]
    KeyCharacters,
    /// The path did not parse as an `http` or `https` URL.
    #[error("Protocol (http, https) must be included")]
    InvalidProtocol,
}

/// Short identifier clients use to address a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey(String);

impl SiteKey {
    /// Validate a key supplied by a client or read back from storage.
    ///
    /// # Examples
    /// ```
    /// use weather_proxy::domain::SiteKey;
    ///
    /// assert!(SiteKey::new("0123456789abcde").is_ok());
    /// assert!(SiteKey::new("short").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, SiteValidationError> {
        let raw = raw.into();
        let length = raw.len();
        if !(SITE_KEY_MIN_LEN..=SITE_KEY_MAX_LEN).contains(&length) {
            return Err(SiteValidationError::KeyLength {
                min: SITE_KEY_MIN_LEN,
                max: SITE_KEY_MAX_LEN,
            });
        }
        if !raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(SiteValidationError::KeyCharacters);
        }
        Ok(Self(raw))
    }

    /// Candidate keys for `path`, shortest first.
    ///
    /// Yields every prefix of the path's SHA-224 hex digest from
    /// [`SITE_KEY_MIN_LEN`] up to the full digest. Registration offers each
    /// candidate to the repository until one is free.
    ///
    /// # Examples
    /// ```
    /// use weather_proxy::domain::{SiteKey, SitePath, SITE_KEY_MAX_LEN, SITE_KEY_MIN_LEN};
    ///
    /// let path = SitePath::parse("http://example.com/weather/").expect("valid path");
    /// let keys: Vec<SiteKey> = SiteKey::candidates(&path).collect();
    /// assert_eq!(keys.len(), SITE_KEY_MAX_LEN - SITE_KEY_MIN_LEN + 1);
    /// assert_eq!(keys[0].as_ref().len(), SITE_KEY_MIN_LEN);
    /// assert!(keys[1].as_ref().starts_with(keys[0].as_ref()));
    /// ```
    pub fn candidates(path: &SitePath) -> impl Iterator<Item = Self> + use<> {
        let digest = hex::encode(Sha224::digest(path.as_ref().as_bytes()));
        (SITE_KEY_MIN_LEN..=SITE_KEY_MAX_LEN)
            .filter_map(move |length| digest.get(..length).map(|prefix| Self(prefix.to_owned())))
    }
}

impl AsRef<str> for SiteKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Scheme-qualified base URL under which a station publishes its files.
///
/// The raw string is kept verbatim; file URLs are built by appending the file
/// name, so registered paths normally end with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SitePath(String);

impl SitePath {
    /// Check that `raw` carries an `http` or `https` scheme.
    ///
    /// # Examples
    /// ```
    /// use weather_proxy::domain::SitePath;
    ///
    /// assert!(SitePath::parse("http://example.com").is_ok());
    /// assert!(SitePath::parse("not-a-url").is_err());
    /// ```
    pub fn parse(raw: impl Into<String>) -> Result<Self, SiteValidationError> {
        let raw = raw.into();
        let url = Url::parse(&raw).map_err(|_| SiteValidationError::InvalidProtocol)?;
        match url.scheme() {
            "http" | "https" => Ok(Self(raw)),
            _ => Err(SiteValidationError::InvalidProtocol),
        }
    }

    /// URL of `file_name` under this path.
    pub fn file_url(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.0)
    }
}

impl AsRef<str> for SitePath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A registered weather-station endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    key: SiteKey,
    path: SitePath,
    owner: UserId,
    audit: AuditTrail,
}

impl Site {
    /// Build a site from validated components.
    pub fn new(key: SiteKey, path: SitePath, owner: UserId, audit: AuditTrail) -> Self {
        Self {
            key,
            path,
            owner,
            audit,
        }
    }

    /// Unique key addressing this site.
    pub fn key(&self) -> &SiteKey {
        &self.key
    }

    /// Base URL of the station's files.
    pub fn path(&self) -> &SitePath {
        &self.path
    }

    /// User that registered the site.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Creation and update stamps.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }
}
