//! Versioned description of where each reading lives in the clientraw files.
//!
//! Station software differs in which token positions carry which
//! measurement, so the offsets are data rather than code. A format is a JSON
//! document validated on load:
//!
//! - `version` must equal [`STATION_FORMAT_VERSION`].
//! - Field names are non-empty and unique within a section.
//! - Every `core` entry names an existing `current` field.
//! - Every `hourly`, `daily` and `monthly` field has a unit in `units`.
//!
//! A default table for Weather Display stations ships with the crate; see
//! [`StationFormat::builtin`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Schema version understood by this build.
pub const STATION_FORMAT_VERSION: u32 = 1;

const BUILTIN_FORMAT: &str = include_str!("../../fixtures/station-formats/weather-display.json");

/// Errors raised while loading or validating a station format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationFormatError {
    /// The format file could not be read.
    #[error("failed to read station format at {path}: {message}")]
    Io {
        /// File that failed to load.
        path: String,
        /// Underlying I/O error.
        message: String,
    },
    /// The document was not valid JSON for the schema.
    #[error("invalid station format document: {message}")]
    Parse {
        /// Decoder error.
        message: String,
    },
    /// The document declares a version this build cannot read.
    #[error("unsupported station format version {found}; expected {STATION_FORMAT_VERSION}")]
    UnsupportedVersion {
        /// Declared version.
        found: u32,
    },
    /// A field had a blank name.
    #[error("{section} field names must not be empty")]
    EmptyName {
        /// Section containing the field.
        section: &'static str,
    },
    /// Two fields in one section shared a name.
    #[error("{section} field `{name}` is declared more than once")]
    DuplicateField {
        /// Section containing the fields.
        section: &'static str,
        /// Repeated name.
        name: String,
    },
    /// A core field copies a current field that does not exist.
    #[error("core field `{name}` refers to unknown current field `{source_field}`")]
    UnknownCoreSource {
        /// Core field name.
        name: String,
        /// Missing current field.
        source_field: String,
    },
    /// A history field has no entry in `units`.
    #[error("{section} field `{name}` has no unit")]
    MissingUnit {
        /// Section containing the field.
        section: &'static str,
        /// Field without a unit.
        name: String,
    },
}

/// Contiguous run of tokens: `tokens[start .. start + length]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRange {
    /// Index of the first token.
    pub start: usize,
    /// Number of tokens.
    pub length: usize,
}

impl TokenRange {
    /// Build a range.
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Tokens covered by this range.
    ///
    /// Ranges running past the end of `tokens` are truncated; ranges starting
    /// past the end are empty.
    ///
    /// # Examples
    /// ```
    /// use weather_proxy::domain::TokenRange;
    ///
    /// let tokens: Vec<String> = ["10", "20", "30"].map(String::from).to_vec();
    /// assert_eq!(TokenRange::new(1, 5).slice(&tokens), &tokens[1..]);
    /// assert!(TokenRange::new(7, 2).slice(&tokens).is_empty());
    /// ```
    pub fn slice<'a>(&self, tokens: &'a [String]) -> &'a [String] {
        let start = self.start.min(tokens.len());
        let end = self.start.saturating_add(self.length).min(tokens.len());
        tokens.get(start..end).unwrap_or_default()
    }
}

/// A `clientraw.txt` field; its token index is its position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrentField {
    /// Output name.
    pub name: String,
    /// Unit reported alongside the value.
    pub unit: String,
}

/// A headline field copied from an already mapped current field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreField {
    /// Output name.
    pub name: String,
    /// Name of the current field to copy.
    pub source: String,
}

/// A history field read from one contiguous token range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesField {
    /// Output name; also the key into `units`.
    pub name: String,
    /// Index of the first token.
    pub start: usize,
    /// Number of tokens.
    pub length: usize,
}

impl SeriesField {
    /// Token range covered by this field.
    pub const fn range(&self) -> TokenRange {
        TokenRange::new(self.start, self.length)
    }
}

/// A history field stitched together from two token ranges, first then
/// second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitSeriesField {
    /// Output name; also the key into `units`.
    pub name: String,
    /// Leading range.
    pub first: TokenRange,
    /// Trailing range.
    pub second: TokenRange,
}

/// Validated field table for the four clientraw files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StationFormatDto", into = "StationFormatDto")]
pub struct StationFormat {
    name: String,
    current: Vec<CurrentField>,
    core: Vec<CoreField>,
    hourly: Vec<SeriesField>,
    daily: Vec<SplitSeriesField>,
    monthly: Vec<SeriesField>,
    units: BTreeMap<String, String>,
}

impl StationFormat {
    /// Table for Weather Display `clientraw*.txt` files bundled with the crate.
    ///
    /// # Errors
    /// Returns an error only if the bundled document fails validation.
    pub fn builtin() -> Result<Self, StationFormatError> {
        Self::from_json(BUILTIN_FORMAT)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Examples
    /// ```
    /// use weather_proxy::domain::StationFormat;
    ///
    /// let format = StationFormat::from_json(
    ///     r#"{"version":1,"name":"tiny","current":[{"name":"temp","unit":"C"}]}"#,
    /// )
    /// .expect("valid format");
    /// assert_eq!(format.current().len(), 1);
    /// ```
    pub fn from_json(document: &str) -> Result<Self, StationFormatError> {
        // Decode the raw shape first so validation failures keep their variant.
        let dto: StationFormatDto =
            serde_json::from_str(document).map_err(|err| StationFormatError::Parse {
                message: err.to_string(),
            })?;
        Self::try_from(dto)
    }

    /// Read and validate a JSON document from disk.
    pub fn load(path: &Path) -> Result<Self, StationFormatError> {
        let document = std::fs::read_to_string(path).map_err(|err| StationFormatError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json(&document)
    }

    /// Human-readable table name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// `clientraw.txt` fields in token order.
    pub fn current(&self) -> &[CurrentField] {
        &self.current
    }

    /// Headline fields copied from `current`.
    pub fn core(&self) -> &[CoreField] {
        &self.core
    }

    /// `clientrawhour.txt` fields.
    pub fn hourly(&self) -> &[SeriesField] {
        &self.hourly
    }

    /// `clientrawextra.txt` fields.
    pub fn daily(&self) -> &[SplitSeriesField] {
        &self.daily
    }

    /// `clientrawdaily.txt` fields.
    pub fn monthly(&self) -> &[SeriesField] {
        &self.monthly
    }

    /// Units for history fields keyed by field name.
    pub fn units(&self) -> &BTreeMap<String, String> {
        &self.units
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StationFormatDto {
    version: u32,
    name: String,
    current: Vec<CurrentField>,
    #[serde(default)]
    core: Vec<CoreField>,
    #[serde(default)]
    hourly: Vec<SeriesField>,
    #[serde(default)]
    daily: Vec<SplitSeriesField>,
    #[serde(default)]
    monthly: Vec<SeriesField>,
    #[serde(default)]
    units: BTreeMap<String, String>,
}

impl From<StationFormat> for StationFormatDto {
    fn from(value: StationFormat) -> Self {
        let StationFormat {
            name,
            current,
            core,
            hourly,
            daily,
            monthly,
            units,
        } = value;
        Self {
            version: STATION_FORMAT_VERSION,
            name,
            current,
            core,
            hourly,
            daily,
            monthly,
            units,
        }
    }
}

impl TryFrom<StationFormatDto> for StationFormat {
    type Error = StationFormatError;

    fn try_from(value: StationFormatDto) -> Result<Self, Self::Error> {
        let StationFormatDto {
            version,
            name,
            current,
            core,
            hourly,
            daily,
            monthly,
            units,
        } = value;

        if version != STATION_FORMAT_VERSION {
            return Err(StationFormatError::UnsupportedVersion { found: version });
        }
        ensure_unique("current", current.iter().map(|f| f.name.as_str()))?;
        ensure_unique("core", core.iter().map(|f| f.name.as_str()))?;
        ensure_unique("hourly", hourly.iter().map(|f| f.name.as_str()))?;
        ensure_unique("daily", daily.iter().map(|f| f.name.as_str()))?;
        ensure_unique("monthly", monthly.iter().map(|f| f.name.as_str()))?;

        let current_names: HashSet<&str> = current.iter().map(|f| f.name.as_str()).collect();
        if let Some(field) = core
            .iter()
            .find(|f| !current_names.contains(f.source.as_str()))
        {
            return Err(StationFormatError::UnknownCoreSource {
                name: field.name.clone(),
                source_field: field.source.clone(),
            });
        }

        ensure_units("hourly", hourly.iter().map(|f| f.name.as_str()), &units)?;
        ensure_units("daily", daily.iter().map(|f| f.name.as_str()), &units)?;
        ensure_units("monthly", monthly.iter().map(|f| f.name.as_str()), &units)?;

        Ok(Self {
            name,
            current,
            core,
            hourly,
            daily,
            monthly,
            units,
        })
    }
}

fn ensure_unique<'a>(
    section: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), StationFormatError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(StationFormatError::EmptyName { section });
        }
        if !seen.insert(name) {
            return Err(StationFormatError::DuplicateField {
                section,
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

fn ensure_units<'a>(
    section: &'static str,
    mut names: impl Iterator<Item = &'a str>,
    units: &BTreeMap<String, String>,
) -> Result<(), StationFormatError> {
    match names.find(|name| !units.contains_key(*name)) {
        Some(name) => Err(StationFormatError::MissingUnit {
            section,
            name: name.to_owned(),
        }),
        None => Ok(()),
    }
}
