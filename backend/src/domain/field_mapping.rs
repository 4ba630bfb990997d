//! Turn whitespace tokens from a clientraw file into named readings.
//!
//! Each function maps one section of a [`StationFormat`](super::StationFormat) table. Every declared
//! field appears exactly once in the output; token ranges past the end of the
//! line are truncated rather than rejected.

use std::collections::BTreeMap;

use serde::Serialize;

use super::station_format::{CoreField, CurrentField, SeriesField, SplitSeriesField};

/// A value paired with its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading<V> {
    /// Raw token text, or a sequence of tokens for history fields.
    pub value: V,
    /// Unit label from the station format.
    pub unit: String,
}

/// Readings from `clientraw.txt`; `None` where the line was too short.
pub type CurrentReadings = BTreeMap<String, Reading<Option<String>>>;

/// Readings from the history files.
pub type SeriesReadings = BTreeMap<String, Reading<Vec<String>>>;

/// Map `current` fields by list position.
///
/// # Examples
/// ```
/// use weather_proxy::domain::{CurrentField, map_current};
///
/// let fields = vec![
///     CurrentField { name: "header".into(), unit: String::new() },
///     CurrentField { name: "wind".into(), unit: "kts".into() },
///     CurrentField { name: "gust".into(), unit: "kts".into() },
/// ];
/// let tokens: Vec<String> = ["12345", "4.2"].map(String::from).to_vec();
/// let readings = map_current(&tokens, &fields);
/// assert_eq!(readings["wind"].value.as_deref(), Some("4.2"));
/// assert_eq!(readings["gust"].value, None);
/// ```
pub fn map_current(tokens: &[String], fields: &[CurrentField]) -> CurrentReadings {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let reading = Reading {
                value: tokens.get(index).cloned(),
                unit: field.unit.clone(),
            };
            (field.name.clone(), reading)
        })
        .collect()
}

/// Copy already mapped current readings under their headline names.
pub fn map_core(current: &CurrentReadings, fields: &[CoreField]) -> CurrentReadings {
    fields
        .iter()
        .filter_map(|field| {
            current
                .get(&field.source)
                .map(|reading| (field.name.clone(), reading.clone()))
        })
        .collect()
}

/// Map single-range history fields (`hourly`, `monthly`).
pub fn map_series(
    tokens: &[String],
    fields: &[SeriesField],
    units: &BTreeMap<String, String>,
) -> SeriesReadings {
    fields
        .iter()
        .map(|field| {
            let reading = Reading {
                value: field.range().slice(tokens).to_vec(),
                unit: unit_for(units, &field.name),
            };
            (field.name.clone(), reading)
        })
        .collect()
}

/// Map two-range history fields (`daily`), first range then second.
pub fn map_split_series(
    tokens: &[String],
    fields: &[SplitSeriesField],
    units: &BTreeMap<String, String>,
) -> SeriesReadings {
    fields
        .iter()
        .map(|field| {
            let value = field
                .first
                .slice(tokens)
                .iter()
                .chain(field.second.slice(tokens))
                .cloned()
                .collect();
            let reading = Reading {
                value,
                unit: unit_for(units, &field.name),
            };
            (field.name.clone(), reading)
        })
        .collect()
}

fn unit_for(units: &BTreeMap<String, String>, name: &str) -> String {
    units.get(name).cloned().unwrap_or_default()
}
