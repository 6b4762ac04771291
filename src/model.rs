// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Data models for driver search.
//!
//! Upstream roster entries arrive as loosely-typed JSON objects. Each one is
//! validated into a [`DriverRecord`] with every field defaulted, or skipped
//! when its shape cannot be trusted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TEAM_COLOUR: &str = "#000000";

/// One roster entry as decoded from the upstream body, not yet validated.
pub type RawDriver = Value;

/// Normalized driver returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub driver_number: u32,
    pub first_name: String,
    pub last_name: String,
    pub team_name: String,
    pub team_colour: String,
    pub country_code: String,
    pub headshot_url: String,
}

/// Result of validating a single raw roster entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Valid(DriverRecord),
    Skipped(String),
}

impl DriverRecord {
    /// Validate a raw roster entry and apply field defaults.
    ///
    /// Absent, `null`, or wrongly-typed scalar fields fall back to their
    /// defaults. A nested array or object in any consumed field, or an entry
    /// that is not an object, skips the record.
    pub fn from_raw(raw: &RawDriver) -> RecordOutcome {
        let Some(fields) = raw.as_object() else {
            return RecordOutcome::Skipped("roster entry is not an object".to_string());
        };

        match Self::from_fields(fields) {
            Ok(record) => RecordOutcome::Valid(record),
            Err(reason) => RecordOutcome::Skipped(reason),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            driver_number: number_field(fields, "driver_number")?,
            first_name: string_field(fields, "first_name", "")?,
            last_name: string_field(fields, "last_name", "")?,
            team_name: string_field(fields, "team_name", "")?,
            team_colour: string_field(fields, "team_colour", DEFAULT_TEAM_COLOUR)?,
            country_code: string_field(fields, "country_code", "")?,
            headshot_url: string_field(fields, "headshot_url", "")?,
        })
    }

    /// `first last` with surrounding whitespace removed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn string_field(fields: &Map<String, Value>, key: &str, default: &str) -> Result<String, String> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(format!("field `{key}` is a nested structure"))
        }
        _ => Ok(default.to_string()),
    }
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Result<u32, String> {
    match fields.get(key) {
        Some(Value::Number(value)) => Ok(value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(format!("field `{key}` is a nested structure"))
        }
        _ => Ok(0),
    }
}

#[derive(Debug, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
}

impl SearchQuery {
    /// Build from raw query pairs. A repeated `name` keeps its first value.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "name").then_some(value));

        Self { name }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub drivers: Vec<DriverRecord>,
}
