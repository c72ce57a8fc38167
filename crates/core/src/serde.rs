//! Serde helpers for event documents.
//!
//! Clients submit timestamps in whatever shape their date picker produces,
//! and counts either as JSON numbers or as strings from form fields. These
//! helpers normalize both.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Output format for every timestamp the service emits (UTC, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a timestamp string into a UTC wall-clock value.
///
/// Accepts RFC 3339 with any offset (normalized to UTC), naive ISO 8601
/// date-times with or without seconds, and bare `YYYY-MM-DD` dates (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Formats a timestamp the way it is stored and returned to clients.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// `#[serde(with = "...")]` module for [`NaiveDateTime`] fields.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }
}

/// Deserialize a value, falling back to its default when the input is
/// null or of the wrong shape.
pub fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize a count that may arrive as a JSON number or a numeric string.
///
/// `null` reads as 1. Anything that is not a non-negative whole number
/// (`""`, `"abc"`, `-1`, `2.5`) reads as 0. Values above `u32::MAX` saturate.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count_from_value(&Value::deserialize(deserializer)?))
}

fn count_from_value(value: &Value) -> u32 {
    match value {
        Value::Null => 1,
        Value::Number(n) => n
            .as_u64()
            .map(saturate)
            .or_else(|| n.as_f64().and_then(whole))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .map(saturate)
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn saturate(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn whole(f: f64) -> Option<u32> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then(|| f.min(f64::from(u32::MAX)) as u32)
}
