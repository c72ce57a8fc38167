use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::RecurrenceError;
use crate::serde::{deserialize_count, deserialize_or_default};

/// Expansion window selected by the `recurrence` field.
///
/// Anything other than `week` or `month` (including a missing field) means
/// the event does not repeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Week,
    Month,
    #[default]
    #[serde(other)]
    None,
}

/// Step granularity within the recurrence window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurrencePattern {
    /// One occurrence per calendar day.
    Daily,
    /// Same weekday (for `week`) or same day of month (for `month`).
    SameDay,
    /// A pattern this service does not know. Expands to nothing.
    #[serde(other)]
    Unsupported,
}

fn default_count() -> u32 {
    1
}

/// A present but unreadable pattern (`5`, `"hourly"`) is `Unsupported`;
/// only a missing or null one is `None`.
fn deserialize_pattern<'de, D>(deserializer: D) -> Result<Option<RecurrencePattern>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => Ok(Some(
            serde_json::from_value(value).unwrap_or(RecurrencePattern::Unsupported),
        )),
    }
}

/// The repeat rule submitted alongside an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceDescriptor {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub recurrence: Recurrence,
    #[serde(
        default,
        rename = "recurrencePattern",
        deserialize_with = "deserialize_pattern",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<RecurrencePattern>,
    /// Number of occurrences for `sameDay` patterns. Ignored by `daily`.
    ///
    /// Unreadable values become 0, so a `sameDay` rule with a bad count
    /// expands to nothing instead of failing the whole request.
    #[serde(
        default = "default_count",
        rename = "recurrenceCount",
        deserialize_with = "deserialize_count"
    )]
    pub count: u32,
}

impl Default for RecurrenceDescriptor {
    fn default() -> Self {
        Self::none()
    }
}

impl RecurrenceDescriptor {
    /// Field names this descriptor occupies in a create-event body.
    pub const FIELDS: [&'static str; 3] = ["recurrence", "recurrencePattern", "recurrenceCount"];

    /// A descriptor for a one-off event.
    pub fn none() -> Self {
        Self {
            recurrence: Recurrence::None,
            pattern: None,
            count: default_count(),
        }
    }

    /// Repeat within the current week.
    pub fn weekly(pattern: RecurrencePattern) -> Self {
        Self {
            recurrence: Recurrence::Week,
            pattern: Some(pattern),
            count: default_count(),
        }
    }

    /// Repeat within the current month.
    pub fn monthly(pattern: RecurrencePattern) -> Self {
        Self {
            recurrence: Recurrence::Month,
            pattern: Some(pattern),
            count: default_count(),
        }
    }

    /// Sets the occurrence count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Returns true if `count` drives the number of generated occurrences.
    pub fn uses_count(&self) -> bool {
        self.recurrence != Recurrence::None && self.pattern == Some(RecurrencePattern::SameDay)
    }

    /// Rejects counts above the application maximum.
    pub fn validate(&self, max_count: u32) -> Result<(), RecurrenceError> {
        if self.uses_count() && self.count > max_count {
            return Err(RecurrenceError::CountTooLarge {
                count: self.count,
                max: max_count,
            });
        }
        Ok(())
    }
}
