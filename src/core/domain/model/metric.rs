//! Normalized metric records handed to the accumulator.

use serde::Serialize;
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

/// Measurement name under which every domain record is emitted.
pub const DOMAIN_MEASUREMENT: &str = "cs_domain";

/// A typed numeric field value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole numbers: parsed integer strings, JSON integers, the unlimited sentinel.
    Integer(i64),
    /// Fractional numbers: JSON floats, float strings, computed totals.
    Float(f64),
}

impl FieldValue {
    /// Returns the value widened to `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::Integer(i) => i as f64,
            FieldValue::Float(f) => f,
        }
    }

    /// Converts a decoded JSON number, keeping integers that fit `i64` as integers.
    pub(crate) fn from_number(number: &Number) -> Option<Self> {
        if number.is_f64() {
            return number.as_f64().map(FieldValue::Float);
        }
        match number.as_i64() {
            Some(i) => Some(FieldValue::Integer(i)),
            None => number.as_f64().map(FieldValue::Float),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{i}i"),
            FieldValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Tag name to tag value.
pub type TagSet = BTreeMap<String, String>;

/// Field name to numeric value.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// The normalized form of one domain record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub tags: TagSet,
    pub fields: FieldSet,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits the record into its tag and field sets.
    pub fn into_parts(self) -> (TagSet, FieldSet) {
        (self.tags, self.fields)
    }
}
