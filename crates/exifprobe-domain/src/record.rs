//! Record module - the canonical unit of extracted metadata

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Raw value of a metadata field
///
/// No unit conversion is applied beyond what the producing adapter already
/// returned. Serialized untagged so the wire shape is a plain JSON string or
/// number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Whole number
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// Free-form text
    Text(String),
}

impl MetadataValue {
    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Integer(i) => Some(*i as f64),
            MetadataValue::Float(f) => Some(*f),
            MetadataValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Integer(i) => write!(f, "{}", i),
            MetadataValue::Float(x) => write!(f, "{}", x),
            MetadataValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<u32> for MetadataValue {
    fn from(i: u32) -> Self {
        MetadataValue::Integer(i64::from(i))
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        MetadataValue::Float(f)
    }
}

/// One extracted metadata field
///
/// `name` is a canonical field key (e.g. "Make", "GPSLatitude"), `description`
/// is the label from the [`LabelDictionary`](crate::LabelDictionary), empty
/// when the key is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Canonical field key
    pub name: String,

    /// Raw extracted value
    pub value: MetadataValue,

    /// Human-readable label
    pub description: String,
}

impl MetadataRecord {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        value: impl Into<MetadataValue>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Remove repeated names, keeping the last-written value for each name
///
/// Each surviving record sits where its last occurrence was, so the relative
/// order of names that appear only once is untouched.
///
/// # Examples
///
/// ```
/// use exifprobe_domain::{dedup_last_wins, MetadataRecord};
///
/// let records = vec![
///     MetadataRecord::new("Make", "Canon", ""),
///     MetadataRecord::new("Model", "EOS R5", ""),
///     MetadataRecord::new("Make", "Nikon", ""),
/// ];
/// let unique = dedup_last_wins(records);
/// assert_eq!(unique.len(), 2);
/// assert_eq!(unique[0].name, "Model");
/// assert_eq!(unique[1].value.as_text(), Some("Nikon"));
/// ```
pub fn dedup_last_wins(records: Vec<MetadataRecord>) -> Vec<MetadataRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique: Vec<MetadataRecord> = records
        .into_iter()
        .rev()
        .filter(|r| seen.insert(r.name.clone()))
        .collect();
    unique.reverse();
    unique
}
