//! Destination model: the capital, atolls and islands a trip can visit

use super::Coordinates;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Kind of place a destination represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DestinationCategory {
    Capital,
    Atoll,
    Island,
}

impl fmt::Display for DestinationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DestinationCategory::Capital => "capital",
            DestinationCategory::Atoll => "atoll",
            DestinationCategory::Island => "island",
        };
        write!(f, "{label}")
    }
}

/// A named location in the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    /// Lowercase slug, e.g. `north-male-atoll`
    pub id: String,
    /// Display name
    pub name: String,
    pub category: DestinationCategory,
    pub coordinates: Coordinates,
    /// Short selling points. The CMS stores these as a JSON-encoded string,
    /// so both a list and a string holding a list are accepted.
    #[serde(default, deserialize_with = "lenient_list")]
    pub highlights: Vec<String>,
}

impl Destination {
    #[must_use]
    pub fn new(
        id: &str,
        name: &str,
        category: DestinationCategory,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.to_lowercase(),
            name: name.to_string(),
            category,
            coordinates: Coordinates::new(latitude, longitude),
            highlights: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_highlights(mut self, highlights: &[&str]) -> Self {
        self.highlights = highlights.iter().map(|h| (*h).to_string()).collect();
        self
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(parse_list_field(value))
}

/// Turn a loosely typed list field into strings.
///
/// Never fails: a malformed value is logged and read as an empty list so one
/// bad record cannot break a whole listing.
#[must_use]
pub fn parse_list_field(value: Option<Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => {
                    warn!("Skipping non-string list item: {}", other);
                    None
                }
            })
            .collect(),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(items)) => parse_list_field(Some(Value::Array(items))),
                Ok(other) => {
                    warn!("Expected a JSON array in list field, got: {}", other);
                    Vec::new()
                }
                Err(e) => {
                    warn!("Malformed JSON list field '{}': {}", trimmed, e);
                    Vec::new()
                }
            }
        }
        Some(other) => {
            warn!("Unsupported list field value: {}", other);
            Vec::new()
        }
    }
}
