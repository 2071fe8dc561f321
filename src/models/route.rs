//! Route segments between two destinations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Means of transport for a segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Ferry,
    Speedboat,
    Seaplane,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportMode::Ferry => "ferry",
            TransportMode::Speedboat => "speedboat",
            TransportMode::Seaplane => "seaplane",
        };
        write!(f, "{label}")
    }
}

/// A scheduled connection between two destination ids.
///
/// Segments are stored once per pair and may be travelled in either direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSegment {
    pub id: String,
    pub from: String,
    pub to: String,
    pub mode: TransportMode,
    pub duration_minutes: u32,
    /// One-way fare per person in USD
    pub price: f64,
    /// Seats per departure
    pub capacity: u32,
    /// Human readable schedule, e.g. "Daily except Friday"
    pub frequency: String,
}

impl RouteSegment {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        from: &str,
        to: &str,
        mode: TransportMode,
        duration_minutes: u32,
        price: f64,
        capacity: u32,
        frequency: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            from: from.to_lowercase(),
            to: to.to_lowercase(),
            mode,
            duration_minutes,
            price,
            capacity,
            frequency: frequency.to_string(),
        }
    }

    /// Whether this segment links `a` and `b` in either direction (case-insensitive)
    #[must_use]
    pub fn connects(&self, a: &str, b: &str) -> bool {
        let (from, to) = (self.from.as_str(), self.to.as_str());
        (from.eq_ignore_ascii_case(a) && to.eq_ignore_ascii_case(b))
            || (from.eq_ignore_ascii_case(b) && to.eq_ignore_ascii_case(a))
    }

    /// The end of the segment opposite to `id`, if `id` is one of its ends
    #[must_use]
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.from.eq_ignore_ascii_case(id) {
            Some(&self.to)
        } else if self.to.eq_ignore_ascii_case(id) {
            Some(&self.from)
        } else {
            None
        }
    }

    /// Format duration as "1h 30m"
    #[must_use]
    pub fn format_duration(&self) -> String {
        let hours = self.duration_minutes / 60;
        let minutes = self.duration_minutes % 60;
        match (hours, minutes) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }
}
