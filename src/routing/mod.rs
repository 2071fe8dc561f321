//! Routing module
//!
//! Route resolution between destinations and itinerary building:
//! - Direct segment lookup and transfer via the hub
//! - Breadth-first connection search over the route graph
//! - Itinerary aggregation, ranking and validation

pub mod itinerary;
pub mod resolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::RouteSegment;

pub use itinerary::{
    Connection, Itinerary, ItineraryBuilder, ItineraryFailure, ItineraryOption, ValidationReport,
    validate_itinerary,
};
pub use resolver::{RouteResolver, RouteStrategy};

/// How to choose between several segments serving the same pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TravelPreference {
    /// Shortest duration
    Speed,
    /// Lowest price
    Cost,
    /// Largest vessel
    Comfort,
}

impl TravelPreference {
    pub const ALL: [TravelPreference; 3] = [
        TravelPreference::Speed,
        TravelPreference::Cost,
        TravelPreference::Comfort,
    ];
}

impl fmt::Display for TravelPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TravelPreference::Speed => "speed",
            TravelPreference::Cost => "cost",
            TravelPreference::Comfort => "comfort",
        };
        write!(f, "{label}")
    }
}

impl FromStr for TravelPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "speed" | "fastest" => Ok(TravelPreference::Speed),
            "cost" | "cheapest" | "price" => Ok(TravelPreference::Cost),
            "comfort" => Ok(TravelPreference::Comfort),
            other => Err(format!("Unknown travel preference: {other}")),
        }
    }
}

/// Pick one segment out of several alternatives.
///
/// Ties keep the earlier candidate; without a preference the first one wins.
#[must_use]
pub fn select_segment<'a>(
    candidates: &[&'a RouteSegment],
    preference: Option<TravelPreference>,
) -> Option<&'a RouteSegment> {
    let mut iter = candidates.iter().copied();
    match preference {
        None => iter.next(),
        Some(TravelPreference::Speed) => {
            iter.reduce(|best, c| if c.duration_minutes < best.duration_minutes { c } else { best })
        }
        Some(TravelPreference::Cost) => {
            iter.reduce(|best, c| if c.price < best.price { c } else { best })
        }
        Some(TravelPreference::Comfort) => {
            iter.reduce(|best, c| if c.capacity > best.capacity { c } else { best })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportMode;
    use rstest::rstest;

    fn candidates() -> Vec<RouteSegment> {
        vec![
            RouteSegment::new("ferry", "male", "ari-atoll", TransportMode::Ferry, 240, 10.0, 100, "Sat"),
            RouteSegment::new("boat", "male", "ari-atoll", TransportMode::Speedboat, 90, 60.0, 30, "Daily"),
            RouteSegment::new("plane", "male", "ari-atoll", TransportMode::Seaplane, 30, 450.0, 15, "Daily"),
            RouteSegment::new("big-ferry", "male", "ari-atoll", TransportMode::Ferry, 260, 10.0, 100, "Sun"),
        ]
    }

    #[rstest]
    #[case(None, "ferry")]
    #[case(Some(TravelPreference::Speed), "plane")]
    #[case(Some(TravelPreference::Cost), "ferry")]
    #[case(Some(TravelPreference::Comfort), "ferry")]
    fn test_select_segment(#[case] preference: Option<TravelPreference>, #[case] expected: &str) {
        let owned = candidates();
        let refs: Vec<&RouteSegment> = owned.iter().collect();
        assert_eq!(select_segment(&refs, preference).unwrap().id, expected);
    }

    #[test]
    fn test_select_segment_empty() {
        assert!(select_segment(&[], Some(TravelPreference::Speed)).is_none());
    }

    #[rstest]
    #[case("speed", TravelPreference::Speed)]
    #[case("Cheapest", TravelPreference::Cost)]
    #[case(" comfort ", TravelPreference::Comfort)]
    fn test_parse_preference(#[case] raw: &str, #[case] expected: TravelPreference) {
        assert_eq!(raw.parse::<TravelPreference>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_preference() {
        assert!("luxury".parse::<TravelPreference>().is_err());
    }
}
