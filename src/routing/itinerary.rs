//! Itinerary building, ranking and validation

use super::{RouteResolver, TravelPreference};
use crate::models::{RouteSegment, TransportMode};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, instrument};

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Currency every fare in the registry is quoted in
pub const CURRENCY: &str = "USD";

/// Travel between two consecutive destinations of an itinerary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub departure_date: NaiveDate,
    /// One segment for a direct connection, more when transferring
    pub hops: Vec<RouteSegment>,
}

impl Connection {
    #[must_use]
    pub fn duration_minutes(&self) -> u64 {
        self.hops.iter().map(|h| u64::from(h.duration_minutes)).sum()
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.hops.iter().map(|h| h.price).sum()
    }

    /// Seats available end to end (smallest vessel)
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.hops.iter().map(|h| h.capacity).min().unwrap_or(0)
    }

    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.hops.len() == 1
    }

    #[must_use]
    pub fn modes(&self) -> Vec<TransportMode> {
        self.hops.iter().map(|h| h.mode).collect()
    }
}

/// An ordered trip over destinations with the connections between them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub destinations: Vec<String>,
    pub segments: Vec<Connection>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost_amount: f64,
    pub total_cost_currency: String,
    pub total_duration_minutes: u64,
    pub total_distance_km: f64,
    pub preference: Option<TravelPreference>,
}

impl Itinerary {
    /// Segment ids in travel order; equal chains describe the same trip
    #[must_use]
    pub fn segment_chain(&self) -> Vec<&str> {
        self.segments
            .iter()
            .flat_map(|c| c.hops.iter().map(|h| h.id.as_str()))
            .collect()
    }

    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// One ranked variant produced by [`ItineraryBuilder::generate_itinerary_options`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItineraryOption {
    pub label: String,
    pub itinerary: Itinerary,
}

/// Result of [`validate_itinerary`]; lists every violated rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Why an itinerary could not be built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ItineraryFailure {
    #[error("An itinerary needs at least two destinations")]
    TooFewDestinations,
    #[error("Unknown destination: {id}")]
    UnknownDestination { id: String },
    #[error("Consecutive stops are both {id}")]
    RepeatedStop { id: String },
    #[error("No connection from {from} to {to}")]
    NoConnection { from: String, to: String },
    #[error("Itinerary dates are out of range")]
    DateOutOfRange,
}

/// Chains resolved connections into itineraries
#[derive(Debug, Clone)]
pub struct ItineraryBuilder<'a> {
    resolver: RouteResolver<'a>,
}

impl<'a> ItineraryBuilder<'a> {
    #[must_use]
    pub fn new(resolver: RouteResolver<'a>) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &RouteResolver<'a> {
        &self.resolver
    }

    /// Build an itinerary visiting `destinations` in order.
    ///
    /// Returns `None` when fewer than two destinations are given, an id is
    /// unknown, two consecutive ids are equal, or any pair has no connection.
    /// [`Self::build_itinerary`] reports which of these happened.
    pub fn find_optimal_itinerary<S: AsRef<str>>(
        &self,
        destinations: &[S],
        start_date: NaiveDate,
        preference: Option<TravelPreference>,
    ) -> Option<Itinerary> {
        self.build_itinerary(destinations, start_date, preference).ok()
    }

    /// Like [`Self::find_optimal_itinerary`], naming the first stop or pair that failed
    #[instrument(skip(self, destinations), fields(stops = destinations.len()))]
    pub fn build_itinerary<S: AsRef<str>>(
        &self,
        destinations: &[S],
        start_date: NaiveDate,
        preference: Option<TravelPreference>,
    ) -> Result<Itinerary, ItineraryFailure> {
        if destinations.len() < 2 {
            debug!("Itinerary needs at least two destinations");
            return Err(ItineraryFailure::TooFewDestinations);
        }

        let registry = self.resolver.registry();
        let mut stops = Vec::with_capacity(destinations.len());
        for id in destinations {
            match registry.destination(id.as_ref()) {
                Some(destination) => stops.push(destination),
                None => {
                    debug!("Unknown destination '{}'", id.as_ref());
                    return Err(ItineraryFailure::UnknownDestination {
                        id: id.as_ref().to_string(),
                    });
                }
            }
        }

        let mut segments = Vec::with_capacity(stops.len() - 1);
        let mut total_distance_km = 0.0;
        let mut departure_date = start_date;

        for (index, pair) in stops.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            if from.id == to.id {
                debug!("Consecutive stops are both '{}'", from.id);
                return Err(ItineraryFailure::RepeatedStop { id: from.id.clone() });
            }

            let hops = self.resolver.resolve(&from.id, &to.id, preference).ok_or_else(|| {
                ItineraryFailure::NoConnection {
                    from: from.id.clone(),
                    to: to.id.clone(),
                }
            })?;
            if index > 0 {
                departure_date = departure_date
                    .checked_add_days(Days::new(1))
                    .ok_or(ItineraryFailure::DateOutOfRange)?;
            }
            total_distance_km += from.coordinates.distance_km(&to.coordinates);
            segments.push(Connection {
                from: from.id.clone(),
                to: to.id.clone(),
                departure_date,
                hops,
            });
        }

        let total_duration_minutes: u64 = segments.iter().map(Connection::duration_minutes).sum();
        let total_cost_amount: f64 = segments.iter().map(Connection::price).sum();

        let travel_days = total_duration_minutes.div_ceil(MINUTES_PER_DAY);
        let days = travel_days.max(segments.len() as u64);
        let end_date = start_date
            .checked_add_days(Days::new(days))
            .ok_or(ItineraryFailure::DateOutOfRange)?;

        info!(
            "Built itinerary over {} stops: {} min, {:.2} {}, {:.1} km",
            stops.len(),
            total_duration_minutes,
            total_cost_amount,
            CURRENCY,
            total_distance_km
        );

        Ok(Itinerary {
            destinations: stops.iter().map(|d| d.id.clone()).collect(),
            segments,
            start_date,
            end_date,
            total_cost_amount,
            total_cost_currency: CURRENCY.to_string(),
            total_duration_minutes,
            total_distance_km,
            preference,
        })
    }

    /// Alternative itineraries over the same stops, one per preference mode.
    ///
    /// Modes that yield an identical segment chain collapse into the first
    /// one found. Options are ordered by total cost, then total duration.
    pub fn generate_itinerary_options<S: AsRef<str>>(
        &self,
        destinations: &[S],
        start_date: NaiveDate,
    ) -> Vec<ItineraryOption> {
        let modes = std::iter::once(None).chain(TravelPreference::ALL.into_iter().map(Some));

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut options = Vec::new();
        for preference in modes {
            let Some(itinerary) = self.find_optimal_itinerary(destinations, start_date, preference)
            else {
                continue;
            };
            let chain: Vec<String> = itinerary.segment_chain().into_iter().map(String::from).collect();
            if !seen.insert(chain) {
                continue;
            }
            options.push(ItineraryOption {
                label: option_label(preference).to_string(),
                itinerary,
            });
        }

        options.sort_by(|a, b| {
            a.itinerary
                .total_cost_amount
                .total_cmp(&b.itinerary.total_cost_amount)
                .then(
                    a.itinerary
                        .total_duration_minutes
                        .cmp(&b.itinerary.total_duration_minutes),
                )
        });

        debug!("Generated {} distinct itinerary options", options.len());
        options
    }
}

fn option_label(preference: Option<TravelPreference>) -> &'static str {
    match preference {
        None => "standard",
        Some(TravelPreference::Speed) => "fastest",
        Some(TravelPreference::Cost) => "cheapest",
        Some(TravelPreference::Comfort) => "most comfortable",
    }
}

/// Check an itinerary against its structural rules, reporting all violations
#[must_use]
pub fn validate_itinerary(itinerary: &Itinerary) -> ValidationReport {
    let mut errors = Vec::new();
    let destination_count = itinerary.destinations.len();
    let segment_count = itinerary.segments.len();

    if destination_count < 2 {
        errors.push(format!(
            "Itinerary must have at least 2 destinations, found {destination_count}"
        ));
    }

    if segment_count == 0 {
        errors.push("Itinerary must have at least one segment".to_string());
    }

    if segment_count != destination_count.saturating_sub(1) {
        errors.push(format!(
            "Segment count ({segment_count}) must be one less than destination count ({destination_count})"
        ));
    }

    if itinerary.end_date <= itinerary.start_date {
        errors.push(format!(
            "End date {} must be after start date {}",
            itinerary.end_date, itinerary.start_date
        ));
    }

    for pair in itinerary.segments.windows(2) {
        if pair[1].departure_date <= pair[0].departure_date {
            errors.push(format!(
                "Segment {} -> {} departs on {}, not after the previous segment ({})",
                pair[1].from, pair[1].to, pair[1].departure_date, pair[0].departure_date
            ));
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> Registry {
        Registry::builtin()
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    fn test_single_leg_itinerary(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let itinerary = builder
            .find_optimal_itinerary(&["male", "north-male-atoll"], date("2026-02-10"), None)
            .unwrap();

        assert_eq!(itinerary.segments.len(), 1);
        assert!(itinerary.total_cost_amount > 0.0);
        assert!(itinerary.total_duration_minutes > 0);
        assert!(itinerary.total_distance_km > 0.0);
        assert_eq!(itinerary.total_cost_currency, "USD");
        assert_eq!(itinerary.end_date, date("2026-02-11"));
        assert!(validate_itinerary(&itinerary).is_valid);
    }

    #[rstest]
    fn test_multi_stop_itinerary_aggregates(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let stops = ["maafushi", "male", "baa-atoll", "ari-atoll"];
        let itinerary = builder
            .find_optimal_itinerary(&stops, date("2026-03-01"), Some(TravelPreference::Speed))
            .unwrap();

        assert_eq!(itinerary.segments.len(), stops.len() - 1);
        // baa -> ari goes through the hub
        assert_eq!(itinerary.segments[2].hops.len(), 2);
        assert!(!itinerary.segments[2].is_direct());

        let hop_minutes: u64 = itinerary
            .segments
            .iter()
            .flat_map(|c| c.hops.iter())
            .map(|h| u64::from(h.duration_minutes))
            .sum();
        assert_eq!(itinerary.total_duration_minutes, hop_minutes);

        let dates: Vec<NaiveDate> = itinerary.segments.iter().map(|c| c.departure_date).collect();
        assert_eq!(dates, vec![date("2026-03-01"), date("2026-03-02"), date("2026-03-03")]);
        assert_eq!(itinerary.end_date, date("2026-03-04"));
        assert!(itinerary.end_date > itinerary.start_date);
    }

    #[rstest]
    #[case(&["male"])]
    #[case(&["male", "atlantis"])]
    #[case(&["male", "male"])]
    #[case(&["male", "fuvahmulah"])]
    fn test_unbuildable_itineraries(registry: Registry, #[case] stops: &[&str]) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        assert!(builder.find_optimal_itinerary(stops, date("2026-02-10"), None).is_none());
    }

    #[rstest]
    fn test_no_partial_itineraries(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let stops = ["male", "maafushi", "fuvahmulah"];
        assert!(builder.find_optimal_itinerary(&stops, date("2026-02-10"), None).is_none());
    }

    #[rstest]
    #[case(&["male"], ItineraryFailure::TooFewDestinations)]
    #[case(&["male", "atlantis"], ItineraryFailure::UnknownDestination { id: "atlantis".to_string() })]
    #[case(&["male", "male"], ItineraryFailure::RepeatedStop { id: "male".to_string() })]
    #[case(
        &["male", "maafushi", "fuvahmulah"],
        ItineraryFailure::NoConnection { from: "maafushi".to_string(), to: "fuvahmulah".to_string() }
    )]
    fn test_build_names_the_failure(registry: Registry, #[case] stops: &[&str], #[case] expected: ItineraryFailure) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        assert_eq!(builder.build_itinerary(stops, date("2026-02-10"), None), Err(expected));
    }

    #[test]
    fn test_long_segments_do_not_overflow_duration() {
        use crate::models::{Destination, DestinationCategory};

        let registry = Registry::new(
            vec![
                Destination::new("a", "A", DestinationCategory::Island, 4.0, 73.0),
                Destination::new("b", "B", DestinationCategory::Island, 4.1, 73.1),
                Destination::new("c", "C", DestinationCategory::Island, 4.2, 73.2),
            ],
            vec![
                RouteSegment::new("ab", "a", "b", TransportMode::Ferry, 3_000_000_000, 1.0, 10, "Daily"),
                RouteSegment::new("bc", "b", "c", TransportMode::Ferry, 3_000_000_000, 1.0, 10, "Daily"),
            ],
        );
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "a"));

        let itinerary = builder
            .find_optimal_itinerary(&["a", "b", "c"], date("2026-02-10"), None)
            .unwrap();
        assert_eq!(itinerary.total_duration_minutes, 6_000_000_000);
        assert!(itinerary.end_date > itinerary.start_date);
    }

    #[rstest]
    fn test_options_are_distinct_and_ranked(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let options = builder.generate_itinerary_options(&["male", "ari-atoll"], date("2026-02-10"));

        // ferry appears for both "standard" and "cheapest" and comfort
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "standard");
        assert_eq!(options[1].label, "fastest");
        assert!(options[0].itinerary.total_cost_amount <= options[1].itinerary.total_cost_amount);

        let chains: HashSet<Vec<&str>> = options.iter().map(|o| o.itinerary.segment_chain()).collect();
        assert_eq!(chains.len(), options.len());
    }

    #[rstest]
    fn test_options_for_unresolvable_trip(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        assert!(builder.generate_itinerary_options(&["male", "fuvahmulah"], date("2026-02-10")).is_empty());
    }

    #[rstest]
    fn test_validate_single_destination(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let mut itinerary = builder
            .find_optimal_itinerary(&["male", "maafushi"], date("2026-02-10"), None)
            .unwrap();
        itinerary.destinations.truncate(1);

        let report = validate_itinerary(&itinerary);
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("destination")));
    }

    #[rstest]
    fn test_validate_reports_every_violation(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let mut itinerary = builder
            .find_optimal_itinerary(&["male", "maafushi"], date("2026-02-10"), None)
            .unwrap();
        itinerary.destinations.truncate(1);
        itinerary.segments.clear();
        itinerary.end_date = itinerary.start_date;

        let report = validate_itinerary(&itinerary);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 3);
    }

    #[rstest]
    fn test_validate_departure_order(registry: Registry) {
        let builder = ItineraryBuilder::new(RouteResolver::new(&registry, "male"));
        let mut itinerary = builder
            .find_optimal_itinerary(&["maafushi", "male", "thoddoo"], date("2026-02-10"), None)
            .unwrap();
        itinerary.segments[1].departure_date = itinerary.segments[0].departure_date;

        let report = validate_itinerary(&itinerary);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("departs"));
    }
}
