//! Themed trip suggestions
//!
//! Produces up to three canned itineraries (relaxation, adventure, culture)
//! from a destination list and traveler preferences. Days are spread evenly
//! over the destinations and filled from fixed templates; transfers are not
//! checked against the route tables.

use crate::models::Destination;
use crate::routing::itinerary::CURRENCY;
use crate::{IslandHopError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const MAX_DURATION_DAYS: u32 = 30;
const MAX_TRAVELERS: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    Moderate,
    Luxury,
}

impl BudgetTier {
    /// Per person per day in USD
    #[must_use]
    pub fn daily_rate(self) -> f64 {
        match self {
            BudgetTier::Budget => 150.0,
            BudgetTier::Moderate => 350.0,
            BudgetTier::Luxury => 900.0,
        }
    }

    fn accommodation(self) -> &'static str {
        match self {
            BudgetTier::Budget => "Local guesthouse",
            BudgetTier::Moderate => "Boutique resort beach villa",
            BudgetTier::Luxury => "Overwater villa",
        }
    }

    fn meals(self) -> [&'static str; 3] {
        match self {
            BudgetTier::Budget => [
                "Breakfast at the guesthouse",
                "Lunch at a local café",
                "Dinner at an island restaurant",
            ],
            BudgetTier::Moderate => [
                "Breakfast buffet",
                "Beach grill lunch",
                "Seafood dinner",
            ],
            BudgetTier::Luxury => [
                "In-villa breakfast",
                "Overwater restaurant lunch",
                "Private sandbank dinner",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    Moderate,
    Active,
}

impl Pace {
    fn activities_per_day(self) -> usize {
        match self {
            Pace::Relaxed => 2,
            Pace::Moderate => 3,
            Pace::Active => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripTheme {
    Relaxation,
    Adventure,
    Cultural,
}

impl TripTheme {
    fn cost_multiplier(self) -> f64 {
        match self {
            TripTheme::Relaxation => 1.0,
            TripTheme::Adventure => 1.25,
            TripTheme::Cultural => 0.9,
        }
    }

    fn title(self) -> &'static str {
        match self {
            TripTheme::Relaxation => "Island Relaxation Retreat",
            TripTheme::Adventure => "Reef & Surf Adventure",
            TripTheme::Cultural => "Maldivian Culture Trail",
        }
    }

    fn activities(self) -> &'static [&'static str] {
        match self {
            TripTheme::Relaxation => &[
                "Sunrise yoga on the beach",
                "Spa treatment",
                "Sandbank picnic",
                "Sunset dolphin cruise",
                "Lagoon swim",
                "Hammock time with a book",
            ],
            TripTheme::Adventure => &[
                "Guided reef dive",
                "Manta point snorkel",
                "Surf session on the outer reef",
                "Night fishing trip",
                "Kayak around the island",
                "Nurse shark snorkel",
            ],
            TripTheme::Cultural => &[
                "Fish market tour",
                "Local island visit",
                "Boduberu drumming evening",
                "Dhoni boat building workshop",
                "Maldivian cooking class",
                "Mosque and museum walk",
            ],
        }
    }

    /// Whether the traveler's activity tags allow this theme
    fn is_offered(self, activities: &[String]) -> bool {
        let has = |tag: &str| activities.iter().any(|a| a.trim().eq_ignore_ascii_case(tag));
        match self {
            TripTheme::Relaxation => true,
            TripTheme::Adventure => has("diving") || has("surfing"),
            TripTheme::Cultural => has("culture"),
        }
    }
}

/// What the traveler asked for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripPreferences {
    pub budget: BudgetTier,
    pub pace: Pace,
    #[serde(default)]
    pub activities: Vec<String>,
    pub duration_days: u32,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
}

fn default_travelers() -> u32 {
    1
}

impl TripPreferences {
    /// Reject durations and group sizes outside what the planner handles
    pub fn validate(&self) -> Result<()> {
        if self.duration_days == 0 || self.duration_days > MAX_DURATION_DAYS {
            return Err(IslandHopError::validation(format!(
                "Trip duration must be between 1 and {MAX_DURATION_DAYS} days"
            )));
        }
        if self.travelers == 0 || self.travelers > MAX_TRAVELERS {
            return Err(IslandHopError::validation(format!(
                "Traveler count must be between 1 and {MAX_TRAVELERS}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripDay {
    /// 1-based
    pub day: u32,
    pub destination_id: String,
    pub destination_name: String,
    pub activities: Vec<String>,
    pub meals: Vec<String>,
    pub accommodation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedTrip {
    pub theme: TripTheme,
    pub title: String,
    pub summary: String,
    pub days: Vec<TripDay>,
    pub cost_per_person: f64,
    pub total_cost: f64,
    pub currency: String,
}

/// Build the themed trips the preferences allow, relaxation first.
///
/// An empty destination list, a zero-day duration or one longer than the
/// planner handles yields no trips.
#[must_use]
pub fn generate_trips(destinations: &[Destination], preferences: &TripPreferences) -> Vec<GeneratedTrip> {
    if destinations.is_empty() || preferences.duration_days == 0 {
        return Vec::new();
    }
    if preferences.duration_days > MAX_DURATION_DAYS {
        warn!(
            "Trip of {} days exceeds the {} day limit, nothing generated",
            preferences.duration_days, MAX_DURATION_DAYS
        );
        return Vec::new();
    }

    let trips: Vec<GeneratedTrip> = [TripTheme::Relaxation, TripTheme::Adventure, TripTheme::Cultural]
        .into_iter()
        .filter(|theme| theme.is_offered(&preferences.activities))
        .map(|theme| build_trip(theme, destinations, preferences))
        .collect();

    debug!(
        "Generated {} trips for {} days over {} destinations",
        trips.len(),
        preferences.duration_days,
        destinations.len()
    );
    trips
}

/// Destination index for a 0-based day, splitting days into even buckets
#[must_use]
pub fn destination_index_for_day(day_index: u32, duration_days: u32, destination_count: usize) -> usize {
    if destination_count == 0 {
        return 0;
    }
    let count = u32::try_from(destination_count).unwrap_or(u32::MAX);
    let bucket = (duration_days / count).max(1);
    ((day_index / bucket) as usize).min(destination_count - 1)
}

fn build_trip(theme: TripTheme, destinations: &[Destination], preferences: &TripPreferences) -> GeneratedTrip {
    let duration = preferences.duration_days;
    let per_day = preferences.pace.activities_per_day();
    let pool = theme.activities();
    let meals: Vec<String> = preferences.budget.meals().iter().map(|m| (*m).to_string()).collect();

    let days = (0..duration)
        .map(|i| {
            let destination = &destinations[destination_index_for_day(i, duration, destinations.len())];
            let activities = (0..per_day)
                .map(|j| pool[(i as usize * per_day + j) % pool.len()].to_string())
                .collect();
            TripDay {
                day: i + 1,
                destination_id: destination.id.clone(),
                destination_name: destination.name.clone(),
                activities,
                meals: meals.clone(),
                accommodation: preferences.budget.accommodation().to_string(),
            }
        })
        .collect();

    let cost_per_person = preferences.budget.daily_rate() * f64::from(duration) * theme.cost_multiplier();
    let travelers = preferences.travelers.max(1);
    let names: Vec<&str> = destinations.iter().map(|d| d.name.as_str()).collect();

    GeneratedTrip {
        theme,
        title: theme.title().to_string(),
        summary: format!("{duration} days across {}", names.join(", ")),
        days,
        cost_per_person,
        total_cost: cost_per_person * f64::from(travelers),
        currency: CURRENCY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use rstest::{fixture, rstest};

    #[fixture]
    fn destinations() -> Vec<Destination> {
        let registry = Registry::builtin();
        ["male", "maafushi", "ari-atoll"]
            .iter()
            .map(|id| registry.destination(id).unwrap().clone())
            .collect()
    }

    fn preferences(activities: &[&str]) -> TripPreferences {
        TripPreferences {
            budget: BudgetTier::Moderate,
            pace: Pace::Moderate,
            activities: activities.iter().map(|a| (*a).to_string()).collect(),
            duration_days: 7,
            travelers: 2,
        }
    }

    #[rstest]
    #[case(&[], vec![TripTheme::Relaxation])]
    #[case(&["Diving"], vec![TripTheme::Relaxation, TripTheme::Adventure])]
    #[case(&["surfing", "culture"], vec![TripTheme::Relaxation, TripTheme::Adventure, TripTheme::Cultural])]
    #[case(&["culture", "spa"], vec![TripTheme::Relaxation, TripTheme::Cultural])]
    fn test_theme_gating(destinations: Vec<Destination>, #[case] tags: &[&str], #[case] expected: Vec<TripTheme>) {
        let themes: Vec<TripTheme> = generate_trips(&destinations, &preferences(tags))
            .iter()
            .map(|t| t.theme)
            .collect();
        assert_eq!(themes, expected);
    }

    #[rstest]
    fn test_costs(destinations: Vec<Destination>) {
        let trips = generate_trips(&destinations, &preferences(&["diving", "culture"]));

        assert_eq!(trips[0].cost_per_person, 350.0 * 7.0);
        assert_eq!(trips[0].total_cost, 350.0 * 7.0 * 2.0);
        assert_eq!(trips[1].cost_per_person, 350.0 * 7.0 * 1.25);
        assert!((trips[2].cost_per_person - 350.0 * 7.0 * 0.9).abs() < 1e-9);
        assert!(trips.iter().all(|t| t.currency == "USD"));
    }

    #[rstest]
    fn test_days_spread_over_destinations(destinations: Vec<Destination>) {
        let trip = &generate_trips(&destinations, &preferences(&[]))[0];

        assert_eq!(trip.days.len(), 7);
        let ids: Vec<&str> = trip.days.iter().map(|d| d.destination_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["male", "male", "maafushi", "maafushi", "ari-atoll", "ari-atoll", "ari-atoll"]
        );
        assert!(trip.days.iter().all(|d| d.activities.len() == 3 && d.meals.len() == 3));
        assert_eq!(trip.days[0].day, 1);
        assert_eq!(trip.days[0].accommodation, "Boutique resort beach villa");
    }

    #[rstest]
    #[case(0, 2, 3, 0)]
    #[case(1, 2, 3, 1)]
    #[case(5, 2, 3, 2)]
    #[case(9, 10, 3, 2)]
    #[case(3, 10, 3, 1)]
    #[case(4, 5, 1, 0)]
    fn test_destination_index_for_day(
        #[case] day: u32,
        #[case] duration: u32,
        #[case] count: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(destination_index_for_day(day, duration, count), expected);
    }

    #[rstest]
    fn test_pace_changes_activity_count(destinations: Vec<Destination>) {
        let mut prefs = preferences(&[]);
        prefs.pace = Pace::Active;
        let trip = &generate_trips(&destinations, &prefs)[0];
        assert!(trip.days.iter().all(|d| d.activities.len() == 4));
    }

    #[rstest]
    fn test_empty_inputs(destinations: Vec<Destination>) {
        assert!(generate_trips(&[], &preferences(&["diving"])).is_empty());
        let mut prefs = preferences(&[]);
        prefs.duration_days = 0;
        assert!(generate_trips(&destinations, &prefs).is_empty());
    }

    #[rstest]
    #[case(MAX_DURATION_DAYS, 1)]
    #[case(MAX_DURATION_DAYS + 1, 0)]
    #[case(u32::MAX, 0)]
    fn test_duration_limit(destinations: Vec<Destination>, #[case] duration: u32, #[case] expected: usize) {
        let mut prefs = preferences(&[]);
        prefs.duration_days = duration;
        let trips = generate_trips(&destinations, &prefs);
        assert_eq!(trips.len(), expected);
        assert!(trips.iter().all(|t| t.days.len() == duration as usize));
    }

    #[test]
    fn test_preferences_validation() {
        let mut prefs = preferences(&[]);
        assert!(prefs.validate().is_ok());
        prefs.duration_days = 45;
        assert!(matches!(prefs.validate(), Err(IslandHopError::Validation { .. })));
        prefs.duration_days = 5;
        prefs.travelers = 0;
        assert!(prefs.validate().is_err());
    }
}
