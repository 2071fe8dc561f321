//! `IslandHop` - Maldives trip planning
//!
//! This library provides ferry, speedboat and seaplane route resolution,
//! multi-stop itinerary building, weather-based travel scoring and themed
//! trip suggestions, plus the JSON HTTP API that serves them.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod registry;
pub mod routing;
pub mod trips;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::IslandHopConfig;
pub use error::IslandHopError;
pub use events::{EventSink, NullEventSink, TracingEventSink, TripEvent};
pub use models::{Coordinates, DailyForecast, Destination, RouteSegment, TransportMode};
pub use registry::Registry;
pub use routing::{
    Itinerary, ItineraryBuilder, ItineraryFailure, RouteResolver, RouteStrategy, TravelPreference,
    validate_itinerary,
};
pub use trips::{GeneratedTrip, TripPreferences, generate_trips};
pub use weather::{ForecastProvider, TravelRecommendation, WeatherService, calculate_travel_score};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, IslandHopError>;
