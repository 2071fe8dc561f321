//! Data models for the IslandHop planner
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and distances
//! - Destination: Capital, atolls and islands
//! - Route: Ferry, speedboat and seaplane segments
//! - Weather: Daily forecasts and conditions

pub mod destination;
pub mod location;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use destination::{Destination, DestinationCategory};
pub use location::Coordinates;
pub use route::{RouteSegment, TransportMode};
pub use weather::{DailyForecast, WeatherCondition};
