//! Destination and route registry
//!
//! Holds the static tables the planner works over: destinations (capital,
//! atolls, islands) and the ferry, speedboat and seaplane segments between
//! them. The tables are either the built-in defaults or a JSON export from
//! the CMS.

use crate::config::DataConfig;
use crate::models::{Destination, DestinationCategory, RouteSegment, TransportMode};
use crate::{IslandHopError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read-only lookup tables for destinations and route segments
#[derive(Debug, Clone)]
pub struct Registry {
    destinations: Vec<Destination>,
    routes: Vec<RouteSegment>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    destinations: Vec<Destination>,
    #[serde(default)]
    routes: Vec<RouteSegment>,
}

impl Registry {
    /// Build a registry, normalising ids to lowercase.
    ///
    /// Duplicate destinations keep their first occurrence and segments that
    /// reference an unknown destination are dropped.
    #[must_use]
    pub fn new(destinations: Vec<Destination>, routes: Vec<RouteSegment>) -> Self {
        let mut seen = HashSet::new();
        let destinations: Vec<Destination> = destinations
            .into_iter()
            .map(|mut d| {
                d.id = d.id.to_lowercase();
                d
            })
            .filter(|d| {
                let fresh = seen.insert(d.id.clone());
                if !fresh {
                    warn!("Duplicate destination '{}' ignored", d.id);
                }
                fresh
            })
            .collect();

        let routes = routes
            .into_iter()
            .map(|mut r| {
                r.from = r.from.to_lowercase();
                r.to = r.to.to_lowercase();
                r
            })
            .filter(|r| {
                let known = seen.contains(&r.from) && seen.contains(&r.to);
                if !known {
                    warn!(
                        "Route '{}' references unknown destination ({} -> {}), dropped",
                        r.id, r.from, r.to
                    );
                }
                known
            })
            .collect();

        Self {
            destinations,
            routes,
        }
    }

    /// Load from the configured JSON file, or fall back to the built-in tables
    pub fn load(config: &DataConfig) -> Result<Self> {
        match &config.registry_path {
            Some(path) => Self::from_json_file(path),
            None => {
                debug!("No registry path configured, using built-in tables");
                Ok(Self::builtin())
            }
        }
    }

    /// Load a `{ "destinations": [...], "routes": [...] }` document
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&raw).map_err(|e| {
            IslandHopError::data(format!("Failed to parse registry {}: {e}", path.display()))
        })?;
        info!(
            "Loaded {} destinations and {} routes from {}",
            registry.destinations.len(),
            registry.routes.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(raw)?;
        if file.destinations.is_empty() {
            return Err(IslandHopError::data("Registry contains no destinations"));
        }
        Ok(Self::new(file.destinations, file.routes))
    }

    #[must_use]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteSegment] {
        &self.routes
    }

    /// Case-insensitive lookup by id
    #[must_use]
    pub fn destination(&self, id: &str) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|d| d.id.eq_ignore_ascii_case(id.trim()))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.destination(id).is_some()
    }

    /// Segments touching `id`, in table order
    pub fn routes_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RouteSegment> + 'a {
        self.routes.iter().filter(move |r| r.other_end(id).is_some())
    }

    /// The Maldives tables shipped with the crate
    #[must_use]
    pub fn builtin() -> Self {
        use DestinationCategory::{Atoll, Capital, Island};
        use TransportMode::{Ferry, Seaplane, Speedboat};

        let destinations = vec![
            Destination::new("male", "Malé", Capital, 4.1755, 73.5093)
                .with_highlights(&["Fish market", "Grand Friday Mosque", "Artificial Beach"]),
            Destination::new("north-male-atoll", "North Malé Atoll", Atoll, 4.4167, 73.5000)
                .with_highlights(&["Banana Reef", "Surf breaks", "Resort islands"]),
            Destination::new("south-male-atoll", "South Malé Atoll", Atoll, 3.9500, 73.4500)
                .with_highlights(&["Cocoa Corner", "Guraidhoo Kandu"]),
            Destination::new("maafushi", "Maafushi", Island, 3.9434, 73.4903)
                .with_highlights(&["Bikini beach", "Guesthouses", "Sandbank trips"]),
            Destination::new("ari-atoll", "Ari Atoll", Atoll, 3.8667, 72.8333)
                .with_highlights(&["Whale sharks", "Manta Point", "Underwater restaurants"]),
            Destination::new("thoddoo", "Thoddoo", Island, 4.4378, 72.9594)
                .with_highlights(&["Fruit farms", "Local island life"]),
            Destination::new("baa-atoll", "Baa Atoll", Atoll, 5.1667, 73.0500)
                .with_highlights(&["Hanifaru Bay", "UNESCO Biosphere Reserve"]),
            Destination::new("lhaviyani-atoll", "Lhaviyani Atoll", Atoll, 5.3333, 73.5167)
                .with_highlights(&["Shipwreck dives", "Turtle reefs"]),
            Destination::new("vaavu-atoll", "Vaavu Atoll", Atoll, 3.4167, 73.4333)
                .with_highlights(&["Shark tank", "Fotteyo Kandu"]),
            Destination::new("addu-atoll", "Addu Atoll", Atoll, -0.6301, 73.1586)
                .with_highlights(&["British Loyalty wreck", "Link road cycling"]),
            Destination::new("fuvahmulah", "Fuvahmulah", Island, -0.2988, 73.4241)
                .with_highlights(&["Tiger sharks", "Freshwater lakes"]),
        ];

        let routes = vec![
            RouteSegment::new("fe-male-nma", "male", "north-male-atoll", Ferry, 60, 5.0, 120, "Daily"),
            RouteSegment::new("sb-male-nma", "male", "north-male-atoll", Speedboat, 30, 35.0, 25, "Hourly"),
            RouteSegment::new("fe-male-sma", "male", "south-male-atoll", Ferry, 90, 6.0, 120, "Daily"),
            RouteSegment::new("sb-male-sma", "male", "south-male-atoll", Speedboat, 45, 40.0, 25, "Every 2 hours"),
            RouteSegment::new("fe-male-maafushi", "male", "maafushi", Ferry, 90, 3.0, 100, "Daily except Friday"),
            RouteSegment::new("sb-male-maafushi", "male", "maafushi", Speedboat, 35, 25.0, 30, "3x daily"),
            RouteSegment::new("fe-male-ari", "male", "ari-atoll", Ferry, 240, 10.0, 100, "Sat, Mon, Wed"),
            RouteSegment::new("sb-male-ari", "male", "ari-atoll", Speedboat, 90, 60.0, 30, "Daily"),
            RouteSegment::new("sp-male-ari", "male", "ari-atoll", Seaplane, 30, 450.0, 15, "Daily"),
            RouteSegment::new("sb-male-thoddoo", "male", "thoddoo", Speedboat, 90, 45.0, 30, "Daily"),
            RouteSegment::new("fe-male-thoddoo", "male", "thoddoo", Ferry, 210, 4.0, 100, "Mon, Thu"),
            RouteSegment::new("sb-male-baa", "male", "baa-atoll", Speedboat, 150, 90.0, 25, "Daily"),
            RouteSegment::new("sp-male-baa", "male", "baa-atoll", Seaplane, 35, 500.0, 15, "Daily"),
            RouteSegment::new("sp-male-lhaviyani", "male", "lhaviyani-atoll", Seaplane, 40, 520.0, 15, "Daily"),
            RouteSegment::new("sb-male-lhaviyani", "male", "lhaviyani-atoll", Speedboat, 180, 100.0, 25, "Sun, Tue, Thu"),
            RouteSegment::new("fe-male-vaavu", "male", "vaavu-atoll", Ferry, 180, 8.0, 100, "Sun, Tue, Thu"),
            RouteSegment::new("sb-male-vaavu", "male", "vaavu-atoll", Speedboat, 75, 55.0, 25, "Daily"),
            RouteSegment::new("sp-male-addu", "male", "addu-atoll", Seaplane, 90, 300.0, 50, "Daily"),
            RouteSegment::new("fe-addu-fuvahmulah", "addu-atoll", "fuvahmulah", Ferry, 180, 15.0, 80, "Tue, Sat"),
            RouteSegment::new("sb-addu-fuvahmulah", "addu-atoll", "fuvahmulah", Speedboat, 120, 60.0, 20, "Daily"),
            RouteSegment::new("sb-sma-maafushi", "south-male-atoll", "maafushi", Speedboat, 20, 15.0, 20, "On request"),
            RouteSegment::new("sb-ari-thoddoo", "ari-atoll", "thoddoo", Speedboat, 45, 30.0, 20, "Daily"),
        ];

        Self::new(destinations, routes)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
