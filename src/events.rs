//! Planning events
//!
//! Operations report what they did to an [`EventSink`] handed in by the
//! caller instead of a process-wide tracker.

use crate::routing::ItineraryFailure;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TripEvent {
    ItineraryBuilt {
        destinations: usize,
        segments: usize,
        total_cost: f64,
    },
    ItineraryUnresolved {
        failure: ItineraryFailure,
    },
    WeatherScored {
        score: u8,
        data_available: bool,
    },
    TripsGenerated {
        count: usize,
        duration_days: u32,
    },
}

impl TripEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TripEvent::ItineraryBuilt { .. } => "itinerary_built",
            TripEvent::ItineraryUnresolved { .. } => "itinerary_unresolved",
            TripEvent::WeatherScored { .. } => "weather_scored",
            TripEvent::TripsGenerated { .. } => "trips_generated",
        }
    }
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: TripEvent);
}

/// Logs every event at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: TripEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(event = event.name(), "{}", payload),
            Err(_) => info!(event = event.name(), "{:?}", event),
        }
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn record(&self, _event: TripEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<TripEvent>>);

    impl EventSink for RecordingSink {
        fn record(&self, event: TripEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_sinks_are_interchangeable() {
        let recording = Arc::new(RecordingSink::default());
        let sinks: Vec<Arc<dyn EventSink>> = vec![
            Arc::new(NullEventSink),
            Arc::new(TracingEventSink),
            recording.clone(),
        ];

        for sink in &sinks {
            sink.record(TripEvent::WeatherScored {
                score: 80,
                data_available: true,
            });
        }

        let events = recording.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "weather_scored");
    }

    #[test]
    fn test_event_serialization() {
        let event = TripEvent::ItineraryUnresolved {
            failure: ItineraryFailure::NoConnection {
                from: "maafushi".to_string(),
                to: "fuvahmulah".to_string(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "itinerary_unresolved");
        assert_eq!(json["failure"]["reason"], "no_connection");
        assert_eq!(json["failure"]["from"], "maafushi");
    }
}
