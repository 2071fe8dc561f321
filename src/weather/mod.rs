//! Weather lookup and travel scoring
//!
//! A [`ForecastProvider`] fetches daily forecasts; [`WeatherService`] turns
//! them into travel recommendations and compares destinations.

pub mod open_meteo;
pub mod scoring;

use crate::Result;
use crate::config::WeatherConfig;
use crate::models::{Coordinates, DailyForecast, Destination};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use chrono_tz::Indian::Maldives;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use open_meteo::OpenMeteoClient;
pub use scoring::{
    AlertKind, AlertSeverity, TravelRecommendation, WeatherAlert, WeatherAverages,
    calculate_travel_score, is_activity_suitable, recommendation_for_score,
};

/// Source of daily forecasts for a coordinate pair
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Forecast for `days` consecutive days starting at `start_date`
    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
        start_date: NaiveDate,
        days: u32,
    ) -> Result<Vec<DailyForecast>>;
}

/// Current calendar date in the Maldives
#[must_use]
pub fn local_today() -> NaiveDate {
    Utc::now().with_timezone(&Maldives).date_naive()
}

/// Recommendation for one destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DestinationWeather {
    pub destination: Destination,
    pub recommendation: TravelRecommendation,
}

/// Fetches forecasts and scores them
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn ForecastProvider>,
    default_days: u32,
}

impl WeatherService {
    #[must_use]
    pub fn new(provider: Arc<dyn ForecastProvider>, default_days: u32) -> Self {
        Self {
            provider,
            default_days: default_days.max(1),
        }
    }

    /// Service backed by Open-Meteo
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let client = OpenMeteoClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.forecast_days))
    }

    #[must_use]
    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    /// Forecast starting today. Fetch or parse failures are logged and yield
    /// an empty forecast; there is no retry.
    pub async fn get_forecast(&self, coordinates: Coordinates, days: Option<u32>) -> Vec<DailyForecast> {
        let days = days.unwrap_or(self.default_days);
        match self
            .provider
            .fetch_forecast(coordinates, local_today(), days)
            .await
        {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(
                    "Forecast unavailable for {}: {}",
                    coordinates.format_coordinates(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Fetch and score. A failed fetch scores neutral with `data_available == false`.
    pub async fn get_travel_recommendation(
        &self,
        coordinates: Coordinates,
        days: Option<u32>,
    ) -> TravelRecommendation {
        let forecast = self.get_forecast(coordinates, days).await;
        let recommendation = calculate_travel_score(&forecast);
        debug!(
            "Travel score for {}: {} ({} days)",
            coordinates.format_coordinates(),
            recommendation.score,
            forecast.len()
        );
        recommendation
    }

    /// Score each destination in turn and return the best one.
    ///
    /// Ties keep the earlier destination. Returns `None` for an empty list.
    pub async fn compare_destinations(
        &self,
        destinations: &[Destination],
        days: Option<u32>,
    ) -> Option<DestinationWeather> {
        let mut best: Option<DestinationWeather> = None;
        for destination in destinations {
            let recommendation = self
                .get_travel_recommendation(destination.coordinates, days)
                .await;
            let better = best
                .as_ref()
                .is_none_or(|current| recommendation.score > current.recommendation.score);
            if better {
                best = Some(DestinationWeather {
                    destination: destination.clone(),
                    recommendation,
                });
            }
        }

        if let Some(best) = &best {
            info!(
                "Best weather among {} destinations: {} ({})",
                destinations.len(),
                best.destination.name,
                best.recommendation.score
            );
        }
        best
    }
}
