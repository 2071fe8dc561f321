//! `OpenMeteo` daily forecast client
//!
//! Open-Meteo needs no API key. One request returns every daily field the
//! scorer uses for a coordinate pair and date range.

use super::ForecastProvider;
use crate::config::WeatherConfig;
use crate::models::{Coordinates, DailyForecast, WeatherCondition};
use crate::{IslandHopError, Result};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean,precipitation_sum,wind_speed_10m_max,relative_humidity_2m_mean,uv_index_max,weather_code";

/// Wind above this (km/h) turns an otherwise dry day into `Windy`
const WINDY_THRESHOLD_KMH: f32 = 40.0;

/// HTTP client for the Open-Meteo forecast endpoint
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a new client from the weather settings
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("IslandHop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IslandHopError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self, coordinates: Coordinates, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&timezone=Indian%2FMaldives&start_date={}&end_date={}",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            DAILY_FIELDS,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
        start_date: NaiveDate,
        days: u32,
    ) -> Result<Vec<DailyForecast>> {
        if !coordinates.is_valid() {
            return Err(IslandHopError::validation(format!(
                "Invalid coordinates: {}",
                coordinates.format_coordinates()
            )));
        }

        let days = days.clamp(1, 16);
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| IslandHopError::validation("Forecast window out of range"))?;

        let url = self.forecast_url(coordinates, start_date, end_date);
        debug!("OpenMeteo API request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IslandHopError::api(format!(
                "OpenMeteo API error {status}: {body}"
            )));
        }

        let parsed: DailyResponse = response
            .json()
            .await
            .map_err(|e| IslandHopError::api(format!("Failed to parse OpenMeteo response: {e}")))?;

        let forecast = parsed.into_forecast();
        let elapsed = start_time.elapsed();
        info!(
            "Retrieved {} forecast days in {:.3}s",
            forecast.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 5 {
            warn!("Slow forecast API response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(forecast)
    }
}

/// Daily forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyResponse {
    pub daily: Option<DailyData>,
}

/// Daily weather data from `OpenMeteo`; every series is parallel to `time`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f32>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f32>>>,
    #[serde(rename = "temperature_2m_mean")]
    pub temperature_mean: Option<Vec<Option<f32>>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Option<Vec<Option<f32>>>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f32>>>,
    #[serde(rename = "relative_humidity_2m_mean")]
    pub humidity: Option<Vec<Option<f32>>>,
    #[serde(rename = "uv_index_max")]
    pub uv_index: Option<Vec<Option<f32>>>,
    pub weather_code: Option<Vec<Option<u8>>>,
}

fn value_at<T: Copy>(series: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    series.as_ref().and_then(|values| values.get(i).copied().flatten())
}

impl DailyResponse {
    /// Convert to daily forecasts.
    ///
    /// Days without a parsable date or any temperature reading are skipped;
    /// other missing readings count as zero.
    #[must_use]
    pub fn into_forecast(self) -> Vec<DailyForecast> {
        let Some(daily) = self.daily else {
            return Vec::new();
        };

        daily
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, raw_date)| {
                let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").ok()?;
                let max = value_at(&daily.temperature_max, i);
                let min = value_at(&daily.temperature_min, i);
                let temperature = value_at(&daily.temperature_mean, i).or(match (min, max) {
                    (Some(lo), Some(hi)) => Some((lo + hi) / 2.0),
                    (lo, hi) => lo.or(hi),
                })?;

                let wind_speed = value_at(&daily.wind_speed_max, i).unwrap_or(0.0);
                let precipitation = value_at(&daily.precipitation, i).unwrap_or(0.0);
                let mut condition = WeatherCondition::from_wmo_code(value_at(&daily.weather_code, i).unwrap_or(0));
                if wind_speed > WINDY_THRESHOLD_KMH
                    && matches!(
                        condition,
                        WeatherCondition::Sunny | WeatherCondition::PartlyCloudy | WeatherCondition::Cloudy
                    )
                {
                    condition = WeatherCondition::Windy;
                }

                Some(DailyForecast {
                    date,
                    temperature,
                    temperature_min: min.unwrap_or(temperature),
                    temperature_max: max.unwrap_or(temperature),
                    precipitation,
                    wind_speed,
                    humidity: value_at(&daily.humidity, i).unwrap_or(0.0),
                    uv_index: value_at(&daily.uv_index, i).unwrap_or(0.0),
                    condition,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "latitude": 4.18,
        "longitude": 73.5,
        "timezone": "Indian/Maldives",
        "daily": {
            "time": ["2026-02-10", "2026-02-11", "2026-02-12", "not-a-date"],
            "temperature_2m_max": [30.1, 29.8, null, 30.0],
            "temperature_2m_min": [26.3, 26.0, null, 26.0],
            "temperature_2m_mean": [28.0, null, null, 28.0],
            "precipitation_sum": [0.4, 12.5, 3.0, 0.0],
            "wind_speed_10m_max": [14.2, 45.0, 10.0, 10.0],
            "relative_humidity_2m_mean": [74, 88, 80, 70],
            "uv_index_max": [9.5, 6.1, 8.0, 9.0],
            "weather_code": [1, 3, 61, 0]
        }
    }"#;

    #[test]
    fn test_into_forecast() {
        let response: DailyResponse = serde_json::from_str(SAMPLE).unwrap();
        let forecast = response.into_forecast();

        // day 3 has no temperature, day 4 has no valid date
        assert_eq!(forecast.len(), 2);

        assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        assert_eq!(forecast[0].temperature, 28.0);
        assert_eq!(forecast[0].condition, WeatherCondition::Sunny);
        assert_eq!(forecast[0].humidity, 74.0);
        assert_eq!(forecast[0].uv_index, 9.5);

        // mean falls back to the midpoint, strong wind marks the day windy
        assert!((forecast[1].temperature - 27.9).abs() < 1e-4);
        assert_eq!(forecast[1].condition, WeatherCondition::Windy);
        assert_eq!(forecast[1].precipitation, 12.5);
    }

    #[test]
    fn test_missing_daily_block() {
        let response: DailyResponse = serde_json::from_str(r#"{"latitude": 1.0}"#).unwrap();
        assert!(response.into_forecast().is_empty());
    }

    #[test]
    fn test_forecast_url() {
        let client = OpenMeteoClient::new(&WeatherConfig::default()).unwrap();
        let url = client.forecast_url(
            Coordinates::new(4.1755, 73.5093),
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
        );
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?latitude=4.1755&longitude=73.5093"));
        assert!(url.contains("start_date=2026-02-10&end_date=2026-02-16"));
        assert!(url.contains("uv_index_max"));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected_before_request() {
        let client = OpenMeteoClient::new(&WeatherConfig::default()).unwrap();
        let result = client
            .fetch_forecast(
                Coordinates::new(120.0, 73.5),
                NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                3,
            )
            .await;
        assert!(matches!(result, Err(IslandHopError::Validation { .. })));
    }
}
