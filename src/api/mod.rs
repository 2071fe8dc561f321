use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::{
    IslandHopError,
    config::RoutingConfig,
    events::{EventSink, TripEvent},
    models::{Coordinates, Destination, RouteSegment},
    registry::Registry,
    routing::{
        Itinerary, ItineraryBuilder, ItineraryOption, RouteResolver, TravelPreference,
        ValidationReport, validate_itinerary,
    },
    trips::{GeneratedTrip, TripPreferences, generate_trips},
    weather::{DestinationWeather, TravelRecommendation, WeatherService, local_today},
};

const MAX_FORECAST_DAYS: u32 = 16;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub routing: RoutingConfig,
    pub weather: WeatherService,
    pub events: Arc<dyn EventSink>,
}

impl AppState {
    pub fn new(
        registry: Registry,
        routing: RoutingConfig,
        weather: WeatherService,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            routing,
            weather,
            events,
        }
    }

    fn resolver(&self) -> RouteResolver<'_> {
        RouteResolver::from_config(&self.registry, &self.routing)
    }

    fn lookup(&self, ids: &[String]) -> Result<Vec<Destination>, ApiError> {
        ids.iter()
            .map(|id| {
                self.registry.destination(id).cloned().ok_or_else(|| {
                    ApiError::from(IslandHopError::validation(format!(
                        "Unknown destination: {id}"
                    )))
                })
            })
            .collect()
    }
}

pub enum ApiError {
    NotFound(String),
    Planner(IslandHopError),
}

impl From<IslandHopError> for ApiError {
    fn from(err: IslandHopError) -> Self {
        ApiError::Planner(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Planner(err) => {
                warn!("Request failed: {}", err);
                let status = match err {
                    IslandHopError::Validation { .. } => StatusCode::BAD_REQUEST,
                    IslandHopError::Api { .. } => StatusCode::BAD_GATEWAY,
                    IslandHopError::Data { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    IslandHopError::Config { .. } | IslandHopError::Io { .. } => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.user_message())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct RouteQuery {
    pub from: String,
    pub to: String,
}

#[derive(Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub destinations: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub preference: Option<TravelPreference>,
}

#[derive(Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
    pub days: Option<u32>,
}

#[derive(Serialize, Deserialize)]
pub struct CompareRequest {
    pub destinations: Vec<String>,
    pub days: Option<u32>,
}

#[derive(Serialize, Deserialize)]
pub struct TripRequest {
    pub destinations: Vec<String>,
    #[serde(flatten)]
    pub preferences: TripPreferences,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/destinations", get(list_destinations))
        .route("/routes", get(direct_routes))
        .route("/itineraries", post(build_itinerary))
        .route("/itineraries/options", post(itinerary_options))
        .route("/itineraries/validate", post(check_itinerary))
        .route("/weather", get(weather_score))
        .route("/weather/compare", post(compare_weather))
        .route("/trips", post(create_trips))
        .with_state(state)
}

async fn list_destinations(State(state): State<AppState>) -> Json<Vec<Destination>> {
    Json(state.registry.destinations().to_vec())
}

async fn direct_routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<Vec<RouteSegment>> {
    Json(state.resolver().find_direct_routes(&query.from, &query.to))
}

async fn build_itinerary(
    State(state): State<AppState>,
    Json(request): Json<ItineraryRequest>,
) -> Result<Json<Itinerary>, ApiError> {
    let start_date = request.start_date.unwrap_or_else(local_today);
    let builder = ItineraryBuilder::new(state.resolver());

    match builder.build_itinerary(&request.destinations, start_date, request.preference) {
        Ok(itinerary) => {
            state.events.record(TripEvent::ItineraryBuilt {
                destinations: itinerary.destinations.len(),
                segments: itinerary.segments.len(),
                total_cost: itinerary.total_cost_amount,
            });
            Ok(Json(itinerary))
        }
        Err(failure) => {
            let message = failure.to_string();
            state.events.record(TripEvent::ItineraryUnresolved { failure });
            Err(ApiError::NotFound(message))
        }
    }
}

async fn itinerary_options(
    State(state): State<AppState>,
    Json(request): Json<ItineraryRequest>,
) -> Json<Vec<ItineraryOption>> {
    let start_date = request.start_date.unwrap_or_else(local_today);
    let builder = ItineraryBuilder::new(state.resolver());
    Json(builder.generate_itinerary_options(&request.destinations, start_date))
}

async fn check_itinerary(Json(itinerary): Json<Itinerary>) -> Json<ValidationReport> {
    Json(validate_itinerary(&itinerary))
}

async fn weather_score(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<TravelRecommendation>, ApiError> {
    let coordinates = Coordinates::new(query.lat, query.lon);
    if !coordinates.is_valid() {
        return Err(IslandHopError::validation(format!(
            "Invalid coordinates: {}",
            coordinates.format_coordinates()
        ))
        .into());
    }
    let days = validate_days(query.days)?;

    let recommendation = state.weather.get_travel_recommendation(coordinates, days).await;
    state.events.record(TripEvent::WeatherScored {
        score: recommendation.score,
        data_available: recommendation.data_available,
    });
    Ok(Json(recommendation))
}

async fn compare_weather(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<DestinationWeather>, ApiError> {
    let destinations = state.lookup(&request.destinations)?;
    let days = validate_days(request.days)?;

    let best = state
        .weather
        .compare_destinations(&destinations, days)
        .await
        .ok_or_else(|| ApiError::NotFound("No destinations to compare".to_string()))?;
    state.events.record(TripEvent::WeatherScored {
        score: best.recommendation.score,
        data_available: best.recommendation.data_available,
    });
    Ok(Json(best))
}

async fn create_trips(
    State(state): State<AppState>,
    Json(request): Json<TripRequest>,
) -> Result<Json<Vec<GeneratedTrip>>, ApiError> {
    request.preferences.validate()?;
    let destinations = state.lookup(&request.destinations)?;

    let trips = generate_trips(&destinations, &request.preferences);
    state.events.record(TripEvent::TripsGenerated {
        count: trips.len(),
        duration_days: request.preferences.duration_days,
    });
    Ok(Json(trips))
}

fn validate_days(days: Option<u32>) -> Result<Option<u32>, ApiError> {
    match days {
        Some(d) if d == 0 || d > MAX_FORECAST_DAYS => Err(IslandHopError::validation(format!(
            "Forecast days must be between 1 and {MAX_FORECAST_DAYS}"
        ))
        .into()),
        other => Ok(other),
    }
}
