use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use islandhop::{
    IslandHopConfig, Registry, TracingEventSink, WeatherService, api::AppState, logging, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ISLANDHOP_CONFIG").ok())
        .map(PathBuf::from);
    let config = IslandHopConfig::load_from_path(config_path)?;
    logging::init(&config.logging)?;

    let registry = Registry::load(&config.data).context("Failed to load destination registry")?;
    tracing::info!(
        "Loaded {} destinations and {} routes",
        registry.destinations().len(),
        registry.routes().len()
    );

    let weather =
        WeatherService::from_config(&config.weather).context("Failed to set up weather client")?;
    let state = AppState::new(
        registry,
        config.routing.clone(),
        weather,
        Arc::new(TracingEventSink),
    );

    web::run(state, config.server.port).await
}
