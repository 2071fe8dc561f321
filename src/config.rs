//! Configuration management for the `IslandHop` planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::IslandHopError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IslandHopConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Route resolution settings
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Destination and route data
    #[serde(default)]
    pub data: DataConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Number of forecast days fetched when the caller does not ask for a count
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// Route resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Destination id used as the transfer hub
    #[serde(default = "default_hub")]
    pub hub: String,
    /// `hub` (direct or one transfer via the hub) or `search` (breadth-first)
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Maximum legs per connection for the `search` strategy
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Registry data settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON registry exported by the CMS; the built-in tables are used when unset
    pub registry_path: Option<PathBuf>,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_forecast_days() -> u32 {
    7
}

fn default_hub() -> String {
    "male".to_string()
}

fn default_strategy() -> String {
    "hub".to_string()
}

fn default_max_hops() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            hub: default_hub(),
            strategy: default_strategy(),
            max_hops: default_max_hops(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl IslandHopConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // ISLANDHOP__ROUTING__HUB=male style overrides
        builder = builder.add_source(
            Environment::with_prefix("ISLANDHOP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: IslandHopConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("islandhop").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.forecast_days == 0 {
            self.weather.forecast_days = default_forecast_days();
        }
        if self.routing.hub.is_empty() {
            self.routing.hub = default_hub();
        }
        if self.routing.strategy.is_empty() {
            self.routing.strategy = default_strategy();
        }
        if self.routing.max_hops == 0 {
            self.routing.max_hops = default_max_hops();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                IslandHopError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        // Open-Meteo serves at most 16 forecast days
        if self.weather.forecast_days > 16 {
            return Err(IslandHopError::config("Forecast days cannot exceed 16").into());
        }

        if self.routing.max_hops > 6 {
            return Err(IslandHopError::config("Routing max hops cannot exceed 6").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(IslandHopError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(IslandHopError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_strategies = ["hub", "search"];
        if !valid_strategies.contains(&self.routing.strategy.as_str()) {
            return Err(IslandHopError::config(format!(
                "Invalid routing strategy '{}'. Must be one of: {}",
                self.routing.strategy,
                valid_strategies.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(IslandHopError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = IslandHopConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.routing.hub, "male");
        assert_eq!(config.routing.strategy, "hub");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.port, 8080);
        assert!(config.data.registry_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = IslandHopConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_strategy() {
        let mut config = IslandHopConfig::default();
        config.routing.strategy = "dijkstra".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid routing strategy"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = IslandHopConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_apply_defaults_fills_zeroed_values() {
        let mut config = IslandHopConfig::default();
        config.routing.hub = String::new();
        config.weather.forecast_days = 0;
        config.apply_defaults();
        assert_eq!(config.routing.hub, "male");
        assert_eq!(config.weather.forecast_days, 7);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[routing]\nstrategy = \"search\"\nmax_hops = 2\n\n[server]\nport = 9000").unwrap();

        let config = IslandHopConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.routing.strategy, "search");
        assert_eq!(config.routing.max_hops, 2);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.routing.hub, "male");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = IslandHopConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("islandhop"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
