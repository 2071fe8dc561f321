//! Error types and handling for the `IslandHop` planner

use thiserror::Error;

/// Main error type for the `IslandHop` planner
#[derive(Error, Debug)]
pub enum IslandHopError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather provider communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Registry data that cannot be loaded
    #[error("Data error: {message}")]
    Data { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl IslandHopError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new data error
    pub fn data<S: Into<String>>(message: S) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            IslandHopError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            IslandHopError::Api { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            IslandHopError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            IslandHopError::Data { .. } => {
                "Destination data could not be loaded. Please check the registry file.".to_string()
            }
            IslandHopError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for IslandHopError {
    fn from(err: reqwest::Error) -> Self {
        Self::api(err.to_string())
    }
}

impl From<serde_json::Error> for IslandHopError {
    fn from(err: serde_json::Error) -> Self {
        Self::data(err.to_string())
    }
}
