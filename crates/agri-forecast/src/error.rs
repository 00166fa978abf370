//! Forecast-specific error types.

use agri_core::{ConfigError, NetworkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ForecastError {
    /// User-friendly error message for CLI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "Forecasts could not be loaded from the database".to_string(),
            Self::Validation(msg) => format!("Invalid forecast: {}", msg),
            Self::Network(e) => e.user_message().to_string(),
            Self::Api { status, .. } if *status >= 500 => {
                "The forecast API is experiencing issues. Please try again later.".to_string()
            }
            Self::Api { status, .. } => format!("The forecast API rejected the request ({})", status),
            Self::InvalidResponse(_) => "The forecast API returned malformed data".to_string(),
            Self::Config(e) => e.user_message().to_string(),
        }
    }
}

/// Result type for forecast operations.
pub type ForecastResult<T> = Result<T, ForecastError>;
