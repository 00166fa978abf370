//! Error types shared by the Agri crates.
//!
//! Startup problems (configuration, database bootstrap) are fatal and carry
//! a `user_message()` hint for the operator. Transport failures of the
//! forecast API client are described by [`NetworkError`].

use thiserror::Error;

/// Transport-level failures talking to the forecast API.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Could not reach the forecast API: {0}")]
    ConnectionFailed(String),

    #[error("Forecast API request timed out")]
    Timeout,

    #[error("Forecast API answered {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Forecast API response could not be read: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "The forecast API is unreachable. Check forecast_api.base_url."
            }
            NetworkError::Timeout => {
                "The forecast API did not answer in time. Raise forecast_api.timeout_secs or retry."
            }
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The forecast API failed internally. Check the server log."
            }
            NetworkError::ServerError { .. } => "The forecast API rejected the request.",
            NetworkError::InvalidResponse(_) => "The forecast API sent a response that is not forecast data.",
        }
    }
}

/// Database connectivity errors raised while bootstrapping the store.
///
/// Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection failed due to PostgreSQL error: {0}")]
    Driver(String),

    #[error("Database connection failed due to invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Database connection failed due to an argument error: {0}")]
    Argument(String),

    #[error("Database connection failed due to an unexpected error: {0}")]
    Unexpected(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::Driver(_) => {
                "PostgreSQL refused the connection. Check DB_HOST, DB_PORT and the credentials."
            }
            DatabaseError::InvalidOperation(_) => {
                "No database connection became available. Check that PostgreSQL is running."
            }
            DatabaseError::Argument(_) => {
                "The connection string is malformed. Check database.connection_string."
            }
            DatabaseError::Unexpected(_) => "The database could not be reached.",
        }
    }
}

/// Configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not load configuration: {0}")]
    ParseError(String),

    #[error("Required setting {0} is not set")]
    MissingSetting(String),

    #[error("One or more required environment variables are not set: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Fix the reported setting in agri.toml or the AGRI_* variables.",
            ConfigError::ParseError(_) => "agri.toml or an AGRI_* variable could not be read.",
            ConfigError::MissingSetting(_) => "Add the named setting to agri.toml or the environment.",
            ConfigError::MissingEnvVars(_) => {
                "Set the named DB_* variables in the environment or in .env."
            }
        }
    }
}

/// Maps reqwest failures onto [`NetworkError`].
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        let detail = self.to_string();
        match self.status() {
            _ if self.is_timeout() => NetworkError::Timeout,
            _ if self.is_decode() => NetworkError::InvalidResponse(detail),
            Some(status) => NetworkError::ServerError {
                status: status.as_u16(),
                message: detail,
            },
            None => NetworkError::ConnectionFailed(detail),
        }
    }
}
