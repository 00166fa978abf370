//! Binary crate for the `agri` command.
//!
//! - `serve` runs the forecast API against PostgreSQL
//! - `forecasts`, `joke` and `seed` are the client-side tools

use agri_core::{ConfigError, DatabaseError, NetworkError};
use agri_forecast::ForecastError;
use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // A .env file is optional; variables already set take precedence.
    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e).context("Failed to read .env file"),
    };

    agri_core::init()?;
    if let Some(path) = dotenv {
        tracing::info!("Environment variables loaded from {}", path.display());
    }

    let result = cli.run().await;
    if let Err(e) = &result {
        if let Some(hint) = hint_for(e) {
            tracing::error!("{}", hint);
        }
    }
    result
}

/// Operator hint for the first known error in the chain.
fn hint_for(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ForecastError>() {
            Some(e.user_message())
        } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.user_message().to_string())
        } else if let Some(e) = cause.downcast_ref::<DatabaseError>() {
            Some(e.user_message().to_string())
        } else {
            cause
                .downcast_ref::<NetworkError>()
                .map(|e| e.user_message().to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_found_through_context() {
        let err = anyhow::Error::new(ConfigError::MissingEnvVars(vec!["DB_HOST".into()]))
            .context("Failed to start");
        assert_eq!(
            hint_for(&err).as_deref(),
            Some("Set the named DB_* variables in the environment or in .env.")
        );
    }

    #[test]
    fn test_forecast_error_hint_wins() {
        let err = anyhow::Error::new(ForecastError::Api {
            status: 503,
            message: String::new(),
        });
        assert!(hint_for(&err).unwrap().contains("try again later"));
    }

    #[test]
    fn test_no_hint_for_unknown_errors() {
        assert_eq!(hint_for(&anyhow::anyhow!("boom")), None);
    }
}
