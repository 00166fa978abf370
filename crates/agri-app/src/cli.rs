use std::path::PathBuf;

use agri_core::Config;
use clap::{Parser, Subcommand};

use crate::commands;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "agri", version, about = "Agri forecast service")]
pub struct Cli {
    /// Path to a TOML config file (default: ./agri.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the forecast API. Requires DB_HOST, DB_PORT, DB_DATABASE,
    /// DB_USERNAME and DB_PASSWORD.
    Serve {
        /// Listen address, overrides `server.bind_addr`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch forecasts from a running forecast API.
    Forecasts {
        /// API root, overrides `forecast_api.base_url`.
        #[arg(long)]
        base_url: Option<String>,

        /// Print raw JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Fetch a random joke. Ctrl-C cancels.
    Joke {
        /// Simulated latency in milliseconds, overrides `jokes.delay_ms`.
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Insert forecasts from a JSON file into the database.
    Seed {
        /// JSON array of `{"date", "temperatureC", "summary"}` objects.
        #[arg(long)]
        file: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load_validated(self.config.as_deref())?;

        match self.command {
            Command::Serve { bind } => commands::serve(&config, bind).await,
            Command::Forecasts { base_url, json } => {
                commands::forecasts(&config, base_url, json).await
            }
            Command::Joke { delay_ms } => commands::joke(&config, delay_ms).await,
            Command::Seed { file } => commands::seed(&config, &file).await,
        }
    }
}
