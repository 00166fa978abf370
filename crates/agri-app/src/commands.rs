use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use agri_core::{Config, DatabaseSettings, DbEnv};
use agri_forecast::db;
use agri_forecast::{
    run_http_server, ForecastApiClient, ForecastApiClientConfig, ForecastService, ForecastStore,
    NewWeatherForecast, PgForecastStore, StoreForecastService,
};
use agri_jokes::{JokeClient, JokeClientConfig};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

/// Run the forecast API until Ctrl-C or SIGTERM.
///
/// Fails before binding if any DB_* variable is missing or the database
/// cannot be reached.
pub async fn serve(config: &Config, bind: Option<String>) -> Result<()> {
    let store = open_store(config).await?;
    let service: Arc<dyn ForecastService> = Arc::new(StoreForecastService::new(Arc::new(store)));

    let bind_addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
    run_http_server(service, &bind_addr, shutdown_signal())
        .await
        .with_context(|| format!("Forecast API failed on {}", bind_addr))?;

    tracing::info!("Forecast API stopped");
    Ok(())
}

pub async fn forecasts(config: &Config, base_url: Option<String>, json: bool) -> Result<()> {
    let mut client_config = ForecastApiClientConfig::from(&config.forecast_api);
    if base_url.is_some() {
        client_config.base_url = base_url;
    }

    let client = ForecastApiClient::new_with_config(client_config)?;
    let forecasts = client
        .get_forecasts()
        .await
        .with_context(|| format!("Failed to fetch {}", client.forecasts_url()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forecasts)?);
        return Ok(());
    }

    if forecasts.is_empty() {
        println!("No forecasts.");
        return Ok(());
    }

    for f in &forecasts {
        println!(
            "{:>4}  {}  {:>4} °C  {:>4} °F  {}",
            f.id,
            f.date,
            f.temperature_c,
            f.temperature_f(),
            f.summary.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub async fn joke(config: &Config, delay_ms: Option<u64>) -> Result<()> {
    let mut joke_config = JokeClientConfig::from(&config.jokes);
    if let Some(ms) = delay_ms {
        joke_config.delay = Duration::from_millis(ms);
    }
    let client = JokeClient::new(joke_config);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    tracing::info!("Fetching a joke after {:?}", client.delay());
    let result = client.get_random_joke(&cancel).await;
    ctrl_c.abort();

    let joke = result?;
    println!("{}", joke.value);
    println!("  {}", joke.url);
    Ok(())
}

/// Load forecasts from a JSON file and insert them.
///
/// Every record is validated before anything is written.
pub async fn seed(config: &Config, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let forecasts: Vec<NewWeatherForecast> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of forecasts", file.display()))?;

    for (index, forecast) in forecasts.iter().enumerate() {
        forecast
            .validate()
            .with_context(|| format!("Forecast #{} in {}", index + 1, file.display()))?;
    }

    let store = open_store(config).await?;
    let count = forecasts.len();
    for forecast in forecasts {
        let stored = store.insert(forecast).await?;
        tracing::debug!("Inserted forecast {} for {}", stored.id, stored.date);
    }

    tracing::info!("Seeded {} forecasts", count);
    Ok(())
}

/// Resolve DB settings from the environment, verify connectivity and make
/// sure the schema exists.
async fn open_store(config: &Config) -> Result<PgForecastStore> {
    let env = DbEnv::from_env()?;
    let settings = DatabaseSettings::resolve(&config.database, &env)?;

    let pool = db::connect(&settings)?;
    db::verify_connection(&pool, settings.target()).await?;

    let store = PgForecastStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to create forecast schema")?;
    Ok(store)
}

/// Resolves on Ctrl-C or, on unix, SIGTERM. A handler that cannot be
/// installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown requested");
}
