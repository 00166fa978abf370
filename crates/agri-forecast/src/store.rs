//! Forecast storage.
//!
//! `ForecastStore` abstracts the relational table holding forecasts;
//! `PgForecastStore` is the PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ForecastResult;
use crate::model::{NewWeatherForecast, WeatherForecast};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS weather_forecasts (
    id SERIAL PRIMARY KEY,
    date DATE NOT NULL,
    temperature_c INTEGER NOT NULL,
    summary VARCHAR(200) NULL
)
"#;

/// Storage for weather forecasts.
#[async_trait]
pub trait ForecastStore: Send + Sync {
    /// List every stored forecast, in store-defined order.
    async fn list(&self) -> ForecastResult<Vec<WeatherForecast>>;

    /// Insert a forecast and return it with its assigned id.
    ///
    /// # Errors
    /// Returns `ForecastError::Validation` if the summary is too long.
    async fn insert(&self, forecast: NewWeatherForecast) -> ForecastResult<WeatherForecast>;
}

/// PostgreSQL-backed forecast store.
///
/// Each call borrows a connection from the pool for its own duration.
#[derive(Debug, Clone)]
pub struct PgForecastStore {
    pool: PgPool,
}

impl PgForecastStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `weather_forecasts` table if it doesn't exist.
    pub async fn ensure_schema(&self) -> ForecastResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        tracing::debug!("weather_forecasts schema ensured");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ForecastStore for PgForecastStore {
    async fn list(&self) -> ForecastResult<Vec<WeatherForecast>> {
        let forecasts = sqlx::query_as::<_, WeatherForecast>(
            "SELECT id, date, temperature_c, summary FROM weather_forecasts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("Loaded {} forecasts", forecasts.len());
        Ok(forecasts)
    }

    async fn insert(&self, forecast: NewWeatherForecast) -> ForecastResult<WeatherForecast> {
        forecast.validate()?;

        let stored = sqlx::query_as::<_, WeatherForecast>(
            "INSERT INTO weather_forecasts (date, temperature_c, summary) \
             VALUES ($1, $2, $3) \
             RETURNING id, date, temperature_c, summary",
        )
        .bind(forecast.date)
        .bind(forecast.temperature_c)
        .bind(forecast.summary)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }
}
