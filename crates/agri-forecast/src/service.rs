use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ForecastResult;
use crate::model::WeatherForecast;
use crate::store::ForecastStore;

/// Business-facing forecast operations.
#[async_trait]
pub trait ForecastService: Send + Sync {
    /// All known forecasts, in store order. Read-only.
    async fn get_forecasts(&self) -> ForecastResult<Vec<WeatherForecast>>;
}

/// `ForecastService` backed directly by a `ForecastStore`.
#[derive(Clone)]
pub struct StoreForecastService {
    store: Arc<dyn ForecastStore>,
}

impl StoreForecastService {
    pub fn new(store: Arc<dyn ForecastStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ForecastService for StoreForecastService {
    async fn get_forecasts(&self) -> ForecastResult<Vec<WeatherForecast>> {
        self.store.list().await
    }
}
