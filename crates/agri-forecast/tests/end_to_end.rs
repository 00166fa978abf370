//! The forecast client talking to the real router over TCP.

use std::sync::Arc;

use agri_forecast::api::serve;
use agri_forecast::{
    ForecastApiClient, ForecastResult, ForecastStore, NewWeatherForecast, StoreForecastService,
    WeatherForecast,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

/// Store that keeps rows in memory and assigns ids like a SERIAL column.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<WeatherForecast>>,
}

#[async_trait]
impl ForecastStore for MemoryStore {
    async fn list(&self) -> ForecastResult<Vec<WeatherForecast>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn insert(&self, forecast: NewWeatherForecast) -> ForecastResult<WeatherForecast> {
        forecast.validate()?;
        let mut rows = self.rows.lock().await;
        let stored = WeatherForecast {
            id: rows.len() as i32 + 1,
            date: forecast.date,
            temperature_c: forecast.temperature_c,
            summary: forecast.summary,
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

async fn start(store: Arc<MemoryStore>) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(StoreForecastService::new(store));
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve(listener, service, async move {
        let _ = rx.await;
    }));
    (format!("http://{}/api", addr), tx)
}

#[tokio::test]
async fn test_client_reads_what_the_store_holds() {
    let store = Arc::new(MemoryStore::default());
    let inputs = [
        (NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 8, Some("Chilly")),
        (NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(), 15, None),
        (NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(), -2, Some("Freezing")),
    ];
    let mut expected = Vec::new();
    for (date, temperature_c, summary) in inputs {
        let stored = store
            .insert(NewWeatherForecast {
                date,
                temperature_c,
                summary: summary.map(str::to_string),
            })
            .await
            .unwrap();
        expected.push(stored);
    }

    let (base_url, _stop) = start(store).await;
    let client = ForecastApiClient::new(&base_url).unwrap();
    let forecasts = client.get_forecasts().await.unwrap();

    assert_eq!(forecasts, expected);
}

#[tokio::test]
async fn test_client_reads_empty_store() {
    let (base_url, _stop) = start(Arc::new(MemoryStore::default())).await;
    let client = ForecastApiClient::new(&base_url).unwrap();

    assert!(client.get_forecasts().await.unwrap().is_empty());
}
