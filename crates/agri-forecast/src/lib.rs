//! Weather forecast service for Agri
//!
//! Store, service, HTTP endpoint and remote client for weather forecasts.

pub mod api;
pub mod client;
pub mod db;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use api::{create_router, run_http_server, FORECASTS_ROUTE};
pub use client::{ForecastApiClient, ForecastApiClientConfig};
pub use error::{ForecastError, ForecastResult};
pub use model::{NewWeatherForecast, WeatherForecast, MAX_SUMMARY_LEN};
pub use service::{ForecastService, StoreForecastService};
pub use store::{ForecastStore, PgForecastStore};
