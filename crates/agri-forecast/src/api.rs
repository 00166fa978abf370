//! HTTP REST API for forecasts
//!
//! Exposes the forecast service as JSON. No authentication is applied.

use std::future::Future;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::model::WeatherForecast;
use crate::service::ForecastService;

pub const FORECASTS_ROUTE: &str = "/api/weatherforecasts";

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub forecasts: Arc<dyn ForecastService>,
}

/// GET /api/weatherforecasts - List all forecasts
async fn list_forecasts(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeatherForecast>>, StatusCode> {
    match state.forecasts.get_forecasts().await {
        Ok(forecasts) => Ok(Json(forecasts)),
        Err(e) => {
            tracing::error!("Failed to load forecasts: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(forecasts: Arc<dyn ForecastService>) -> Router {
    let state = AppState { forecasts };

    Router::new()
        .route("/health", get(health_check))
        .route(FORECASTS_ROUTE, get(list_forecasts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    forecasts: Arc<dyn ForecastService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(forecasts);
    tracing::info!("Forecast API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `bind_addr` and run the HTTP server
pub async fn run_http_server<F>(
    forecasts: Arc<dyn ForecastService>,
    bind_addr: &str,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind_addr).await?;
    serve(listener, forecasts, shutdown).await
}
