//! Integration tests for ForecastApiClient using wiremock.

use agri_forecast::{ForecastApiClient, ForecastError};
use chrono::NaiveDate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_forecast(id: i32, date: &str, temperature_c: i32, summary: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "date": date,
        "temperatureC": temperature_c,
        "summary": summary
    })
}

#[tokio::test]
async fn test_get_forecasts_returns_records_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weatherforecasts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            test_forecast(9, "2024-08-02", 27, Some("Warm")),
            test_forecast(2, "2024-08-01", 14, None),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ForecastApiClient::new(&format!("{}/api", mock_server.uri())).unwrap();
    let forecasts = client.get_forecasts().await.unwrap();

    assert_eq!(forecasts.len(), 2);
    assert_eq!(forecasts[0].id, 9);
    assert_eq!(forecasts[0].date, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
    assert_eq!(forecasts[0].temperature_c, 27);
    assert_eq!(forecasts[0].summary.as_deref(), Some("Warm"));
    assert_eq!(forecasts[1].id, 2);
    assert_eq!(forecasts[1].summary, None);
}

#[tokio::test]
async fn test_get_forecasts_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weatherforecasts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = ForecastApiClient::new(&format!("{}/api", mock_server.uri())).unwrap();
    let forecasts = client.get_forecasts().await.unwrap();

    assert!(forecasts.is_empty());
}

#[tokio::test]
async fn test_get_forecasts_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weatherforecasts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = ForecastApiClient::new(&format!("{}/api", mock_server.uri())).unwrap();
    let result = client.get_forecasts().await;

    assert!(
        matches!(result, Err(ForecastError::Api { status: 500, .. })),
        "expected 500 API error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_get_forecasts_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weatherforecasts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"forecasts\": 3}"))
        .mount(&mock_server)
        .await;

    let client = ForecastApiClient::new(&format!("{}/api", mock_server.uri())).unwrap();
    let result = client.get_forecasts().await;

    assert!(matches!(result, Err(ForecastError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_get_forecasts_connection_refused() {
    // Port 1 is reserved and nothing listens on it.
    let client = ForecastApiClient::new("http://127.0.0.1:1/api").unwrap();
    let result = client.get_forecasts().await;

    assert!(matches!(result, Err(ForecastError::Network(_))));
}
