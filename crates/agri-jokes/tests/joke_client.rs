//! Integration tests for JokeClient using wiremock.

use std::time::{Duration, Instant};

use agri_jokes::{JokeClient, JokeClientConfig, JokeError};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_joke() -> serde_json::Value {
    serde_json::json!({
        "categories": [],
        "created_at": "2020-01-05 13:42:19.324003",
        "icon_url": "https://api.chucknorris.io/img/avatar/chuck-norris.png",
        "id": "bXyZ42",
        "updated_at": "2020-01-05 13:42:19.324003",
        "url": "https://api.chucknorris.io/jokes/bXyZ42",
        "value": "Chuck Norris counted to infinity. Twice."
    })
}

fn client(base_url: &str, delay: Duration) -> JokeClient {
    JokeClient::new(JokeClientConfig {
        base_url: base_url.to_string(),
        delay,
    })
}

#[tokio::test]
async fn test_random_joke_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_joke()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), Duration::from_millis(10));
    let joke = client
        .get_random_joke(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(joke.id, "bXyZ42");
    assert_eq!(
        joke.icon_url,
        "https://api.chucknorris.io/img/avatar/chuck-norris.png"
    );
    assert_eq!(joke.url, "https://api.chucknorris.io/jokes/bXyZ42");
    assert_eq!(joke.value, "Chuck Norris counted to infinity. Twice.");
}

#[tokio::test]
async fn test_delay_is_applied_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_joke()))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), Duration::from_millis(200));
    let started = Instant::now();
    client
        .get_random_joke(&CancellationToken::new())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_cancelled_before_call_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_joke()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let client = client(&mock_server.uri(), Duration::from_millis(10));
    let err = client.get_random_joke(&cancel).await.unwrap_err();

    assert_eq!(err, JokeError::Cancelled);
    assert_eq!(err.to_string(), "The operation was canceled.");
}

#[tokio::test]
async fn test_cancelled_during_delay_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_joke()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let client = client(&mock_server.uri(), Duration::from_secs(60));
    let started = Instant::now();
    let err = client.get_random_joke(&cancel).await.unwrap_err();

    assert_eq!(err.to_string(), "The operation was canceled.");
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_cancelled_during_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(test_joke())
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let client = client(&mock_server.uri(), Duration::ZERO);
    let err = client.get_random_joke(&cancel).await.unwrap_err();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    // Port 1 is reserved and nothing listens on it.
    let client = client("http://127.0.0.1:1", Duration::ZERO);
    let err = client
        .get_random_joke(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, JokeError::Request(_)));
    assert!(err.to_string().starts_with("Request error: "), "{err}");
}

#[tokio::test]
async fn test_server_error_is_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), Duration::ZERO);
    let err = client
        .get_random_joke(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Request error: "), "{err}");
    assert!(err.to_string().contains("503"), "{err}");
}

#[tokio::test]
async fn test_malformed_body_is_unexpected_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jokes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), Duration::ZERO);
    let err = client
        .get_random_joke(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, JokeError::Unexpected(_)));
    assert!(
        err.to_string().starts_with("An unexpected error occurred: "),
        "{err}"
    );
}
