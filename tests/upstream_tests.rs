use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use nimbus::clients::openai::OpenAiClient;
use nimbus::clients::openweather::OpenWeatherClient;
use nimbus::config::{CompletionConfig, WeatherConfig};
use nimbus::services::{CompletionError, CompletionProvider, WeatherError, WeatherProvider};
use std::collections::HashMap;

async fn mock_weather(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("q").map(String::as_str) == Some("Garbage") {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    if params.get("appid").map(String::as_str) != Some("good-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "cod": 401, "message": "Invalid API key." })),
        )
            .into_response();
    }
    let city = params.get("q").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "name": city,
            "units": params.get("units"),
            "main": { "temp": 14.2 }
        })),
    )
        .into_response()
}

async fn mock_completion(
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer sk-good");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": { "message": "bad key" } })),
        );
    }

    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    if prompt == "silence" {
        return (StatusCode::OK, Json(serde_json::json!({ "choices": [] })));
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": format!("  re: {prompt}\n") }
            }]
        })),
    )
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/data/2.5/weather", get(mock_weather))
        .route("/v1/chat/completions", post(mock_completion));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn weather_client(base: &str, key: &str) -> OpenWeatherClient {
    let config = WeatherConfig {
        base_url: format!("{base}/data/2.5"),
        api_key: Some(key.to_string()),
        units: "metric".to_string(),
    };
    OpenWeatherClient::from_config(reqwest::Client::new(), &config).unwrap()
}

fn completion_client(base: &str, key: &str) -> OpenAiClient {
    let config = CompletionConfig {
        base_url: format!("{base}/v1"),
        api_key: Some(key.to_string()),
        model: "gpt-3.5-turbo".to_string(),
        max_tokens: 150,
        temperature: 0.5,
    };
    OpenAiClient::from_config(reqwest::Client::new(), &config).unwrap()
}

#[tokio::test]
async fn weather_client_relays_body_and_sends_query() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, "good-key");

    let body = client.current_weather("São Paulo").await.unwrap();
    assert_eq!(body["name"], "São Paulo");
    assert_eq!(body["units"], "metric");
    assert!(body.get("main").is_some());
}

#[tokio::test]
async fn weather_client_surfaces_upstream_status() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, "bad-key");

    let err = client.current_weather("London").await.unwrap_err();
    match err {
        WeatherError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn weather_client_rejects_non_json_body() {
    let base = spawn_upstream().await;
    let client = weather_client(&base, "good-key");

    let err = client.current_weather("Garbage").await.unwrap_err();
    assert!(matches!(err, WeatherError::Malformed(_)));
}

#[tokio::test]
async fn weather_client_reports_unreachable_upstream() {
    // Nothing listens on port 9 locally.
    let client = weather_client("http://127.0.0.1:9", "good-key");

    let err = client.current_weather("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Request(_)));
    assert!(!err.to_string().contains("good-key"));
}

#[tokio::test]
async fn completion_client_returns_first_choice() {
    let base = spawn_upstream().await;
    let client = completion_client(&base, "sk-good");

    let reply = client.complete("hello").await.unwrap();
    assert_eq!(reply.trim(), "re: hello");
}

#[tokio::test]
async fn completion_client_maps_missing_choice() {
    let base = spawn_upstream().await;
    let client = completion_client(&base, "sk-good");

    let err = client.complete("silence").await.unwrap_err();
    assert!(matches!(err, CompletionError::EmptyReply));
}

#[tokio::test]
async fn completion_client_surfaces_auth_failure() {
    let base = spawn_upstream().await;
    let client = completion_client(&base, "sk-wrong");

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, CompletionError::Status { status: 401, .. }));
}
