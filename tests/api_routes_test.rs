//! HTTP surface with in-process fake providers.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{LlmReply, NewsReply, QuoteReply, TestApp};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_message() {
    let (status, body) = send(TestApp::default().router().await, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn test_historical_event_ok() {
    let (status, body) = send(
        TestApp::default().router().await,
        get("/api/historical-event?query=black%20monday"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"], "Black Monday");
    assert_eq!(body["date"], "1987-10-19");
}

#[tokio::test]
async fn test_historical_event_requires_query() {
    let (status, body) = send(TestApp::default().router().await, get("/api/historical-event")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query parameter is required");
}

#[tokio::test]
async fn test_historical_event_missing_key() {
    let app = TestApp { llm: LlmReply::MissingKey, ..Default::default() };
    let (status, body) = send(app.router().await, get("/api/historical-event?query=crash")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "OpenAI API key not configured");
}

#[tokio::test]
async fn test_historical_event_unparseable_completion() {
    let app = TestApp { llm: LlmReply::Text("I am not JSON".into()), ..Default::default() };
    let (status, body) = send(app.router().await, get("/api/historical-event?query=crash")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to parse upstream provider data");
}

#[tokio::test]
async fn test_historical_event_provider_down() {
    let app = TestApp { llm: LlmReply::Down, ..Default::default() };
    let (status, _) = send(app.router().await, get("/api/historical-event?query=crash")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_sp500_data_windows() {
    let (status, body) = send(
        TestApp::default().router().await,
        get("/api/sp500-data?startDate=1987-10-19"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "SPY");
    assert_eq!(body["startDate"], "1987-10-19");
    assert_eq!(body["data"]["oneWeek"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["oneMonthCount"], 2);
    assert_eq!(body["metadata"]["threeMonthsCount"], 3);
    assert_eq!(body["performance"]["oneWeek"]["startClose"], 224.84);
}

#[tokio::test]
async fn test_sp500_data_pads_month_precision() {
    let (status, body) = send(
        TestApp::default().router().await,
        get("/api/sp500-data?startDate=1987-10"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startDate"], "1987-10-01");
}

#[tokio::test]
async fn test_sp500_data_bad_dates() {
    for uri in ["/api/sp500-data", "/api/sp500-data?startDate=", "/api/sp500-data?startDate=yesterday"] {
        let (status, body) = send(TestApp::default().router().await, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_sp500_data_start_date_past_calendar_range() {
    let (status, body) = send(
        TestApp::default().router().await,
        get("/api/sp500-data?startDate=%2B262142-12-31"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("startDate"));
}

#[tokio::test]
async fn test_sp500_data_rate_limited() {
    let app = TestApp { quotes: QuoteReply::RateLimited, ..Default::default() };
    let response = app
        .router()
        .await
        .oneshot(get("/api/sp500-data?startDate=2020-01-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get("Retry-After").unwrap(), "60");
}

#[tokio::test]
async fn test_sp500_data_invalid_symbol() {
    let app = TestApp { quotes: QuoteReply::InvalidSymbol, ..Default::default() };
    let (status, body) = send(app.router().await, get("/api/sp500-data?startDate=2020-01-01")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid symbol or API error");
}

#[tokio::test]
async fn test_news_articles_ok() {
    let (status, body) = send(
        TestApp::default().router().await,
        get("/api/news-articles?query=Black%20Monday"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "Black Monday");
    assert_eq!(body["articles"][0]["title"], "Remembering Black Monday");
    assert_eq!(body["articles"][0]["urlToImage"], Value::Null);
}

#[tokio::test]
async fn test_news_articles_none_found() {
    let app = TestApp { news: NewsReply::Empty, ..Default::default() };
    let (status, body) = send(app.router().await, get("/api/news-articles?query=nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No articles found");
}

#[tokio::test]
async fn test_event_analysis_chains_lookups() {
    let (status, body) = send(
        TestApp::default().router().await,
        get("/api/event-analysis?query=black%20monday"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["event"], "Black Monday");
    assert_eq!(body["articles"].as_array().unwrap().len(), 1);
    assert_eq!(body["chart"]["metadata"]["oneWeekCount"], 2);
    assert!(body.get("chartError").is_none());
}

#[tokio::test]
async fn test_event_analysis_keeps_event_when_side_lookups_fail() {
    let app = TestApp {
        quotes: QuoteReply::RateLimited,
        news: NewsReply::Empty,
        ..Default::default()
    };
    let (status, body) = send(app.router().await, get("/api/event-analysis?query=black%20monday")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["articles"], json!([]));
    assert!(body.get("newsError").is_none());
    assert_eq!(body["chart"], Value::Null);
    assert!(body["chartError"].as_str().unwrap().contains("frequency limit"));
}

#[tokio::test]
async fn test_event_analysis_free_form_date_skips_chart() {
    let event = common::BLACK_MONDAY.replace("1987-10-19", "Autumn 1987");
    let app = TestApp { llm: LlmReply::Text(event), ..Default::default() };
    let (status, body) = send(app.router().await, get("/api/event-analysis?query=black%20monday")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chart"], Value::Null);
    assert!(body["chartError"].as_str().unwrap().contains("Autumn 1987"));
}

#[tokio::test]
async fn test_register_duplicate_and_login() {
    let app = TestApp::default().router().await;

    let (status, body) = send(
        app.clone(),
        post_json("/api/auth/register", json!({ "username": "alice", "email": "a@x.com", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some());

    let (status, body) = send(
        app.clone(),
        post_json("/api/auth/register", json!({ "username": "alice", "email": "b@x.com", "password": "pw2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = send(
        app.clone(),
        post_json("/api/auth/login", json!({ "username": "alice", "password": "pw2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        app.clone(),
        post_json("/api/auth/login", json!({ "username": "alice", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_me_requires_token() {
    let (status, body) = send(TestApp::default().router().await, get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = send(TestApp::default().router().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
