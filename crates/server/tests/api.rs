// ABOUTME: Integration tests for the HTTP service router.
// ABOUTME: Drives requests through the router with oneshot and stubs upstream shops with httpmock.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use closet_extract::{resource::redirect_policy, Client};
use closet_server::{build_app, AppState, Config};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(allow_private_networks: bool) -> Router {
    let config = Config {
        allow_private_networks,
        fetch_timeout: Duration::from_millis(300),
        ..Config::default()
    };
    build_app(AppState::new(config.build_client()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn extract_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(false), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let request = Request::get("/api/nope").body(Body::empty()).unwrap();
    let (status, body) = send(app(false), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Route not found: GET /api/nope"}));
}

#[tokio::test]
async fn missing_url_is_bad_request() {
    for payload in ["{}", r#"{"url":""}"#, r#"{"url":null}"#, "not json"] {
        let (status, body) = send(app(false), extract_request(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body, json!({"error": "URL is required"}));
    }
}

#[tokio::test]
async fn malformed_url_is_bad_request() {
    let (status, body) = send(app(false), extract_request(r#"{"url":"shop dot test"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid URL format"}));
}

#[tokio::test]
async fn extracts_product_from_upstream() {
    let upstream = MockServer::start();
    let mock = upstream.mock(|when, then| {
        when.method(GET).path("/products/hoodie");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(
                r#"<html><head>
                <meta property="og:image" content="/img/shirt.jpg">
                <script type="application/ld+json">{"@type":"Product","name":"Blue Hoodie","offers":{"price":"49.99"}}</script>
                </head><body><p>size: XL</p></body></html>"#,
            );
    });

    let url = upstream.url("/products/hoodie");
    let payload = json!({ "url": url }).to_string();
    let (status, body) = send(app(true), extract_request(&payload)).await;
    mock.assert();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Blue Hoodie");
    assert_eq!(body["price"], 49.99);
    assert_eq!(body["size"], "XL");
    assert_eq!(body["category"], "tops");
    assert_eq!(body["images"], json!([upstream.url("/img/shirt.jpg")]));
    assert_eq!(body["metadata"]["url"], url);
    assert_eq!(body["metadata"]["hasJsonLd"], true);
    assert_eq!(body["metadata"]["imageCount"], 1);
}

#[tokio::test]
async fn upstream_error_status_passes_through() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    let payload = json!({ "url": upstream.url("/gone") }).to_string();
    let (status, body) = send(app(true), extract_request(&payload)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Failed to fetch URL: Not Found"}));
}

#[tokio::test]
async fn slow_upstream_is_request_timeout() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200)
            .delay(Duration::from_secs(2))
            .body("<html></html>");
    });

    let payload = json!({ "url": upstream.url("/slow") }).to_string();
    let (status, body) = send(app(true), extract_request(&payload)).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body,
        json!({"error": "Request timeout - URL took too long to respond"})
    );
}

#[tokio::test]
async fn private_network_target_is_forbidden() {
    let upstream = MockServer::start();

    let payload = json!({ "url": upstream.url("/p/1") }).to_string();
    let (status, body) = send(app(false), extract_request(&payload)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn redirect_to_private_network_is_forbidden() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/r");
        then.status(302).header("Location", "http://10.0.0.1/x");
    });

    // Reach the local stub directly but police every redirect hop.
    let http_client = reqwest::Client::builder()
        .redirect(redirect_policy(false))
        .build()
        .unwrap();
    let client = Client::builder()
        .allow_private_networks(true)
        .http_client(http_client)
        .build();
    let app = build_app(AppState::new(client));

    let payload = json!({ "url": upstream.url("/r") }).to_string();
    let (status, body) = send(app, extract_request(&payload)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/extract")
        .header(header::ORIGIN, "http://localhost:8081")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app(false).oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
