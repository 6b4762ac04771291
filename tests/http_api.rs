//! Integration tests for the Pitwall REST API
//!
//! Drives the router in-process with stubbed roster sources.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use pitwall::api::{self, AppState};
use pitwall::metrics::Metrics;
use pitwall::model::RawDriver;
use pitwall::search::SearchService;
use pitwall::upstream::RosterSource;
use serde_json::{json, Value};
use tower::ServiceExt as TowerServiceExt;

struct StaticRoster(Option<Vec<RawDriver>>);

#[async_trait]
impl RosterSource for StaticRoster {
    async fn fetch_roster(&self) -> Option<Vec<RawDriver>> {
        self.0.clone()
    }
}

struct PanickingRoster;

#[async_trait]
impl RosterSource for PanickingRoster {
    async fn fetch_roster(&self) -> Option<Vec<RawDriver>> {
        panic!("roster source exploded");
    }
}

fn create_test_app(source: impl RosterSource + 'static) -> Router {
    let metrics = Metrics::new().unwrap();
    let search = SearchService::new(Arc::new(source), metrics.clone());
    api::router(AppState {
        search: Arc::new(search),
        metrics,
    })
}

fn roster() -> Vec<RawDriver> {
    vec![
        json!({
            "driver_number": 1,
            "first_name": "Lewis",
            "last_name": "Hamilton",
            "team_name": "Mercedes",
            "team_colour": "#00D2BE",
            "country_code": "GBR",
            "headshot_url": "https://x/h.jpg"
        }),
        json!({ "driver_number": 81, "first_name": "Oscar", "last_name": "Piastri" }),
    ]
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(StaticRoster(None));
    let (status, body) = get(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_health_does_not_touch_upstream() {
    let app = create_test_app(PanickingRoster);
    let (status, body) = get(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_search_returns_matching_drivers() {
    let app = create_test_app(StaticRoster(Some(roster())));
    let (status, body) = get(app, "/api/drivers/search?name=lewis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "drivers": [{
                "driver_number": 1,
                "first_name": "Lewis",
                "last_name": "Hamilton",
                "team_name": "Mercedes",
                "team_colour": "#00D2BE",
                "country_code": "GBR",
                "headshot_url": "https://x/h.jpg"
            }]
        })
    );
}

#[tokio::test]
async fn test_search_fills_defaults() {
    let app = create_test_app(StaticRoster(Some(roster())));
    let (status, body) = get(app, "/api/drivers/search?name=Oscar%20P").await;

    assert_eq!(status, StatusCode::OK);
    let driver = &body["drivers"][0];
    assert_eq!(driver["driver_number"], 81);
    assert_eq!(driver["team_name"], "");
    assert_eq!(driver["team_colour"], "#000000");
    assert_eq!(driver["headshot_url"], "");
}

#[tokio::test]
async fn test_search_without_matches() {
    let app = create_test_app(StaticRoster(Some(roster())));
    let (status, body) = get(app, "/api/drivers/search?name=nonexistent").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "drivers": [] }));
}

#[tokio::test]
async fn test_upstream_down_looks_like_no_matches() {
    let app = create_test_app(StaticRoster(None));
    let (status, body) = get(app, "/api/drivers/search?name=lewis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "drivers": [] }));
}

#[tokio::test]
async fn test_missing_name_is_rejected() {
    for uri in [
        "/api/drivers/search",
        "/api/drivers/search?name=",
        "/api/drivers/search?other=lewis",
    ] {
        let app = create_test_app(StaticRoster(Some(roster())));
        let (status, body) = get(app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "error": "Name parameter is required" }));
    }
}

#[tokio::test]
async fn test_blank_name_matches_nothing() {
    let app = create_test_app(PanickingRoster);
    let (status, body) = get(app, "/api/drivers/search?name=%20%20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "drivers": [] }));
}

#[tokio::test]
async fn test_repeated_name_uses_first_value() {
    let app = create_test_app(StaticRoster(Some(roster())));
    let (status, body) = get(app, "/api/drivers/search?name=lewis&name=oscar").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drivers"].as_array().unwrap().len(), 1);
    assert_eq!(body["drivers"][0]["first_name"], "Lewis");
}

#[tokio::test]
async fn test_internal_failure_is_500() {
    let app = create_test_app(PanickingRoster);
    let (status, body) = get(app, "/api/drivers/search?name=lewis").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "roster source exploded" }));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = create_test_app(StaticRoster(Some(roster())));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/drivers/search?name=lewis")
                .header(header::ORIGIN, "http://localhost:8080")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_metrics_endpoint_counts_searches() {
    let app = create_test_app(StaticRoster(Some(roster())));
    get(app.clone(), "/api/drivers/search?name=o").await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("pitwall_search_requests_total 1"));
    assert!(text.contains("pitwall_search_matches_total 2"));
}
