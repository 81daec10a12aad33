//! Tests for the API client failure policy and URL building

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use super::test_server::CannedServer;
use super::{ApiClient, ApiError, Endpoint, check_response};
use crate::filters::{FilterGroup, FilterSelection};
use crate::query::AnalyticsQuery;

const PATH: &str = "/analytics/portfolio/summary";

#[test]
fn test_success_body_returned_unchanged() {
    let body = r#"{"labels":["01/2024"],"total":[3]}"#;
    let value = check_response(PATH, StatusCode::OK, body).unwrap();
    assert_eq!(value, json!({"labels": ["01/2024"], "total": [3]}));
}

#[test]
fn test_embedded_error_with_success_status() {
    let body = r#"{"code":"E1","message":"bad filter"}"#;
    let err = check_response(PATH, StatusCode::OK, body).unwrap_err();
    assert!(matches!(err, ApiError::Embedded { ref code, .. } if code == "E1"));
    assert_eq!(err.message(), "bad filter");
}

#[test]
fn test_code_without_message_is_not_an_error_on_success() {
    let body = r#"{"code":"OK","rows":[]}"#;
    assert!(check_response(PATH, StatusCode::OK, body).is_ok());

    let body = r#"{"code":"E1","message":""}"#;
    assert!(check_response(PATH, StatusCode::OK, body).is_ok());
}

#[test]
fn test_failure_status_prefers_message() {
    let body = r#"{"code":"E_FILTER","message":"invalid tramo"}"#;
    let err = check_response(PATH, StatusCode::BAD_REQUEST, body).unwrap_err();
    assert_eq!(err.message(), "invalid tramo");
    assert_eq!(err.status(), Some(400));
}

#[test]
fn test_failure_status_falls_back_to_code() {
    let body = r#"{"code":"E_TIMEOUT"}"#;
    let err = check_response(PATH, StatusCode::GATEWAY_TIMEOUT, body).unwrap_err();
    assert_eq!(err.message(), "E_TIMEOUT");
}

#[test]
fn test_failure_status_generic_message() {
    let err = check_response(PATH, StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>")
        .unwrap_err();
    assert_eq!(err.message(), "request failed with status 500");

    let err = check_response(PATH, StatusCode::NOT_FOUND, "").unwrap_err();
    assert_eq!(err.message(), "request failed with status 404");
}

#[test]
fn test_success_with_invalid_json_is_decode_error() {
    let err = check_response(PATH, StatusCode::OK, "not json").unwrap_err();
    assert!(matches!(err, ApiError::Decode { path: PATH, .. }));
}

#[test]
fn test_endpoint_url_with_and_without_query() {
    let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
    let mut sel = FilterSelection::new();

    assert_eq!(
        client.endpoint_url(Endpoint::PortfolioTrend, &AnalyticsQuery::new(&sel)),
        "http://localhost:8000/analytics/portfolio/trend"
    );

    sel.insert(FilterGroup::Segment, "0-30");
    let query = AnalyticsQuery::new(&sel).with_debug(Some("1"));
    assert_eq!(
        client.endpoint_url(Endpoint::AnualesSummary, &query),
        "http://localhost:8000/analytics/anuales/summary?tramo=0-30&debug=1"
    );
}

#[test]
fn test_invalid_base_url_rejected() {
    let err = ApiClient::new("not a url", Duration::from_secs(5)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Over HTTP
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_embedded_error_over_http() {
    let server = CannedServer::start(&[(
        Endpoint::PortfolioSummary.path(),
        200,
        r#"{"code":"E1","message":"bad filter"}"#,
    )])
    .await;
    let sel = FilterSelection::new();

    let err = server
        .client()
        .portfolio_summary(&AnalyticsQuery::new(&sel))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Embedded { ref code, .. } if code == "E1"));
    assert_eq!(err.message(), "bad filter");
}

#[tokio::test]
async fn test_fetch_failure_status_and_success_body_over_http() {
    let server = CannedServer::start(&[
        (Endpoint::AnualesSummary.path(), 200, r#"{"total":[3]}"#),
        (Endpoint::PortfolioTrend.path(), 500, r#"{"code":"DB_DOWN"}"#),
    ])
    .await;
    let client = server.client();
    let mut sel = FilterSelection::new();
    sel.insert(FilterGroup::Category, "A & B");
    let query = AnalyticsQuery::new(&sel);

    let body = client.anuales_summary(&query).await.unwrap();
    assert_eq!(body, json!({"total": [3]}));

    let err = client.portfolio_trend(&query).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), "DB_DOWN");

    assert_eq!(
        server.requests(),
        vec![
            "/analytics/anuales/summary?categoria=A+%26+B",
            "/analytics/portfolio/trend?categoria=A+%26+B",
        ]
    );
}
