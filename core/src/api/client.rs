use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::ApiError;
use crate::filters::FilterSelection;
use crate::query::{AnalyticsQuery, build_query};
use cartera_types::{AppConfig, Endpoint};

const USER_AGENT: &str = concat!("cartera/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the analytics endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Self::with_client(client, base_url)
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL: base + fixed path + optional `?query`
    pub fn endpoint_url(&self, endpoint: Endpoint, query: &AnalyticsQuery<'_>) -> String {
        let qs = build_query(query);
        if qs.is_empty() {
            format!("{}{}", self.base_url, endpoint.path())
        } else {
            format!("{}{}?{}", self.base_url, endpoint.path(), qs)
        }
    }

    /// GET an endpoint and return its JSON body, applying the failure policy
    /// of [`check_response`].
    pub async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &AnalyticsQuery<'_>,
    ) -> Result<Value, ApiError> {
        let path = endpoint.path();
        let url = self.endpoint_url(endpoint, query);
        debug!(%url, "fetching analytics");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport { path, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { path, source })?;

        check_response(path, status, &body)
    }

    pub async fn portfolio_summary(&self, query: &AnalyticsQuery<'_>) -> Result<Value, ApiError> {
        self.fetch(Endpoint::PortfolioSummary, query).await
    }

    pub async fn portfolio_trend(&self, query: &AnalyticsQuery<'_>) -> Result<Value, ApiError> {
        self.fetch(Endpoint::PortfolioTrend, query).await
    }

    pub async fn performance_by_management_month(
        &self,
        query: &AnalyticsQuery<'_>,
    ) -> Result<Value, ApiError> {
        self.fetch(Endpoint::PerformanceByManagementMonth, query)
            .await
    }

    pub async fn movement_moroso_trend(
        &self,
        query: &AnalyticsQuery<'_>,
    ) -> Result<Value, ApiError> {
        self.fetch(Endpoint::MovementMorosoTrend, query).await
    }

    pub async fn anuales_summary(&self, query: &AnalyticsQuery<'_>) -> Result<Value, ApiError> {
        self.fetch(Endpoint::AnualesSummary, query).await
    }

    /// Convenience for callers holding only a selection
    pub async fn fetch_filtered(
        &self,
        endpoint: Endpoint,
        filters: &FilterSelection,
        debug: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.fetch(endpoint, &AnalyticsQuery::new(filters).with_debug(debug))
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Interpretation
// ─────────────────────────────────────────────────────────────────────────────

/// Apply the failure policy to a raw response.
///
/// - Non-success status: fail with the body's `message`, else its `code`,
///   else a generic message naming the status.
/// - Success status whose body has both a truthy `code` and `message`: fail
///   with that message.
/// - Otherwise return the parsed body unchanged.
pub fn check_response(
    path: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<Value, ApiError> {
    if !status.is_success() {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let message = field_text(&parsed, "message")
            .or_else(|| field_text(&parsed, "code"))
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        warn!(path, status = status.as_u16(), %message, "analytics request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: Value =
        serde_json::from_str(body).map_err(|source| ApiError::Decode { path, source })?;

    if is_truthy(parsed.get("code")) && is_truthy(parsed.get("message")) {
        let code = field_text(&parsed, "code").unwrap_or_default();
        let message = field_text(&parsed, "message").unwrap_or_default();
        warn!(path, %code, %message, "analytics error payload with success status");
        return Err(ApiError::Embedded { code, message });
    }

    Ok(parsed)
}

/// JavaScript-style truthiness of an optional JSON value
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text of a field when it is truthy
fn field_text(body: &Value, key: &str) -> Option<String> {
    let value = body.get(key);
    if !is_truthy(value) {
        return None;
    }
    match value? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
