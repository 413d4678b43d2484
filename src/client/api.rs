use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::core::rates::{HealthResponse, RatesResponse, TrendSeries};

/// The rate service as seen from the client.
#[async_trait]
pub trait RateApi: Send + Sync {
    async fn health(&self) -> Result<HealthResponse>;
    async fn rates(&self, base: &str) -> Result<RatesResponse>;
    async fn history(&self, base: &str) -> Result<TrendSeries>;
}

pub struct HttpRateApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRateApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxview/1.0")
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpRateApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error! status: {}", response.status()));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {endpoint}"))
    }
}

#[async_trait]
impl RateApi for HttpRateApi {
    async fn health(&self) -> Result<HealthResponse> {
        self.get_json("/api/health").await
    }

    async fn rates(&self, base: &str) -> Result<RatesResponse> {
        self.get_json(&format!("/api/rates?base={base}")).await
    }

    async fn history(&self, base: &str) -> Result<TrendSeries> {
        self.get_json(&format!("/api/history?base={base}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RateClient;
    use crate::client::view::RecordingView;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_rates() {
        let mock_server = MockServer::start().await;
        let body = r#"{
            "base": "EUR",
            "rates": {"EUR": 1, "USD": 1.08},
            "lastUpdated": "2024-03-01T10:00:00.000Z"
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/rates"))
            .and(query_param("base", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let api = HttpRateApi::new(&mock_server.uri()).unwrap();
        let rates = api.rates("EUR").await.unwrap();
        assert_eq!(rates.base, "EUR");
        assert_eq!(rates.rates["USD"], 1.08);
        assert!(!rates.is_fallback());
    }

    #[tokio::test]
    async fn test_fetch_health_and_history() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status": "healthy", "ok": true, "currencies": ["USD", "EUR"], "timestamp": "2024-03-01T10:00:00Z"}"#,
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"base": "USD", "labels": ["Jan", "Feb"], "rates": [1.0, 1.02]}"#,
            ))
            .mount(&mock_server)
            .await;

        let api = HttpRateApi::new(&format!("{}/", mock_server.uri())).unwrap();
        let health = api.health().await.unwrap();
        assert_eq!(health.currencies, vec!["USD", "EUR"]);
        let series = api.history("USD").await.unwrap();
        assert_eq!(series.rates, vec![1.0, 1.02]);
    }

    #[tokio::test]
    async fn test_health_without_list_uses_minimal_currencies() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "healthy"}"#))
            .mount(&mock_server)
            .await;

        let api = HttpRateApi::new(&mock_server.uri()).unwrap();
        let mut client = RateClient::new(api, RecordingView::default());
        client.init().await;

        let view = client.view();
        assert_eq!(view.currencies, vec!["USD", "EUR", "GBP"]);
        assert!(
            !view.errors.iter().any(|e| e.starts_with("Initialization failed")),
            "unexpected errors: {:?}",
            view.errors
        );
        assert_eq!(client.state().selected_to(), "EUR");
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rates"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let api = HttpRateApi::new(&mock_server.uri()).unwrap();
        let result = api.rates("USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error! status: 500 Internal Server Error"
        );
    }
}
