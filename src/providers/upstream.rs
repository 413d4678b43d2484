use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::UpstreamProviderConfig;
use crate::core::currency::{self, CurrencyCode, RateProvider, RateQuote, RateTable};

/// Live rate provider speaking the Frankfurter `latest` API.
pub struct UpstreamRateProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl UpstreamRateProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxview/1.0")
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(UpstreamRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Builds a provider from config; `None` when no credential is configured.
    pub fn from_config(config: &UpstreamProviderConfig) -> Result<Option<Self>> {
        match config.credential() {
            Some(key) => Ok(Some(Self::new(
                &config.base_url,
                key,
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    rates: HashMap<String, f64>,
}

/// Keeps only supported currencies and pins the base to exactly 1.0.
fn filter_supported(base: &str, rates: HashMap<String, f64>) -> RateTable {
    let mut table: RateTable = rates
        .into_iter()
        .filter(|(code, rate)| currency::is_supported(code) && rate.is_finite() && *rate > 0.0)
        .collect();
    table.insert(base.to_string(), 1.0);
    table
}

#[async_trait]
impl RateProvider for UpstreamRateProvider {
    #[instrument(name = "UpstreamRateFetch", skip(self), fields(base = %base))]
    async fn latest(&self, base: &CurrencyCode) -> Result<RateQuote> {
        let url = format!("{}/latest?from={}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        let quoted_base: CurrencyCode = data
            .base
            .parse()
            .map_err(|e| anyhow!("Upstream returned {} for base: {}", e, base))?;
        let rates = filter_supported(quoted_base.as_str(), data.rates);
        debug!(count = rates.len(), "Received upstream rates");

        Ok(RateQuote {
            base: quoted_base.to_string(),
            rates,
        })
    }
}
