use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::currency::{CurrencyCode, RateProvider, RateQuote};
use crate::core::rates::{FALLBACK_MESSAGE, RatesResponse};
use crate::providers::FallbackRates;

/// Rate lookup with a single upstream attempt and a static fallback.
pub struct RateService {
    upstream: Option<Arc<dyn RateProvider>>,
    fallback: FallbackRates,
}

impl RateService {
    /// `upstream` is `None` when no credential is configured.
    pub fn new(upstream: Option<Arc<dyn RateProvider>>) -> Self {
        RateService {
            upstream,
            fallback: FallbackRates::new(),
        }
    }

    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    pub fn is_live(&self) -> bool {
        self.upstream.is_some()
    }

    pub async fn rates_for(&self, base: &CurrencyCode) -> RatesResponse {
        if let Some(upstream) = &self.upstream {
            match upstream.latest(base).await {
                Ok(quote) => return Self::response(quote, None),
                Err(e) => {
                    warn!(error = %e, %base, "Upstream rate fetch failed, serving fallback table")
                }
            }
        } else {
            debug!(%base, "No upstream credential, serving fallback table");
        }

        Self::response(
            self.fallback.quote(base),
            Some(FALLBACK_MESSAGE.to_string()),
        )
    }

    fn response(quote: RateQuote, message: Option<String>) -> RatesResponse {
        RatesResponse {
            base: quote.base,
            rates: quote.rates,
            last_updated: Utc::now(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::RateTable;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(StubProvider {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl RateProvider for StubProvider {
        async fn latest(&self, base: &CurrencyCode) -> Result<RateQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            let mut rates = RateTable::new();
            rates.insert(base.to_string(), 1.0);
            rates.insert("EUR".to_string(), 0.5);
            Ok(RateQuote {
                base: base.to_string(),
                rates,
            })
        }
    }

    #[tokio::test]
    async fn test_fallback_only_mode() {
        let service = RateService::fallback_only();
        assert!(!service.is_live());

        let response = service.rates_for(&CurrencyCode::default()).await;
        assert_eq!(response.base, "USD");
        assert_eq!(response.rates["USD"], 1.0);
        assert_eq!(response.message.as_deref(), Some(FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_live_rates_have_no_message() {
        let stub = StubProvider::new(false);
        let service = RateService::new(Some(stub.clone()));

        let response = service.rates_for(&"GBP".parse().unwrap()).await;
        assert_eq!(response.base, "GBP");
        assert_eq!(response.rates["EUR"], 0.5);
        assert!(response.message.is_none());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_tried_once_then_falls_back() {
        let stub = StubProvider::new(true);
        let service = RateService::new(Some(stub.clone()));

        let response = service.rates_for(&"EUR".parse().unwrap()).await;
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.base, "EUR");
        assert_eq!(response.rates["EUR"], 1.0);
        assert!(response.is_fallback());
    }
}
