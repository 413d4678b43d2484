//! Static rate table used when the live provider is unavailable or unconfigured.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::core::currency::{
    self, CurrencyCode, DEFAULT_BASE, RateProvider, RateQuote, RateTable, SUPPORTED_CURRENCIES,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackRates;

impl FallbackRates {
    pub fn new() -> Self {
        FallbackRates
    }

    /// Derives every supported rate relative to `base` from the USD table.
    ///
    /// Unsupported bases yield the USD table, so the returned quote names the
    /// base it is actually relative to.
    pub fn quote(&self, base: &CurrencyCode) -> RateQuote {
        let (base, base_usd) = match currency::usd_rate(base.as_str()) {
            Some(rate) => (base.as_str(), rate),
            None => {
                debug!(%base, "Unsupported base, serving USD fallback table");
                (DEFAULT_BASE, 1.0)
            }
        };

        let rates: RateTable = SUPPORTED_CURRENCIES
            .iter()
            .map(|(code, usd)| {
                let rate = if *code == base { 1.0 } else { usd / base_usd };
                (code.to_string(), rate)
            })
            .collect();

        RateQuote {
            base: base.to_string(),
            rates,
        }
    }
}

#[async_trait]
impl RateProvider for FallbackRates {
    async fn latest(&self, base: &CurrencyCode) -> Result<RateQuote> {
        Ok(self.quote(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_base_rate_is_exactly_one_for_every_currency() {
        let fallback = FallbackRates::new();
        for (base, _) in SUPPORTED_CURRENCIES {
            let quote = fallback.quote(&code(base));
            assert_eq!(quote.base, *base);
            assert_eq!(quote.rates[*base], 1.0, "rate({base}, {base})");
            assert_eq!(quote.rates.len(), SUPPORTED_CURRENCIES.len());
        }
    }

    #[test]
    fn test_cross_rates_derive_from_usd() {
        let fallback = FallbackRates::new();
        for (base, base_usd) in SUPPORTED_CURRENCIES {
            let quote = fallback.quote(&code(base));
            for (other, other_usd) in SUPPORTED_CURRENCIES {
                let expected = other_usd / base_usd;
                let actual = quote.rates[*other];
                assert!(
                    (actual - expected).abs() <= expected.abs() * 1e-12,
                    "rate({other}, {base}) = {actual}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn test_eur_table() {
        let quote = FallbackRates::new().quote(&code("EUR"));
        assert_eq!(quote.base, "EUR");
        assert!((quote.rates["USD"] - 1.0 / 0.93).abs() < 1e-12);
        assert!((quote.rates["JPY"] - 151.34 / 0.93).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_base_uses_usd_table() {
        let quote = FallbackRates::new().quote(&code("XYZ"));
        assert_eq!(quote.base, "USD");
        assert_eq!(quote.rates["USD"], 1.0);
        assert_eq!(quote.rates["EUR"], 0.93);
    }

    #[tokio::test]
    async fn test_provider_never_fails() {
        let quote = FallbackRates::new().latest(&code("GBP")).await.unwrap();
        assert_eq!(quote.rates["GBP"], 1.0);
    }
}
