//! Currency codes, rate tables and the rate provider abstraction

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Mapping from currency code to a rate relative to an implicit base.
pub type RateTable = BTreeMap<String, f64>;

pub const DEFAULT_BASE: &str = "USD";

/// Supported currencies and their USD-relative fallback rates, in display order.
pub const SUPPORTED_CURRENCIES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.93),
    ("GBP", 0.79),
    ("JPY", 151.34),
    ("AUD", 1.52),
    ("CAD", 1.36),
    ("CHF", 0.91),
    ("CNY", 7.23),
    ("HKD", 7.83),
    ("SGD", 1.35),
    ("INR", 83.12),
    ("MXN", 16.89),
    ("BRL", 4.92),
    ("RUB", 91.45),
    ("ZAR", 18.67),
    ("KRW", 1332.56),
    ("TRY", 32.01),
    ("SEK", 10.68),
    ("NOK", 10.62),
    ("DKK", 6.93),
    ("NZD", 1.66),
    ("THB", 35.89),
    ("MYR", 4.72),
    ("PHP", 56.23),
    ("IDR", 15678.45),
    ("SAR", 3.75),
    ("AED", 3.67),
    ("PLN", 4.12),
    ("HUF", 358.23),
    ("CZK", 23.12),
    ("ILS", 3.67),
    ("CLP", 876.45),
    ("ARS", 350.12),
    ("COP", 3901.23),
    ("PEN", 3.78),
    ("VND", 24345.67),
    ("PKR", 278.34),
    ("BGN", 1.83),
    ("RON", 4.56),
    ("HRK", 7.01),
    ("ISK", 137.89),
    ("UAH", 36.78),
    ("QAR", 3.64),
    ("KWD", 0.31),
    ("EGP", 30.90),
    ("NGN", 770.12),
    ("BDT", 109.45),
    ("KES", 150.67),
    ("MAD", 10.12),
    ("TWD", 31.45),
];

/// Codes of all supported currencies, in display order.
pub fn supported_codes() -> Vec<String> {
    SUPPORTED_CURRENCIES
        .iter()
        .map(|(code, _)| code.to_string())
        .collect()
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CURRENCIES.iter().any(|(c, _)| *c == code)
}

/// USD-relative fallback rate for a supported currency.
pub fn usd_rate(code: &str) -> Option<f64> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, rate)| *rate)
}

/// A three letter ISO-4217 style currency code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CurrencyCode(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid currency code: {0:?}")]
pub struct InvalidCurrencyCode(pub String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses an optional query value, treating a missing or blank value as USD.
    pub fn or_default(value: Option<&str>) -> Result<Self, InvalidCurrencyCode> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(code) => code.parse(),
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode(DEFAULT_BASE.to_string())
    }
}

impl FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
        } else {
            Err(InvalidCurrencyCode(s.to_string()))
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rates returned by a provider, relative to `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub base: String,
    pub rates: RateTable,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest(&self, base: &CurrencyCode) -> Result<RateQuote>;
}
