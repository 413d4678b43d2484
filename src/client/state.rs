use chrono::{DateTime, Utc};

use super::error::ClientError;
use crate::core::currency::{CurrencyCode, DEFAULT_BASE, RateTable};
use crate::core::rates::{RatesResponse, TrendSeries};

/// Used when the server cannot tell us which currencies it supports.
pub const FALLBACK_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "AUD", "CAD"];
/// Used when the server answers but lists no currencies.
pub const MINIMAL_CURRENCIES: &[&str] = &["USD", "EUR", "GBP"];

const DEFAULT_TO: &str = "EUR";

/// The client's last known rate table and the base it is relative to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatesSnapshot {
    pub base: String,
    pub rates: RateTable,
    pub last_updated: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl From<RatesResponse> for RatesSnapshot {
    fn from(response: RatesResponse) -> Self {
        RatesSnapshot {
            base: response.base,
            rates: response.rates,
            last_updated: Some(response.last_updated),
            message: response.message,
        }
    }
}

/// All mutable client state. Fields change only through the methods below.
#[derive(Debug, Clone)]
pub struct ClientState {
    currencies: Vec<String>,
    current_base: String,
    current_rates: RatesSnapshot,
    trend: Option<TrendSeries>,
    selected_from: String,
    selected_to: String,
    amount: String,
    loading: bool,
}

impl Default for ClientState {
    fn default() -> Self {
        ClientState {
            currencies: Vec::new(),
            current_base: DEFAULT_BASE.to_string(),
            current_rates: RatesSnapshot::default(),
            trend: None,
            selected_from: String::new(),
            selected_to: String::new(),
            amount: String::new(),
            loading: false,
        }
    }
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn current_base(&self) -> &str {
        &self.current_base
    }

    pub fn rates(&self) -> &RatesSnapshot {
        &self.current_rates
    }

    pub fn trend(&self) -> Option<&TrendSeries> {
        self.trend.as_ref()
    }

    pub fn selected_from(&self) -> &str {
        &self.selected_from
    }

    pub fn selected_to(&self) -> &str {
        &self.selected_to
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the currency list and resets the selections to their defaults.
    pub fn set_currencies(&mut self, currencies: Vec<String>) {
        self.currencies = currencies;
        let pick = |preferred: &str, index: usize| -> String {
            if self.currencies.iter().any(|c| c == preferred) {
                preferred.to_string()
            } else {
                self.currencies
                    .get(index)
                    .or_else(|| self.currencies.first())
                    .cloned()
                    .unwrap_or_default()
            }
        };
        let from = pick(DEFAULT_BASE, 0);
        let to = pick(DEFAULT_TO, 1);
        self.selected_from = from.clone();
        self.selected_to = to;
        self.current_base = if from.is_empty() {
            DEFAULT_BASE.to_string()
        } else {
            from
        };
    }

    /// Normalizes `code` and checks it against the currency list, when one is known.
    pub fn resolve(&self, code: &str) -> Result<String, ClientError> {
        let parsed: CurrencyCode = code
            .parse()
            .map_err(|_| ClientError::UnknownCurrency(code.to_string()))?;
        if self.currencies.is_empty() || self.currencies.iter().any(|c| c == parsed.as_str()) {
            Ok(parsed.to_string())
        } else {
            Err(ClientError::UnknownCurrency(parsed.to_string()))
        }
    }

    pub fn select_from(&mut self, code: &str) -> Result<(), ClientError> {
        self.selected_from = self.resolve(code)?;
        Ok(())
    }

    pub fn select_to(&mut self, code: &str) -> Result<(), ClientError> {
        self.selected_to = self.resolve(code)?;
        Ok(())
    }

    pub fn select_base(&mut self, code: &str) -> Result<(), ClientError> {
        self.current_base = self.resolve(code)?;
        Ok(())
    }

    /// Stores the raw input; it is validated when a conversion runs.
    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.trim().to_string();
    }

    pub(crate) fn store_rates(&mut self, snapshot: RatesSnapshot) {
        self.current_rates = snapshot;
    }

    pub(crate) fn store_trend(&mut self, series: TrendSeries) {
        self.trend = Some(series);
    }

    /// Marks the start of a user action; rejects overlapping ones.
    pub(crate) fn begin(&mut self) -> Result<(), ClientError> {
        if self.loading {
            return Err(ClientError::Busy);
        }
        self.loading = true;
        Ok(())
    }

    pub(crate) fn finish(&mut self) {
        self.loading = false;
    }
}
