//! Wire types shared by the rate service and its clients

use super::currency::RateTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FALLBACK_MESSAGE: &str = "Using fallback data";

/// Month labels of the fixed six point trend window.
pub const TREND_LABELS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    pub base: String,
    pub rates: RateTable,
    pub last_updated: DateTime<Utc>,
    /// Present only when the fallback table was served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RatesResponse {
    pub fn is_fallback(&self) -> bool {
        self.message.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub base: String,
    pub labels: Vec<String>,
    pub rates: Vec<f64>,
}

impl TrendSeries {
    /// Placeholder series shown when trend data cannot be loaded.
    pub fn sample(base: &str) -> Self {
        TrendSeries {
            base: base.to_string(),
            labels: TREND_LABELS.iter().map(|l| l.to_string()).collect(),
            rates: vec![1.0, 0.98, 0.96, 0.97, 0.99, 1.01],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub currencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
