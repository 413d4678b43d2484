use super::compute::{ConversionOutcome, RateRow};
use crate::core::rates::TrendSeries;

/// Rendering side of the client. Implementations only display what they are given.
pub trait View: Send {
    /// Loading indicator; interactive controls are disabled while it is on.
    fn set_loading(&mut self, loading: bool);
    /// Transient error banner.
    fn show_error(&mut self, message: &str);
    fn show_currencies(&mut self, currencies: &[String], from: &str, to: &str, base: &str);
    fn show_base(&mut self, base: &str);
    fn show_rates(&mut self, base: &str, rows: &[RateRow], status: &str);
    fn show_trend(&mut self, series: &TrendSeries);
    fn show_conversion(&mut self, outcome: &ConversionOutcome);
}

/// A view that records what it was asked to show.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    pub loading_changes: Vec<bool>,
    pub errors: Vec<String>,
    pub currencies: Vec<String>,
    pub base_label: String,
    pub rate_tables: Vec<(String, Vec<RateRow>, String)>,
    pub trends: Vec<TrendSeries>,
    pub conversions: Vec<String>,
}

impl View for RecordingView {
    fn set_loading(&mut self, loading: bool) {
        self.loading_changes.push(loading);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_currencies(&mut self, currencies: &[String], _from: &str, _to: &str, _base: &str) {
        self.currencies = currencies.to_vec();
    }

    fn show_base(&mut self, base: &str) {
        self.base_label = base.to_string();
    }

    fn show_rates(&mut self, base: &str, rows: &[RateRow], status: &str) {
        self.rate_tables
            .push((base.to_string(), rows.to_vec(), status.to_string()));
    }

    fn show_trend(&mut self, series: &TrendSeries) {
        self.trends.push(series.clone());
    }

    fn show_conversion(&mut self, outcome: &ConversionOutcome) {
        self.conversions.push(outcome.to_string());
    }
}
