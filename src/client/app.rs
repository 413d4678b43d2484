use anyhow::Result;
use tracing::{debug, warn};

use super::api::RateApi;
use super::compute::{self, ConversionOutcome, ConversionRequest};
use super::error::ClientError;
use super::state::{ClientState, FALLBACK_CURRENCIES, MINIMAL_CURRENCIES, RatesSnapshot};
use super::view::View;
use crate::core::rates::{RatesResponse, TrendSeries};

const INIT_FAILED: &str = "Initialization failed. Using limited functionality.";
const RATES_FAILED: &str = "Failed to fetch current rates. Using fallback data.";
const TREND_FAILED: &str = "Failed to load chart data. Showing sample data.";
const CONVERT_FAILED: &str = "Conversion failed. Please try again.";

fn to_owned_list(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

/// Drives the client: owns the state, talks to the service and pushes results
/// to the view.
pub struct RateClient<A, V> {
    api: A,
    view: V,
    state: ClientState,
}

impl<A: RateApi, V: View> RateClient<A, V> {
    pub fn new(api: A, view: V) -> Self {
        RateClient {
            api,
            view,
            state: ClientState::new(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Loads currencies, rates and the trend. Failures are reported and replaced
    /// with substitute data; this never fails.
    pub async fn init(&mut self) {
        self.view.set_loading(true);

        let currencies = match self.api.health().await {
            Ok(health) if !health.currencies.is_empty() => health.currencies,
            Ok(_) => to_owned_list(MINIMAL_CURRENCIES),
            Err(e) => {
                warn!(error = %e, "Health check failed");
                self.view.show_error(INIT_FAILED);
                to_owned_list(FALLBACK_CURRENCIES)
            }
        };
        self.state.set_currencies(currencies);
        self.view.show_currencies(
            self.state.currencies(),
            self.state.selected_from(),
            self.state.selected_to(),
            self.state.current_base(),
        );
        self.view.show_base(self.state.current_base());

        let base = self.state.current_base().to_string();
        let rates = self.api.rates(&base).await;
        self.apply_rates(&base, rates);
        let trend = self.api.history(&base).await;
        self.apply_trend(&base, trend);

        self.view.set_loading(false);
    }

    /// Switches the base currency and reloads rates and trend for it.
    pub async fn change_base(&mut self, code: &str) -> Result<(), ClientError> {
        let base = match self.state.resolve(code) {
            Ok(base) => base,
            Err(e) => {
                self.view.show_error(&e.to_string());
                return Err(e);
            }
        };
        self.report(ClientState::begin)?;
        if let Err(e) = self.state.select_base(&base) {
            self.state.finish();
            return Err(e);
        }
        self.view.show_base(&base);
        self.view.set_loading(true);

        let (rates, trend) = futures::join!(self.api.rates(&base), self.api.history(&base));
        self.apply_rates(&base, rates);
        self.apply_trend(&base, trend);

        self.view.set_loading(false);
        self.state.finish();
        Ok(())
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.state.set_amount(amount);
    }

    pub fn select_from(&mut self, code: &str) -> Result<(), ClientError> {
        self.report(|state| state.select_from(code))
    }

    pub fn select_to(&mut self, code: &str) -> Result<(), ClientError> {
        self.report(|state| state.select_to(code))
    }

    /// Converts the current amount between the selected currencies.
    pub async fn convert(&mut self) -> Result<ConversionOutcome, ClientError> {
        let request = ConversionRequest::validate(
            self.state.amount(),
            self.state.selected_from(),
            self.state.selected_to(),
        );
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.view.show_error(&e.to_string());
                return Err(e);
            }
        };

        if request.is_identity() {
            let outcome = request.convert(self.state.rates())?;
            self.view.show_conversion(&outcome);
            return Ok(outcome);
        }

        self.report(ClientState::begin)?;
        self.view.set_loading(true);

        if !request.is_priced_by(self.state.rates()) {
            debug!(from = %request.from, "Cached rates do not cover conversion, refetching");
            let rates = self.api.rates(&request.from).await;
            self.apply_rates(&request.from, rates);
        }
        let result = request.convert(self.state.rates());

        self.view.set_loading(false);
        self.state.finish();

        match result {
            Ok(outcome) => {
                self.view.show_conversion(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Conversion failed");
                self.view.show_error(CONVERT_FAILED);
                Err(e)
            }
        }
    }

    /// Sets amount and selections in one step, then converts. Nothing is
    /// stored unless all three inputs are valid.
    pub async fn convert_amount(
        &mut self,
        amount: &str,
        from: &str,
        to: &str,
    ) -> Result<ConversionOutcome, ClientError> {
        let checked = compute::parse_amount(amount)
            .and_then(|_| Ok((self.state.resolve(from)?, self.state.resolve(to)?)));
        let (from, to) = match checked {
            Ok(codes) => codes,
            Err(e) => {
                self.view.show_error(&e.to_string());
                return Err(e);
            }
        };
        self.state.select_from(&from)?;
        self.state.select_to(&to)?;
        self.set_amount(amount);
        self.convert().await
    }

    /// Re-renders the cached rate table.
    pub fn show_rates(&mut self) {
        let snapshot = self.state.rates();
        let rows = compute::rate_rows(self.state.currencies(), snapshot);
        self.view
            .show_rates(&snapshot.base, &rows, &compute::status_line(snapshot));
    }

    /// Re-renders the cached trend, if any.
    pub fn show_trend(&mut self) {
        if let Some(series) = self.state.trend() {
            self.view.show_trend(series);
        }
    }

    fn report<F>(&mut self, action: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut ClientState) -> Result<(), ClientError>,
    {
        let result = action(&mut self.state);
        if let Err(e) = &result {
            self.view.show_error(&e.to_string());
        }
        result
    }

    fn apply_rates(&mut self, base: &str, result: Result<RatesResponse>) {
        match result {
            Ok(response) => self.state.store_rates(RatesSnapshot::from(response)),
            Err(e) => {
                warn!(error = %e, %base, "Rate fetch failed");
                self.view.show_error(RATES_FAILED);
                if let Some(rebased) = compute::rebase(self.state.rates(), base) {
                    self.state.store_rates(rebased);
                }
            }
        }
        self.show_rates();
    }

    fn apply_trend(&mut self, base: &str, result: Result<TrendSeries>) {
        let series = match result {
            Ok(series) => series,
            Err(e) => {
                warn!(error = %e, %base, "Trend fetch failed");
                self.view.show_error(TREND_FAILED);
                TrendSeries::sample(base)
            }
        };
        self.state.store_trend(series);
        self.show_trend();
    }
}
