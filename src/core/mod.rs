//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCode, RateProvider, RateQuote, RateTable};
pub use rates::{HealthResponse, RatesResponse, TrendSeries};
