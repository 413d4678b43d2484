//! Synthetic trend data for the chart. None of this is real market history.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::config::HistoryConfig;
use crate::core::currency::CurrencyCode;
use crate::core::rates::{TREND_LABELS, TrendSeries};

pub struct TrendGenerator {
    amplitude: f64,
    jitter: f64,
    seed: Option<u64>,
}

impl TrendGenerator {
    pub fn new(amplitude: f64, jitter: f64, seed: Option<u64>) -> Self {
        TrendGenerator {
            amplitude,
            jitter: jitter.abs(),
            seed,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.amplitude, config.jitter, config.seed)
    }

    /// Builds a series with a fresh generator: seeded when configured, otherwise
    /// from entropy.
    pub fn series(&self, base: &CurrencyCode) -> TrendSeries {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.series_with(base, &mut rng)
    }

    /// Each point is `1 + amplitude * sin(index) + jitter`, rounded to 4 decimals.
    pub fn series_with<R: Rng>(&self, base: &CurrencyCode, rng: &mut R) -> TrendSeries {
        let rates = (0..TREND_LABELS.len())
            .map(|index| {
                let noise = if self.jitter > 0.0 {
                    rng.gen_range(-self.jitter..=self.jitter)
                } else {
                    0.0
                };
                round4(1.0 + self.amplitude * (index as f64).sin() + noise)
            })
            .collect();

        TrendSeries {
            base: base.to_string(),
            labels: TREND_LABELS.iter().map(|l| l.to_string()).collect(),
            rates,
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
