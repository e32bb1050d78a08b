//! Low-volatility factor.

use cabarete_traits::{Factor, Ticker, WeeklyBatch, stats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the low-volatility factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LowVolConfig {
    /// Number of trailing period returns in the volatility window.
    pub window: usize,
}

impl Default for LowVolConfig {
    fn default() -> Self {
        Self { window: 26 }
    }
}

/// Negated realized volatility, so calmer names score higher.
///
/// Computes the sample standard deviation of the trailing `window`
/// period-over-period returns and negates it. Tickers without a full
/// window of returns score 0.
#[derive(Debug, Clone, Default)]
pub struct LowVolatility {
    config: LowVolConfig,
}

impl LowVolatility {
    /// Create a low-volatility factor with the given configuration.
    #[must_use]
    pub const fn new(config: LowVolConfig) -> Self {
        Self { config }
    }
}

impl Factor for LowVolatility {
    fn name(&self) -> &str {
        "low_vol"
    }

    fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64> {
        let window = self.config.window;
        batch
            .prices
            .iter()
            .map(|(ticker, series)| {
                let returns: Vec<f64> = series
                    .windows(2)
                    .filter(|w| w[0] != 0.0)
                    .map(|w| w[1] / w[0] - 1.0)
                    .collect();
                let score = if returns.len() >= window && window >= 2 {
                    -stats::sample_std(&returns[returns.len() - window..])
                } else {
                    0.0
                };
                (ticker.clone(), score)
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        self.config.window + 1
    }
}
