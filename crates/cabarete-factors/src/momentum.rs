//! Price momentum over multiple lookback windows.

use cabarete_traits::{Factor, Ticker, WeeklyBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the multi-horizon momentum factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Lookback windows in periods. Each computable window contributes one
    /// return; the factor score is their arithmetic mean.
    pub lookbacks: Vec<usize>,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookbacks: vec![13, 26, 52],
        }
    }
}

/// Per-lookback momentum returns for each ticker.
///
/// For a lookback `L`, the return is `last / value_at(-L-1) - 1`, computed
/// only when the history is long enough and the denominator is nonzero.
/// Tickers with fewer than 3 observations get an empty map.
#[must_use]
pub fn price_momentum(
    prices: &BTreeMap<Ticker, Vec<f64>>,
    lookbacks: &[usize],
) -> BTreeMap<Ticker, BTreeMap<usize, f64>> {
    let mut out = BTreeMap::new();
    for (ticker, series) in prices {
        let mut returns = BTreeMap::new();
        let n = series.len();
        if n >= 3 {
            let last = series[n - 1];
            for &lb in lookbacks {
                let Some(idx) = n.checked_sub(lb + 1) else {
                    continue;
                };
                let prev = series[idx];
                if prev != 0.0 {
                    returns.insert(lb, last / prev - 1.0);
                }
            }
        }
        out.insert(ticker.clone(), returns);
    }
    out
}

/// Multi-horizon price momentum factor.
///
/// Averages the momentum returns of whichever configured lookbacks were
/// computable for a ticker; a ticker with no computable lookback scores 0.
#[derive(Debug, Clone, Default)]
pub struct Momentum {
    config: MomentumConfig,
}

impl Momentum {
    /// Create a momentum factor with the given configuration.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }
}

impl Factor for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64> {
        price_momentum(&batch.prices, &self.config.lookbacks)
            .into_iter()
            .map(|(ticker, returns)| {
                let score = if returns.is_empty() {
                    0.0
                } else {
                    returns.values().sum::<f64>() / returns.len() as f64
                };
                (ticker, score)
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        self.config.lookbacks.iter().copied().max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prices_of(series: &[(&str, &[f64])]) -> BTreeMap<Ticker, Vec<f64>> {
        series
            .iter()
            .map(|(t, p)| (t.to_string(), p.to_vec()))
            .collect()
    }

    #[test]
    fn test_single_lookback() {
        let prices = prices_of(&[("AAA", &[10.0, 11.0, 12.0, 13.0])]);
        let mom = price_momentum(&prices, &[2]);
        // last / series[-3] - 1 = 13/11 - 1
        assert_relative_eq!(mom["AAA"][&2], 13.0 / 11.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_history_too_short_for_lookback() {
        let prices = prices_of(&[("AAA", &[10.0, 11.0, 12.0])]);
        let mom = price_momentum(&prices, &[13]);
        assert!(mom["AAA"].is_empty());
    }

    #[test]
    fn test_fewer_than_three_observations() {
        let prices = prices_of(&[("AAA", &[10.0, 11.0])]);
        let mom = price_momentum(&prices, &[1]);
        assert!(mom["AAA"].is_empty());
    }

    #[test]
    fn test_zero_denominator_skipped() {
        let prices = prices_of(&[("AAA", &[0.0, 1.0, 2.0, 3.0])]);
        let mom = price_momentum(&prices, &[3, 1]);
        assert!(!mom["AAA"].contains_key(&3));
        assert!(mom["AAA"].contains_key(&1));
    }

    #[test]
    fn test_factor_averages_computable_lookbacks() {
        let mut batch = WeeklyBatch::default();
        batch
            .prices
            .insert("AAA".to_string(), vec![10.0, 11.0, 12.0, 13.0, 14.0]);
        let factor = Momentum::new(MomentumConfig {
            lookbacks: vec![1, 2],
        });
        let scores = factor.score(&batch);
        let expected = ((14.0 / 13.0 - 1.0) + (14.0 / 12.0 - 1.0)) / 2.0;
        assert_relative_eq!(scores["AAA"], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_factor_zero_when_no_lookback_computable() {
        let mut batch = WeeklyBatch::default();
        batch.prices.insert("AAA".to_string(), vec![10.0, 11.0]);
        let factor = Momentum::default();
        assert_eq!(factor.score(&batch)["AAA"], 0.0);
    }

    #[test]
    fn test_default_lookback() {
        let factor = Momentum::default();
        assert_eq!(factor.lookback(), 53);
    }
}
