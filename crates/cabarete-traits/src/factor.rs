//! Factor trait for cross-sectional scoring.
//!
//! A factor turns the raw per-ticker time series in a [`WeeklyBatch`] into
//! one score per ticker. Factors never fail: a ticker whose history is too
//! short for the factor's lookback simply degrades to a zero/neutral score.

use crate::{Ticker, WeeklyBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cross-sectional alpha factor.
///
/// Implementations should be thread-safe (`Send + Sync`) so independent
/// simulations can run in parallel.
///
/// # Example
///
/// ```
/// use cabarete_traits::{Factor, Ticker, WeeklyBatch};
/// use std::collections::BTreeMap;
///
/// struct Constant;
///
/// impl Factor for Constant {
///     fn name(&self) -> &str {
///         "constant"
///     }
///
///     fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64> {
///         batch.universe().map(|t| (t.clone(), 1.0)).collect()
///     }
///
///     fn lookback(&self) -> usize {
///         0
///     }
/// }
/// ```
pub trait Factor: Send + Sync {
    /// Unique name of this factor, used in logging and IC tracking.
    fn name(&self) -> &str;

    /// Compute one raw score per ticker in the batch's universe.
    ///
    /// Scores are raw (not standardized); sector neutralization happens
    /// downstream. Tickers with insufficient history receive the factor's
    /// neutral value rather than being dropped.
    fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64>;

    /// History length (in periods) required for a fully informed score.
    fn lookback(&self) -> usize;
}

/// Behavioral classification of a factor, used by the regime gates.
///
/// High-volatility regimes gate off everything that is not [`Defensive`];
/// downtrends additionally gate off [`Momentum`] factors.
///
/// [`Defensive`]: FactorStyle::Defensive
/// [`Momentum`]: FactorStyle::Momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorStyle {
    /// Trend-following factors, gated off in downtrends and high volatility.
    Momentum,
    /// Factors expected to hold up in stressed regimes (quality, low-vol).
    Defensive,
    /// Everything else; gated off only in high-volatility regimes.
    Neutral,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat;

    impl Factor for Flat {
        fn name(&self) -> &str {
            "flat"
        }

        fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64> {
            batch.universe().map(|t| (t.clone(), 0.0)).collect()
        }

        fn lookback(&self) -> usize {
            4
        }
    }

    #[test]
    fn test_factor_scores_universe() {
        let mut batch = WeeklyBatch::default();
        batch.prices.insert("AAA".to_string(), vec![1.0]);
        batch.prices.insert("BBB".to_string(), vec![2.0]);

        let factor = Flat;
        let scores = factor.score(&batch);
        assert_eq!(scores.len(), 2);
        assert_eq!(factor.lookback(), 4);
    }

    #[test]
    fn test_factor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn Factor>>();
    }

    #[test]
    fn test_style_equality() {
        assert_eq!(FactorStyle::Momentum, FactorStyle::Momentum);
        assert_ne!(FactorStyle::Momentum, FactorStyle::Defensive);
    }
}
