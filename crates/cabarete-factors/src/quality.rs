//! Fundamental quality composite.

use cabarete_traits::{Factor, Fundamentals, Ticker, WeeklyBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Component weights for the quality composite.
///
/// Higher gross margin is rewarded; higher accruals and leverage are
/// penalized, so their default weights are negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityWeights {
    /// Weight on gross profit margin.
    pub gpm: f64,
    /// Weight on accruals.
    pub accruals: f64,
    /// Weight on leverage.
    pub leverage: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            gpm: 0.5,
            accruals: -0.25,
            leverage: -0.25,
        }
    }
}

/// Weighted fundamental quality score for one snapshot.
#[must_use]
pub fn quality_score(funda: &Fundamentals, weights: &QualityWeights) -> f64 {
    weights.gpm * funda.gpm + weights.accruals * funda.accruals + weights.leverage * funda.leverage
}

/// Quality composite factor over the batch's fundamentals snapshot.
///
/// A pure cross-sectional score with no time dimension; tickers without
/// fundamentals fall back to an all-zero snapshot.
#[derive(Debug, Clone, Default)]
pub struct QualityComposite {
    weights: QualityWeights,
}

impl QualityComposite {
    /// Create a quality factor with the given component weights.
    #[must_use]
    pub const fn new(weights: QualityWeights) -> Self {
        Self { weights }
    }
}

impl Factor for QualityComposite {
    fn name(&self) -> &str {
        "quality"
    }

    fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64> {
        batch
            .universe()
            .map(|ticker| {
                let funda = batch
                    .fundamentals
                    .get(ticker)
                    .copied()
                    .unwrap_or_default();
                (ticker.clone(), quality_score(&funda, &self.weights))
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quality_score_default_weights() {
        let funda = Fundamentals {
            gpm: 0.4,
            accruals: 0.1,
            leverage: 0.2,
        };
        let score = quality_score(&funda, &QualityWeights::default());
        assert_relative_eq!(score, 0.5 * 0.4 - 0.25 * 0.1 - 0.25 * 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_fundamentals_default_to_zero() {
        let mut batch = WeeklyBatch::default();
        batch.prices.insert("AAA".to_string(), vec![1.0]);
        batch.prices.insert("BBB".to_string(), vec![2.0]);
        batch.fundamentals.insert(
            "AAA".to_string(),
            Fundamentals {
                gpm: 0.5,
                accruals: 0.0,
                leverage: 0.0,
            },
        );

        let factor = QualityComposite::default();
        let scores = factor.score(&batch);
        assert_relative_eq!(scores["AAA"], 0.25, epsilon = 1e-12);
        assert_eq!(scores["BBB"], 0.0);
    }

    #[test]
    fn test_higher_leverage_scores_lower() {
        let low = Fundamentals {
            gpm: 0.4,
            accruals: 0.1,
            leverage: 0.1,
        };
        let high = Fundamentals {
            leverage: 0.6,
            ..low
        };
        let weights = QualityWeights::default();
        assert!(quality_score(&low, &weights) > quality_score(&high, &weights));
    }
}
