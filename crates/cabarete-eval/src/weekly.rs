//! Single-step weekly run.
//!
//! Runs the per-period pipeline on one batch for interactive inspection:
//! composite scores, capped weights, realized gross/net return, and a
//! single-observation metrics block. The walk-forward engine is the
//! multi-period counterpart.

use crate::backtest::portfolio_weights;
use crate::perf::{alpha_beta, max_drawdown, sharpe, sortino};
use cabarete_factors::CompositeBlend;
use cabarete_traits::{Result, SectorMap, Ticker, WeeklyBatch, WeeklyParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one weekly rebalance step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyOutcome {
    /// Final capped portfolio weights.
    pub weights: BTreeMap<Ticker, f64>,
    /// Gross realized return for the step.
    pub gross: f64,
    /// Net realized return after the flat cost assumption.
    pub net: f64,
    /// Annualized Sharpe of the one-observation net series (infinite or 0
    /// by the zero-volatility convention).
    pub sharpe: f64,
    /// Annualized Sortino of the one-observation net series.
    pub sortino: f64,
    /// Weekly alpha versus the benchmark (NaN with one observation).
    pub alpha: f64,
    /// Beta versus the benchmark (NaN with one observation).
    pub beta: f64,
    /// Max drawdown of the two-point equity path.
    pub max_drawdown: f64,
    /// Number of names held.
    pub breadth: usize,
}

impl WeeklyOutcome {
    /// Flat `name -> value` view for persistence and display.
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        [
            ("Sharpe", self.sharpe),
            ("Sortino", self.sortino),
            ("Alpha_weekly", self.alpha),
            ("Beta", self.beta),
            ("MaxDD", self.max_drawdown),
            ("Gross_weekly", self.gross),
            ("Net_weekly", self.net),
            ("Breadth", self.breadth as f64),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

/// Run one weekly rebalance step.
///
/// # Errors
///
/// Returns an input-validation error for out-of-range parameters. An empty
/// universe is not an error; it produces an empty book with zero returns.
pub fn run_weekly(
    batch: &WeeklyBatch,
    sectors: &SectorMap,
    params: &WeeklyParams,
) -> Result<WeeklyOutcome> {
    params.validate()?;

    let blend = CompositeBlend::standard(params);
    let composite = blend.score(batch, sectors);
    let weights = if composite.is_empty() {
        BTreeMap::new()
    } else {
        portfolio_weights(&composite, sectors, params)
    };

    let gross: f64 = weights
        .iter()
        .map(|(ticker, &w)| w * batch.next_returns.get(ticker).copied().unwrap_or(0.0))
        .sum();
    let net = gross - params.cost_bps_week / 1e4;

    let net_series = [net];
    let bench_series = [batch.avg_benchmark_return()];
    let equity = [1.0, 1.0 + net];
    let (alpha, beta) = alpha_beta(&net_series, &bench_series);

    Ok(WeeklyOutcome {
        breadth: weights.len(),
        weights,
        gross,
        net,
        sharpe: sharpe(&net_series, 0.0),
        sortino: sortino(&net_series, 0.0),
        alpha,
        beta,
        max_drawdown: max_drawdown(&equity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn demo_batch() -> (WeeklyBatch, SectorMap) {
        let mut batch = WeeklyBatch::default();
        batch.prices.insert(
            "AAA".to_string(),
            vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0],
        );
        batch
            .prices
            .insert("BBB".to_string(), vec![10.0, 9.0, 9.5, 9.7, 9.9, 10.2]);
        batch
            .prices
            .insert("CCC".to_string(), vec![5.0, 5.1, 5.2, 5.3, 5.4, 5.5]);
        batch.next_returns = [
            ("AAA".to_string(), 0.02),
            ("BBB".to_string(), -0.01),
            ("CCC".to_string(), 0.015),
        ]
        .into();
        let sectors: SectorMap = [
            ("AAA".to_string(), "Tech".to_string()),
            ("BBB".to_string(), "Finance".to_string()),
            ("CCC".to_string(), "Tech".to_string()),
        ]
        .into_iter()
        .collect();
        (batch, sectors)
    }

    #[test]
    fn test_weekly_outcome_shape() {
        let (batch, sectors) = demo_batch();
        let params = WeeklyParams {
            top_k: 2,
            name_cap: 0.6,
            sector_cap: 0.8,
            ..Default::default()
        };
        let outcome = run_weekly(&batch, &sectors, &params).unwrap();

        assert_eq!(outcome.breadth, 2);
        let abs_sum: f64 = outcome.weights.values().map(|w| w.abs()).sum();
        assert!(abs_sum <= 1.0 + 1e-9);
        assert_relative_eq!(
            outcome.net,
            outcome.gross - params.cost_bps_week / 1e4,
            epsilon = 1e-12
        );
        // One observation: ratio metrics follow the zero-vol convention.
        assert!(outcome.sharpe.is_infinite() || outcome.sharpe == 0.0);
        assert!(outcome.alpha.is_nan());
    }

    #[test]
    fn test_weekly_metrics_map_keys() {
        let (batch, sectors) = demo_batch();
        let outcome = run_weekly(&batch, &sectors, &WeeklyParams::default()).unwrap();
        let map = outcome.as_map();
        assert!(map.contains_key("Gross_weekly"));
        assert!(map.contains_key("Breadth"));
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn test_weekly_empty_universe() {
        let outcome = run_weekly(
            &WeeklyBatch::default(),
            &SectorMap::default(),
            &WeeklyParams::default(),
        )
        .unwrap();
        assert!(outcome.weights.is_empty());
        assert_eq!(outcome.gross, 0.0);
        assert!(outcome.net < 0.0);
    }

    #[test]
    fn test_weekly_invalid_params() {
        let params = WeeklyParams {
            sector_cap: 0.0,
            ..Default::default()
        };
        let (batch, sectors) = demo_batch();
        assert!(run_weekly(&batch, &sectors, &params).is_err());
    }
}
