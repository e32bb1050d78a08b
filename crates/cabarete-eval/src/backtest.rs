//! Walk-forward simulation over a weekly batch sequence.

use crate::perf::{alpha_beta, cagr, max_drawdown, sharpe, sortino};
use cabarete_factors::CompositeBlend;
use cabarete_portfolio::{cap_by_name, cap_by_sector, percentile_rank, select_top_k, turnover};
use cabarete_traits::{
    BacktestMetrics, BacktestReport, CabareteError, Engine, Result, SectorMap, Ticker,
    WeeklyBatch, WeeklyParams,
};
use std::collections::BTreeMap;

/// Full construction pipeline from composite scores to capped weights:
/// percentile rank, top-K equal weight, per-name cap, per-sector cap.
#[must_use]
pub fn portfolio_weights(
    scores: &BTreeMap<Ticker, f64>,
    sectors: &SectorMap,
    params: &WeeklyParams,
) -> BTreeMap<Ticker, f64> {
    let ranked = percentile_rank(scores);
    let preliminary = select_top_k(&ranked, params.top_k);
    let capped = cap_by_name(&preliminary, params.name_cap);
    cap_by_sector(&capped, sectors, params.sector_cap)
}

/// Drive the period loop with a caller-supplied weight function and
/// assemble the report. Shared by the scalar and vectorized engines so
/// both produce the identical metrics contract.
pub(crate) fn simulate<F>(
    batches: &[WeeklyBatch],
    params: &WeeklyParams,
    mut weigh: F,
) -> Result<BacktestReport>
where
    F: FnMut(&WeeklyBatch) -> BTreeMap<Ticker, f64>,
{
    if batches.is_empty() {
        return Err(CabareteError::InvalidInput(
            "batches must contain at least one WeeklyBatch entry".to_string(),
        ));
    }
    params.validate()?;

    let mut gross_returns = Vec::with_capacity(batches.len());
    let mut net_returns = Vec::with_capacity(batches.len());
    let mut benchmark_returns = Vec::with_capacity(batches.len());
    let mut equity = Vec::with_capacity(batches.len() + 1);
    equity.push(1.0);
    let mut weights_history = Vec::with_capacity(batches.len());
    let mut prev_weights: Option<BTreeMap<Ticker, f64>> = None;
    let mut total_turnover = 0.0;

    for batch in batches {
        let weights = weigh(batch);

        let gross: f64 = weights
            .iter()
            .map(|(ticker, &w)| w * batch.next_returns.get(ticker).copied().unwrap_or(0.0))
            .sum();
        let net = gross - params.cost_bps_week / 1e4;

        gross_returns.push(gross);
        net_returns.push(net);
        benchmark_returns.push(batch.avg_benchmark_return());

        // The first period has no prior book, so its turnover is 0.
        if let Some(prev) = &prev_weights {
            total_turnover += turnover(prev, &weights);
        }
        prev_weights = Some(weights.clone());
        weights_history.push(weights);

        let last = *equity.last().unwrap();
        equity.push(last * (1.0 + net));
    }

    let (alpha, beta) = alpha_beta(&net_returns, &benchmark_returns);
    let metrics = BacktestMetrics {
        sharpe: sharpe(&net_returns, 0.0),
        sortino: sortino(&net_returns, 0.0),
        alpha,
        beta,
        cagr: cagr(&equity),
        max_drawdown: max_drawdown(&equity),
        avg_turnover: total_turnover / net_returns.len() as f64,
        terminal_equity: *equity.last().unwrap(),
        total_weeks: net_returns.len(),
    };

    Ok(BacktestReport {
        metrics,
        gross_returns,
        net_returns,
        benchmark_returns,
        equity,
        weights_history,
        total_turnover,
    })
}

/// The reference scalar walk-forward engine.
///
/// Each period: blend sector-neutralized factor scores into a composite,
/// construct capped top-K weights, realize the next-period return net of
/// the flat cost assumption, compound equity, and accumulate turnover.
/// This engine's explicit rank-and-slice selection is authoritative for
/// correctness.
#[derive(Debug, Clone)]
pub struct WalkForward {
    params: WeeklyParams,
}

impl WalkForward {
    /// Create a scalar engine, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns an input-validation error for out-of-range parameters.
    pub fn new(params: WeeklyParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn params(&self) -> &WeeklyParams {
        &self.params
    }
}

impl Engine for WalkForward {
    fn name(&self) -> &str {
        "scalar"
    }

    fn run(&self, batches: &[WeeklyBatch], sectors: &SectorMap) -> Result<BacktestReport> {
        let blend = CompositeBlend::standard(&self.params);
        simulate(batches, &self.params, |batch| {
            portfolio_weights(&blend.score(batch, sectors), sectors, &self.params)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// The three-ticker scenario from the toolkit's acceptance checks:
    /// AAA trends hard, BBB wobbles, CCC grinds up slowly.
    fn scenario_batch() -> (WeeklyBatch, SectorMap) {
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
        for ticker in ["AAA", "BBB", "CCC"] {
            batch.eps.insert(ticker.to_string(), vec![1.0; 13]);
        }
        batch.next_returns = [
            ("AAA".to_string(), 0.02),
            ("BBB".to_string(), -0.01),
            ("CCC".to_string(), 0.015),
        ]
        .into();
        batch.benchmark = Some([("SPY".to_string(), 0.01)].into());

        let sectors: SectorMap = [
            ("AAA".to_string(), "Tech".to_string()),
            ("BBB".to_string(), "Finance".to_string()),
            ("CCC".to_string(), "Tech".to_string()),
        ]
        .into_iter()
        .collect();
        (batch, sectors)
    }

    fn scenario_params() -> WeeklyParams {
        WeeklyParams {
            top_k: 2,
            name_cap: 0.6,
            sector_cap: 0.8,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_batches_is_an_error() {
        let engine = WalkForward::new(WeeklyParams::default()).unwrap();
        let result = engine.run(&[], &SectorMap::default());
        assert!(matches!(result, Err(CabareteError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let params = WeeklyParams {
            top_k: 0,
            ..Default::default()
        };
        assert!(WalkForward::new(params).is_err());
    }

    #[test]
    fn test_scenario_weights_respect_caps() {
        let (batch, sectors) = scenario_batch();
        let params = scenario_params();
        let engine = WalkForward::new(params).unwrap();
        let report = engine.run(&[batch], &sectors).unwrap();

        let weights = &report.weights_history[0];
        assert_eq!(weights.len(), 2);
        let abs_sum: f64 = weights.values().map(|w| w.abs()).sum();
        assert!(abs_sum <= 1.0 + 1e-9);
        assert!(weights.values().all(|w| w.abs() <= params.name_cap + 1e-9));
    }

    #[test]
    fn test_equity_compounds_net_returns() {
        let (batch, sectors) = scenario_batch();
        let engine = WalkForward::new(scenario_params()).unwrap();
        let report = engine.run(&[batch.clone(), batch], &sectors).unwrap();

        assert_eq!(report.equity.len(), 3);
        assert_relative_eq!(report.equity[0], 1.0);
        let expected = (1.0 + report.net_returns[0]) * (1.0 + report.net_returns[1]);
        assert_relative_eq!(report.metrics.terminal_equity, expected, epsilon = 1e-12);
        assert_relative_eq!(
            report.net_returns[0],
            report.gross_returns[0] - scenario_params().cost_bps_week / 1e4,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_first_period_turnover_is_zero() {
        let (batch, sectors) = scenario_batch();
        let engine = WalkForward::new(scenario_params()).unwrap();
        let report = engine.run(&[batch.clone(), batch], &sectors).unwrap();

        // Identical data each week keeps the book unchanged, and the
        // initial buy-in does not count as turnover.
        assert_relative_eq!(report.total_turnover, 0.0, epsilon = 1e-9);
        assert_relative_eq!(report.metrics.avg_turnover, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_benchmark_flows_into_metrics() {
        let (batch, sectors) = scenario_batch();
        let engine = WalkForward::new(scenario_params()).unwrap();
        let report = engine.run(&[batch], &sectors).unwrap();
        assert_relative_eq!(report.benchmark_returns[0], 0.01, epsilon = 1e-12);
        assert_eq!(report.metrics.total_weeks, 1);
        // Single observation: OLS is undefined.
        assert!(report.metrics.beta.is_nan());
    }

    #[test]
    fn test_portfolio_weights_pipeline() {
        let scores: BTreeMap<Ticker, f64> = [
            ("A".to_string(), 3.0),
            ("B".to_string(), 2.0),
            ("C".to_string(), 1.0),
            ("D".to_string(), 0.5),
        ]
        .into();
        let sectors = SectorMap::default();
        let params = WeeklyParams {
            top_k: 2,
            name_cap: 0.4,
            sector_cap: 1.0,
            ..Default::default()
        };
        let weights = portfolio_weights(&scores, &sectors, &params);
        assert_eq!(weights.len(), 2);
        assert!(weights.contains_key("A"));
        assert!(weights.contains_key("B"));
        assert!(weights.values().all(|w| *w <= 0.4 + 1e-9));
    }
}
