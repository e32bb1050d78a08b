//! Transaction-cost estimation.
//!
//! Costs decompose into a linear spread term, a square-root market-impact
//! term, and a linear fee term. The square root gives sublinear impact
//! growth: doubling a trade less than doubles its impact cost.

use cabarete_traits::{Date, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters of the cost model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostParams {
    /// Participation cap as a fraction of ADV.
    pub p_max: f64,
    /// Market-impact coefficient on `sigma * sqrt(participation)`.
    pub k: f64,
    /// Linear fee in basis points of participation.
    pub fee_bps: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            p_max: 0.10,
            k: 0.7,
            fee_bps: 0.0,
        }
    }
}

/// Per-date transaction-cost breakdown, in return units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    /// Trade date.
    pub date: Date,
    /// Linear bid-ask spread cost.
    pub spread: f64,
    /// Square-root market-impact cost.
    pub impact: f64,
    /// Linear fee cost.
    pub fees: f64,
}

impl CostRow {
    /// Sum of the three cost components.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.spread + self.impact + self.fees
    }
}

/// Audit trail from a cost estimation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostDiagnostics {
    /// Capped participation per date per ticker.
    pub participation: BTreeMap<Date, BTreeMap<Ticker, f64>>,
    /// Count of participation-cap violations per date. Violating trades
    /// are capped, not rejected; the count flags them for review.
    pub violations: BTreeMap<Date, usize>,
}

/// Estimate per-date trading costs from signed trade sizes.
///
/// Participation is `|shares| / ADV` per ticker (0 when ADV is missing or
/// non-positive), capped at `p_max`. Per ticker the cost contributions are
/// `p * spread_bps / 1e4`, `sigma * k * sqrt(p)`, and `p * fee_bps / 1e4`,
/// summed into one [`CostRow`] per date.
#[must_use]
pub fn estimate_costs(
    trades: &BTreeMap<Date, BTreeMap<Ticker, f64>>,
    adv: &BTreeMap<Ticker, f64>,
    spreads_bps: &BTreeMap<Ticker, f64>,
    sigma_daily: &BTreeMap<Ticker, f64>,
    params: &CostParams,
) -> (Vec<CostRow>, CostDiagnostics) {
    let fee_rate = params.fee_bps / 1e4;
    let mut rows = Vec::with_capacity(trades.len());
    let mut diagnostics = CostDiagnostics::default();

    for (date, trade_row) in trades {
        let mut spread = 0.0;
        let mut impact = 0.0;
        let mut fees = 0.0;
        let mut participation_row = BTreeMap::new();
        let mut violations = 0usize;

        for (ticker, &shares) in trade_row {
            let adv_value = adv.get(ticker).copied().unwrap_or(0.0);
            let p_raw = if adv_value > 0.0 {
                shares.abs() / adv_value
            } else {
                0.0
            };
            if p_raw > params.p_max + 1e-12 {
                violations += 1;
            }
            let p = p_raw.min(params.p_max);
            participation_row.insert(ticker.clone(), p);

            let spread_bps = spreads_bps.get(ticker).copied().unwrap_or(0.0);
            let sigma = sigma_daily.get(ticker).copied().unwrap_or(0.0);

            spread += p * (spread_bps / 1e4);
            impact += sigma * params.k * p.sqrt();
            fees += p * fee_rate;
        }

        rows.push(CostRow {
            date: *date,
            spread,
            impact,
            fees,
        });
        diagnostics.participation.insert(*date, participation_row);
        diagnostics.violations.insert(*date, violations);
    }

    (rows, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn map_of(pairs: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        pairs.iter().map(|(t, v)| (t.to_string(), *v)).collect()
    }

    fn single_date_trades(shares: &[(&str, f64)]) -> BTreeMap<Date, BTreeMap<Ticker, f64>> {
        let date = Date::from_ymd_opt(2024, 3, 1).unwrap();
        [(date, map_of(shares))].into()
    }

    #[test]
    fn test_cost_components() {
        let trades = single_date_trades(&[("AAA", 5_000.0)]);
        let adv = map_of(&[("AAA", 100_000.0)]);
        let spreads = map_of(&[("AAA", 10.0)]);
        let sigma = map_of(&[("AAA", 0.02)]);
        let params = CostParams {
            fee_bps: 1.0,
            ..Default::default()
        };

        let (rows, diag) = estimate_costs(&trades, &adv, &spreads, &sigma, &params);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        let p = 0.05;
        assert_relative_eq!(row.spread, p * 10.0 / 1e4, epsilon = 1e-12);
        assert_relative_eq!(row.impact, 0.02 * 0.7 * p.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(row.fees, p * 1.0 / 1e4, epsilon = 1e-12);
        assert_relative_eq!(row.total(), row.spread + row.impact + row.fees);
        assert_eq!(diag.violations.values().sum::<usize>(), 0);
    }

    #[test]
    fn test_doubling_trades_is_sublinear_in_impact() {
        let adv = map_of(&[("AAA", 1_000_000.0)]);
        let spreads = map_of(&[("AAA", 5.0)]);
        let sigma = map_of(&[("AAA", 0.02)]);
        let params = CostParams::default();

        let (base, _) = estimate_costs(
            &single_date_trades(&[("AAA", 10_000.0)]),
            &adv,
            &spreads,
            &sigma,
            &params,
        );
        let (doubled, _) = estimate_costs(
            &single_date_trades(&[("AAA", 20_000.0)]),
            &adv,
            &spreads,
            &sigma,
            &params,
        );

        let ratio = doubled[0].impact / base[0].impact;
        assert!(ratio > 1.0 && ratio < 2.0);
        assert!(doubled[0].total() > base[0].total());
    }

    #[test]
    fn test_participation_capped_and_flagged() {
        let trades = single_date_trades(&[("AAA", 50_000.0)]);
        let adv = map_of(&[("AAA", 100_000.0)]);
        let (rows, diag) = estimate_costs(
            &trades,
            &adv,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &CostParams::default(),
        );
        let date = rows[0].date;
        assert_relative_eq!(diag.participation[&date]["AAA"], 0.10, epsilon = 1e-12);
        assert_eq!(diag.violations[&date], 1);
    }

    #[test]
    fn test_zero_adv_contributes_nothing() {
        let trades = single_date_trades(&[("AAA", 5_000.0)]);
        let (rows, diag) = estimate_costs(
            &trades,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            &CostParams::default(),
        );
        assert_eq!(rows[0].total(), 0.0);
        let date = rows[0].date;
        assert_eq!(diag.participation[&date]["AAA"], 0.0);
        assert_eq!(diag.violations[&date], 0);
    }

    #[test]
    fn test_empty_trades() {
        let (rows, diag) = estimate_costs(
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            &CostParams::default(),
        );
        assert!(rows.is_empty());
        assert!(diag.participation.is_empty());
    }
}
