//! Factor IC telemetry pass.
//!
//! Computes per-factor IC time series against next-period returns for a
//! whole data snapshot, plus summary statistics. The adaptive weighting
//! layer consumes these series; the CLI persists them as run artifacts.

use crate::ic::{IcSummary, ic_series, ic_summary, next_period_returns};
use cabarete_factors::PanelFactor;
use cabarete_traits::{Date, Fundamentals, Panel, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of one telemetry pass: IC series and summaries keyed by factor
/// name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactorTelemetry {
    /// Per-date IC per factor.
    pub ic_series: BTreeMap<String, BTreeMap<Date, f64>>,
    /// Summary statistics per factor.
    pub summaries: BTreeMap<String, IcSummary>,
}

/// Compute IC series for the selected panel factors.
///
/// Next-period returns come from the price panel; each factor's score
/// panel is correlated against them date by date. Dates with fewer than
/// two usable cross-sectional pairs produce NaN ICs, which the summaries
/// drop.
#[must_use]
pub fn factor_ic_telemetry(
    prices: &Panel,
    eps: &Panel,
    fundamentals: &BTreeMap<Ticker, Fundamentals>,
    factors: &[PanelFactor],
) -> FactorTelemetry {
    let next_ret = next_period_returns(prices);

    let mut out = FactorTelemetry::default();
    for factor in factors {
        let scores = factor.compute(prices, eps, fundamentals);
        let series = ic_series(&scores, &next_ret);
        out.summaries
            .insert(factor.name().to_string(), ic_summary(&series));
        out.ic_series.insert(factor.name().to_string(), series);
    }
    out
}
