//! Feature-level marginal PnL attribution.

use cabarete_traits::{Date, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One feature's marginal contribution on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalRow {
    /// Rebalance date.
    pub date: Date,
    /// Feature name.
    pub feature: String,
    /// Sum of the feature-attributed delta weights across common tickers.
    pub delta_weight: f64,
    /// Marginal PnL divided by the feature's gross exposure (0 when the
    /// exposure is 0).
    pub marginal_return: f64,
    /// Sum of `delta_weight * next_return` across common tickers.
    pub marginal_pnl: f64,
}

/// Marginal PnL rows per feature per date.
///
/// Dates are restricted to those present in the returns and in every
/// feature's weight map; tickers are restricted to those present in every
/// feature's rows over that date span. Rows come out ordered by
/// `(date, feature)`.
#[must_use]
pub fn feature_marginals(
    weights_by_feature: &BTreeMap<String, BTreeMap<Date, BTreeMap<Ticker, f64>>>,
    next_returns: &BTreeMap<Date, BTreeMap<Ticker, f64>>,
) -> Vec<MarginalRow> {
    if weights_by_feature.is_empty() || next_returns.is_empty() {
        return Vec::new();
    }

    let mut common_dates: BTreeSet<Date> = next_returns.keys().copied().collect();
    for feature_weights in weights_by_feature.values() {
        common_dates.retain(|d| feature_weights.contains_key(d));
    }
    if common_dates.is_empty() {
        return Vec::new();
    }

    let mut common_tickers: Option<BTreeSet<Ticker>> = None;
    for feature_weights in weights_by_feature.values() {
        for date in &common_dates {
            let tickers: BTreeSet<Ticker> = feature_weights
                .get(date)
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default();
            common_tickers = Some(match common_tickers.take() {
                None => tickers,
                Some(acc) => acc.intersection(&tickers).cloned().collect(),
            });
        }
    }
    let common_tickers = common_tickers.unwrap_or_default();
    if common_tickers.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for date in &common_dates {
        let date_returns = next_returns.get(date).cloned().unwrap_or_default();
        for (feature, feature_weights) in weights_by_feature {
            let weights = feature_weights.get(date).cloned().unwrap_or_default();

            let mut pnl = 0.0;
            let mut gross = 0.0;
            let mut delta_weight = 0.0;
            for ticker in &common_tickers {
                let w = weights.get(ticker).copied().unwrap_or(0.0);
                let r = date_returns.get(ticker).copied().unwrap_or(0.0);
                pnl += w * r;
                gross += w.abs();
                delta_weight += w;
            }

            rows.push(MarginalRow {
                date: *date,
                feature: feature.clone(),
                delta_weight,
                marginal_return: if gross > 0.0 { pnl / gross } else { 0.0 },
                marginal_pnl: pnl,
            });
        }
    }
    rows
}
