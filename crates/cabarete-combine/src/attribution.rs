//! Adaptive factor weighting with attribution.
//!
//! Orchestrates the full weighting pass: IC-EMA smoothing, regime gates,
//! clamp-and-normalize, and per-factor attribution so a caller can see
//! which factor contributed how much expected edge on each date.

use crate::gates::{RegimeConfig, regime_gates};
use crate::ic_ema::ic_ema_series;
use crate::weighting::{apply_gates, clamp_and_normalize};
use cabarete_traits::{Date, FactorStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the adaptive weighting pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// EMA smoothing factor on the IC series.
    pub alpha: f64,
    /// Regime filter thresholds and windows.
    pub regime: RegimeConfig,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            regime: RegimeConfig::default(),
        }
    }
}

/// Per-factor averages over the weighting run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorSummary {
    /// Mean of the finite IC-EMA values.
    pub ic_ema_mean: f64,
    /// Average final weight.
    pub avg_weight: f64,
    /// Average gate state (1.0 means always eligible).
    pub avg_gate: f64,
    /// Average attribution (`weight * EMA score`).
    pub avg_contribution: f64,
}

/// Full output of one adaptive weighting pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightingReport {
    /// Smoothed IC per date per factor.
    pub ic_ema: BTreeMap<Date, BTreeMap<String, f64>>,
    /// Gate state per date per factor.
    pub gates: BTreeMap<Date, BTreeMap<String, bool>>,
    /// Final weights per date per factor, summing to 1 when any positive
    /// mass survives the gates and to 0 otherwise.
    pub weights: BTreeMap<Date, BTreeMap<String, f64>>,
    /// Attribution per date per factor: `weight * EMA score`, 0 for
    /// non-finite scores.
    pub contributions: BTreeMap<Date, BTreeMap<String, f64>>,
    /// Per-factor averages.
    pub summary: BTreeMap<String, FactorSummary>,
}

/// Run adaptive weighting over historical factor IC series.
///
/// Per date: clamp negative/NaN EMA scores to 0 and normalize, zero out
/// gated factors without renormalizing, then clamp-and-normalize again so
/// the surviving factors share the weight.
#[must_use]
pub fn adaptive_weighting(
    ic_by_factor: &BTreeMap<String, BTreeMap<Date, f64>>,
    benchmark: Option<&BTreeMap<Date, f64>>,
    styles: &[(String, FactorStyle)],
    config: &AdaptiveConfig,
) -> WeightingReport {
    let ic_ema = ic_ema_series(ic_by_factor, config.alpha);
    let gates = benchmark.map_or_else(BTreeMap::new, |bench| {
        regime_gates(bench, styles, &config.regime, None)
    });

    let factor_names: Vec<&String> = styles.iter().map(|(name, _)| name).collect();
    let empty_gate_row = BTreeMap::new();

    let mut weights_by_date = BTreeMap::new();
    let mut contrib_by_date = BTreeMap::new();
    for (date, ema_row) in &ic_ema {
        let scores: BTreeMap<String, f64> = factor_names
            .iter()
            .map(|name| {
                let score = ema_row.get(*name).copied().unwrap_or(f64::NAN);
                ((*name).clone(), score)
            })
            .collect();

        let gate_row = gates.get(date).unwrap_or(&empty_gate_row);
        let weights =
            clamp_and_normalize(&apply_gates(&clamp_and_normalize(&scores), gate_row));

        let contributions: BTreeMap<String, f64> = weights
            .iter()
            .map(|(name, &weight)| {
                let score = scores.get(name).copied().unwrap_or(f64::NAN);
                let contribution = if score.is_finite() { weight * score } else { 0.0 };
                (name.clone(), contribution)
            })
            .collect();

        weights_by_date.insert(*date, weights);
        contrib_by_date.insert(*date, contributions);
    }

    let summary = summarize(&ic_ema, &gates, &weights_by_date, &contrib_by_date, styles);

    WeightingReport {
        ic_ema,
        gates,
        weights: weights_by_date,
        contributions: contrib_by_date,
        summary,
    }
}

fn summarize(
    ic_ema: &BTreeMap<Date, BTreeMap<String, f64>>,
    gates: &BTreeMap<Date, BTreeMap<String, bool>>,
    weights: &BTreeMap<Date, BTreeMap<String, f64>>,
    contributions: &BTreeMap<Date, BTreeMap<String, f64>>,
    styles: &[(String, FactorStyle)],
) -> BTreeMap<String, FactorSummary> {
    let mean_of = |values: &[f64]| {
        if values.is_empty() {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };

    styles
        .iter()
        .map(|(name, _)| {
            let ema_values: Vec<f64> = ic_ema
                .values()
                .filter_map(|row| row.get(name))
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            let weight_values: Vec<f64> = weights
                .values()
                .map(|row| row.get(name).copied().unwrap_or(0.0))
                .collect();
            let gate_values: Vec<f64> = ic_ema
                .keys()
                .map(|date| {
                    gates
                        .get(date)
                        .and_then(|row| row.get(name))
                        .map_or(1.0, |&open| if open { 1.0 } else { 0.0 })
                })
                .collect();
            let contrib_values: Vec<f64> = contributions
                .values()
                .map(|row| row.get(name).copied().unwrap_or(0.0))
                .collect();

            (
                name.clone(),
                FactorSummary {
                    ic_ema_mean: mean_of(&ema_values),
                    avg_weight: mean_of(&weight_values),
                    avg_gate: mean_of(&gate_values),
                    avg_contribution: mean_of(&contrib_values),
                },
            )
        })
        .collect()
}
