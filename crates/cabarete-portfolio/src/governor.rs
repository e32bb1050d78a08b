//! Drawdown tracking and the exposure governor.

use serde::{Deserialize, Serialize};

/// Drawdown series for an equity path: `(peak - value) / peak` against the
/// running peak, 0 while the equity sits at a new high or the peak is
/// non-positive.
#[must_use]
pub fn compute_drawdown(equity: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if peak <= 0.0 { 0.0 } else { (peak - value) / peak }
        })
        .collect()
}

/// Thresholds and hysteresis for the exposure governor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Drawdown level that starts trimming exposure.
    pub dd_soft: f64,
    /// Drawdown level that cuts exposure to the floor.
    pub dd_hard: f64,
    /// Realized-volatility level that starts trimming exposure.
    pub vol_thresh: f64,
    /// Per-step exposure recovery in calm conditions.
    pub up_hysteresis: f64,
    /// Per-step exposure reduction in stressed conditions.
    pub down_hysteresis: f64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            dd_soft: 0.1,
            dd_hard: 0.2,
            vol_thresh: 0.25,
            up_hysteresis: 0.02,
            down_hysteresis: 0.02,
        }
    }
}

/// Per-point target exposure in `[0, 1]`.
///
/// Exposure drops to 0.1 at the hard drawdown, steps down toward 0.3 while
/// the soft drawdown or volatility threshold is breached, and recovers
/// toward 1.0 otherwise, one hysteresis step per period in either
/// direction.
#[must_use]
pub fn governor_signal(
    equity: &[f64],
    realized_vol: &[f64],
    config: &GovernorConfig,
) -> Vec<f64> {
    let drawdown = compute_drawdown(equity);
    let mut exposure = 1.0;
    drawdown
        .iter()
        .zip(realized_vol)
        .map(|(&dd, &vol)| {
            if dd >= config.dd_hard {
                exposure = 0.1;
            } else if dd >= config.dd_soft || vol >= config.vol_thresh {
                exposure = (exposure - config.down_hysteresis).max(0.3);
            } else {
                exposure = (exposure + config.up_hysteresis).min(1.0);
            }
            exposure
        })
        .collect()
}

/// Scale an exposure series by the governor signal, elementwise.
#[must_use]
pub fn apply_governor(exposures: &[f64], signal: &[f64]) -> Vec<f64> {
    exposures
        .iter()
        .zip(signal)
        .map(|(&w, &s)| w * s)
        .collect()
}
