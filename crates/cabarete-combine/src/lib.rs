#![forbid(unsafe_code)]

//! Adaptive IC-EMA factor weighting and regime gates.
//!
//! The weighting pass smooths each factor's historical IC with an EMA,
//! gates factors out of hostile regimes, and normalizes the survivors into
//! per-date blend weights with full attribution. It consumes the IC series
//! produced by the telemetry pass and feeds factor blend weights for
//! subsequent runs.

pub mod attribution;
pub mod gates;
pub mod ic_ema;
pub mod weighting;

pub use attribution::{AdaptiveConfig, FactorSummary, WeightingReport, adaptive_weighting};
pub use gates::{RegimeConfig, regime_gates};
pub use ic_ema::{ema_step, ic_ema_series};
pub use weighting::{apply_gates, clamp_and_normalize};
