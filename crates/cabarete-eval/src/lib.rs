#![forbid(unsafe_code)]

//! Performance metrics, IC telemetry, and walk-forward engines.
//!
//! The [`WalkForward`] scalar engine is the authoritative simulation; the
//! [`VectorizedWalkForward`] variant produces the same metrics contract
//! from array-based cross-sections with quantile top-K selection. Both are
//! driven through the [`Engine`](cabarete_traits::Engine) trait. The
//! metric and IC functions are pure and side-effect free.

pub mod backtest;
pub mod diagnostics;
pub mod ic;
pub mod ledger;
pub mod perf;
pub mod telemetry;
pub mod vectorized;
pub mod weekly;

pub use backtest::{WalkForward, portfolio_weights};
pub use diagnostics::{breadth, hhi, hit_rate, quintile_spread};
pub use ic::{IcSummary, ic_series, ic_summary, next_period_returns, spearman_ic};
pub use ledger::{MarginalRow, feature_marginals};
pub use perf::{
    WEEKS_PER_YEAR, align_series, alpha_beta, annualize_mean_std, cagr, deflated_sharpe,
    max_drawdown, sharpe, sortino,
};
pub use telemetry::{FactorTelemetry, factor_ic_telemetry};
pub use vectorized::VectorizedWalkForward;
pub use weekly::{WeeklyOutcome, run_weekly};
