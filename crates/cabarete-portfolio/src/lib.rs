#![forbid(unsafe_code)]

//! Ranking, weight constraints, and transaction-cost modelling.
//!
//! The construction pipeline runs percentile ranking, top-K equal-weight
//! selection, the per-name cap with shortfall redistribution, and the
//! per-sector cap, in that order. The cost model and drawdown governor are
//! independent of the main weight/return loop and serve deeper analysis.

pub mod constraints;
pub mod costs;
pub mod governor;
pub mod rank;
pub mod turnover;

pub use constraints::{cap_by_name, cap_by_sector};
pub use costs::{CostDiagnostics, CostParams, CostRow, estimate_costs};
pub use governor::{GovernorConfig, apply_governor, compute_drawdown, governor_signal};
pub use rank::{percentile_rank, select_top_k};
pub use turnover::turnover;
