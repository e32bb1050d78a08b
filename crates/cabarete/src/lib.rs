#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabarete/issues/")]
#![forbid(unsafe_code)]

//! # cabarete
//!
//! Factor-investing research toolkit: weekly alpha factors, sector-neutral
//! composites, capped long-only portfolios, and walk-forward simulation.
//!
//! cabarete is an umbrella crate that re-exports the toolkit's sub-crates
//! for convenience.
//!
//! ## Quick Start
//!
//! ```
//! use cabarete::{Engine, SectorMap, WeeklyBatch, WeeklyParams};
//! use cabarete::eval::WalkForward;
//!
//! # fn main() -> cabarete::Result<()> {
//! let batches: Vec<WeeklyBatch> = vec![WeeklyBatch::default()];
//! let sectors = SectorMap::default();
//!
//! let engine = WalkForward::new(WeeklyParams::default())?;
//! let report = engine.run(&batches, &sectors)?;
//! println!("Sharpe: {}", report.metrics.sharpe);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types and trait definitions ([`Factor`], [`Engine`])
//! - [`factors`] - Factor computation and sector neutralization
//! - [`portfolio`] - Ranking, weight caps, costs, and the governor
//! - [`eval`] - Metrics, IC telemetry, and the walk-forward engines
//! - [`combine`] - Adaptive IC-EMA factor weighting and regime gates
//! - [`store`] - Run registry, snapshots, and config hashing
//! - [`data`] - CSV adapters and the market-data client
//!
//! ## Architecture
//!
//! 1. **Factors** score each ticker from its raw time series
//! 2. **Neutralization** standardizes scores against sector peers
//! 3. **Portfolio construction** ranks, selects top-K, and applies caps
//! 4. **Engines** walk the batch sequence forward and compound equity
//! 5. **Telemetry and weighting** track factor ICs and adapt the blend

/// Version information for the cabarete crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core types and trait definitions.
pub mod traits {
    pub use cabarete_traits::*;
}

/// Factor computation and sector neutralization.
pub mod factors {
    pub use cabarete_factors::*;
}

/// Ranking, weight constraints, costs, and the drawdown governor.
pub mod portfolio {
    pub use cabarete_portfolio::*;
}

/// Performance metrics, IC telemetry, and the walk-forward engines.
pub mod eval {
    pub use cabarete_eval::*;
}

/// Adaptive IC-EMA factor weighting and regime gates.
pub mod combine {
    pub use cabarete_combine::*;
}

/// Run registry, snapshot persistence, and config hashing.
pub mod store {
    pub use cabarete_store::*;
}

/// CSV adapters, batch assembly, and the market-data client.
pub mod data {
    pub use cabarete_data::*;
}

// Re-export the core surface at the top level for convenience.
pub use cabarete_traits::{
    BacktestMetrics, BacktestReport, CabareteError, Date, Engine, Factor, FactorStyle,
    Fundamentals, Panel, Result, SectorMap, Ticker, UNKNOWN_SECTOR, WeeklyBatch, WeeklyParams,
};

/// Commonly used items in one import.
pub mod prelude {
    pub use crate::{
        BacktestMetrics, BacktestReport, CabareteError, Date, Engine, Factor, FactorStyle,
        Fundamentals, Panel, Result, SectorMap, Ticker, WeeklyBatch, WeeklyParams,
    };
    pub use cabarete_eval::{VectorizedWalkForward, WalkForward, run_weekly};
    pub use cabarete_factors::CompositeBlend;
}
