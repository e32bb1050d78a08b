//! Run configuration for the weekly engines.

use crate::{CabareteError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for one weekly simulation run.
///
/// Constructed once per run and never mutated mid-simulation. Validate with
/// [`WeeklyParams::validate`] before handing to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyParams {
    /// Number of names selected into the portfolio.
    pub top_k: usize,
    /// Maximum absolute weight per name, in `(0, 1]`.
    pub name_cap: f64,
    /// Maximum absolute weight per sector, in `(0, 1]`.
    pub sector_cap: f64,
    /// Blend weight on the momentum factor.
    pub w_mom: f64,
    /// Blend weight on the revision-velocity factor.
    pub w_rev: f64,
    /// Blend weight on the quality factor.
    pub w_qual: f64,
    /// Flat weekly transaction-cost assumption in basis points,
    /// subtracted from the gross portfolio return.
    pub cost_bps_week: f64,
}

impl Default for WeeklyParams {
    fn default() -> Self {
        Self {
            top_k: 20,
            name_cap: 0.07,
            sector_cap: 0.30,
            w_mom: 0.5,
            w_rev: 0.3,
            w_qual: 0.2,
            cost_bps_week: 2.4,
        }
    }
}

impl WeeklyParams {
    /// Check the configuration invariants: caps in `(0, 1]`, `top_k >= 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CabareteError::InvalidInput`] describing the first
    /// violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(CabareteError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }
        if !(self.name_cap > 0.0 && self.name_cap <= 1.0) {
            return Err(CabareteError::InvalidInput(format!(
                "name_cap must be in (0, 1], got {}",
                self.name_cap
            )));
        }
        if !(self.sector_cap > 0.0 && self.sector_cap <= 1.0) {
            return Err(CabareteError::InvalidInput(format!(
                "sector_cap must be in (0, 1], got {}",
                self.sector_cap
            )));
        }
        Ok(())
    }
}
