//! Date-indexed panel factor library.
//!
//! These factors operate on wide-by-date panels (`date -> ticker -> value`)
//! and power the IC telemetry pass: each produces a cross-sectionally
//! standardized score panel that can be correlated against next-period
//! returns date by date. The batch factors in the sibling modules score a
//! single rebalance step; these score every date of a history at once.

use cabarete_traits::{Date, FactorStyle, Fundamentals, Panel, Ticker, stats};
use std::collections::{BTreeMap, BTreeSet};

/// A named panel factor with its regime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelFactor {
    /// 12-month momentum skipping the most recent week.
    Mom12_1,
    /// OLS slope of the 12-week normalized price window.
    MomVelocity,
    /// Short-minus-long EPS estimate revision.
    EpsRevision4_12,
    /// Fundamental quality broadcast across dates.
    QualityQ,
    /// Negated 26-week realized volatility.
    LowVol26w,
}

impl PanelFactor {
    /// All library factors.
    pub const ALL: [Self; 5] = [
        Self::Mom12_1,
        Self::MomVelocity,
        Self::EpsRevision4_12,
        Self::QualityQ,
        Self::LowVol26w,
    ];

    /// Stable identifier used in artifact paths and CLI arguments.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mom12_1 => "mom_12_1",
            Self::MomVelocity => "mom_velocity",
            Self::EpsRevision4_12 => "eps_revision_4_12",
            Self::QualityQ => "quality_q",
            Self::LowVol26w => "low_vol_26w",
        }
    }

    /// Regime-gate classification of this factor.
    #[must_use]
    pub const fn style(&self) -> FactorStyle {
        match self {
            Self::Mom12_1 | Self::MomVelocity => FactorStyle::Momentum,
            Self::EpsRevision4_12 => FactorStyle::Neutral,
            Self::QualityQ | Self::LowVol26w => FactorStyle::Defensive,
        }
    }

    /// Look up a factor by its identifier.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Compute the standardized score panel for this factor.
    ///
    /// Price-driven factors read `prices`, the revision factor reads `eps`,
    /// and the quality factor broadcasts `fundamentals` across the price
    /// panel's dates.
    #[must_use]
    pub fn compute(
        &self,
        prices: &Panel,
        eps: &Panel,
        fundamentals: &BTreeMap<Ticker, Fundamentals>,
    ) -> Panel {
        match self {
            Self::Mom12_1 => mom_12_1(prices),
            Self::MomVelocity => mom_velocity(prices),
            Self::EpsRevision4_12 => eps_revision_4_12(eps),
            Self::QualityQ => quality_q(fundamentals, prices),
            Self::LowVol26w => low_vol_26w(prices),
        }
    }
}

fn panel_universe(panel: &Panel) -> BTreeSet<Ticker> {
    panel
        .values()
        .flat_map(|row| row.keys().cloned())
        .collect()
}

/// Cross-sectional z-score applied per date row.
///
/// Rows whose values have ~zero variance (including single-ticker rows)
/// standardize to zeros.
#[must_use]
pub fn standardize_by_date(panel: &Panel) -> Panel {
    panel
        .iter()
        .map(|(date, row)| {
            let tickers: Vec<&Ticker> = row.keys().collect();
            let values: Vec<f64> = row.values().copied().collect();
            let z = stats::zscores(&values);
            let standardized = tickers
                .into_iter()
                .zip(z)
                .map(|(t, v)| (t.clone(), v))
                .collect();
            (*date, standardized)
        })
        .collect()
}

/// 12-1 momentum: `px(t-1) / px(t-52) - 1` at each date, skipping the most
/// recent week to avoid short-term reversal.
#[must_use]
pub fn mom_12_1(prices: &Panel) -> Panel {
    let dates: Vec<Date> = prices.keys().copied().collect();
    let rows: Vec<&BTreeMap<Ticker, f64>> = prices.values().collect();
    let universe = panel_universe(prices);

    let mut out = Panel::new();
    for (i, date) in dates.iter().enumerate() {
        let mut row = BTreeMap::new();
        if i >= 52 {
            for ticker in &universe {
                if let (Some(&prev), Some(&base)) =
                    (rows[i - 1].get(ticker), rows[i - 52].get(ticker))
                {
                    if base != 0.0 {
                        row.insert(ticker.clone(), prev / base - 1.0);
                    }
                }
            }
        }
        out.insert(*date, row);
    }
    standardize_by_date(&out)
}

/// OLS slope of the 12-point normalized price window against time.
///
/// Windows with any missing observation are skipped for that ticker.
#[must_use]
pub fn mom_velocity(prices: &Panel) -> Panel {
    const WINDOW: usize = 12;
    let dates: Vec<Date> = prices.keys().copied().collect();
    let rows: Vec<&BTreeMap<Ticker, f64>> = prices.values().collect();
    let universe = panel_universe(prices);

    let mut out = Panel::new();
    for (i, date) in dates.iter().enumerate() {
        let mut row = BTreeMap::new();
        if i + 1 >= WINDOW {
            for ticker in &universe {
                let window: Vec<f64> = (i + 1 - WINDOW..=i)
                    .filter_map(|j| rows[j].get(ticker).copied())
                    .collect();
                if window.len() == WINDOW {
                    row.insert(ticker.clone(), window_slope(&window));
                }
            }
        }
        out.insert(*date, row);
    }
    standardize_by_date(&out)
}

fn window_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = stats::mean(values);
    let y_std = match stats::sample_std(values) {
        s if s < stats::MIN_STD_THRESHOLD => 1.0,
        s => s,
    };

    let mut num = 0.0;
    let mut denom = 0.0;
    for (idx, &value) in values.iter().enumerate() {
        let x = idx as f64 - x_mean;
        let y = (value - y_mean) / y_std;
        num += x * y;
        denom += x * x;
    }
    if denom == 0.0 { 0.0 } else { num / denom }
}

/// EPS revision: short-horizon change minus long-horizon change,
/// `(eps_t - eps_{t-4}) - (eps_t - eps_{t-12})` per date.
#[must_use]
pub fn eps_revision_4_12(eps: &Panel) -> Panel {
    let dates: Vec<Date> = eps.keys().copied().collect();
    let rows: Vec<&BTreeMap<Ticker, f64>> = eps.values().collect();
    let universe = panel_universe(eps);

    let mut out = Panel::new();
    for (i, date) in dates.iter().enumerate() {
        let mut row = BTreeMap::new();
        if i >= 12 {
            for ticker in &universe {
                if let (Some(&now), Some(&short), Some(&long)) = (
                    rows[i].get(ticker),
                    rows[i - 4].get(ticker),
                    rows[i - 12].get(ticker),
                ) {
                    row.insert(ticker.clone(), (now - short) - (now - long));
                }
            }
        }
        out.insert(*date, row);
    }
    standardize_by_date(&out)
}

/// Cross-sectional quality score broadcast across the price panel's dates:
/// `q = gpm - 0.5 * accruals - 0.5 * leverage`.
#[must_use]
pub fn quality_q(fundamentals: &BTreeMap<Ticker, Fundamentals>, prices: &Panel) -> Panel {
    let universe = panel_universe(prices);
    let base: BTreeMap<Ticker, f64> = universe
        .into_iter()
        .map(|ticker| {
            let funda = fundamentals.get(&ticker).copied().unwrap_or_default();
            let q = funda.gpm - 0.5 * funda.accruals - 0.5 * funda.leverage;
            (ticker, q)
        })
        .collect();

    let out: Panel = prices.keys().map(|date| (*date, base.clone())).collect();
    standardize_by_date(&out)
}

/// Negated 26-week realized volatility of period returns.
#[must_use]
pub fn low_vol_26w(prices: &Panel) -> Panel {
    const WINDOW: usize = 26;
    let dates: Vec<Date> = prices.keys().copied().collect();
    let rows: Vec<&BTreeMap<Ticker, f64>> = prices.values().collect();
    let universe = panel_universe(prices);

    // Period-over-period returns aligned to the later date.
    let mut returns: Vec<BTreeMap<&Ticker, f64>> = Vec::with_capacity(dates.len());
    for i in 0..dates.len() {
        let mut row = BTreeMap::new();
        if i >= 1 {
            for ticker in &universe {
                if let (Some(&prev), Some(&now)) = (rows[i - 1].get(ticker), rows[i].get(ticker)) {
                    if prev != 0.0 {
                        row.insert(ticker, now / prev - 1.0);
                    }
                }
            }
        }
        returns.push(row);
    }

    let mut out = Panel::new();
    for (i, date) in dates.iter().enumerate() {
        let mut row = BTreeMap::new();
        if i >= WINDOW {
            for ticker in &universe {
                let window: Vec<f64> = (i + 1 - WINDOW..=i)
                    .filter_map(|j| returns[j].get(ticker).copied())
                    .collect();
                if window.len() == WINDOW {
                    row.insert(ticker.clone(), -stats::sample_std(&window));
                }
            }
        }
        out.insert(*date, row);
    }
    standardize_by_date(&out)
}
