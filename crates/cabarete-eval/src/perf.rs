//! Performance metrics on weekly return series.
//!
//! Degeneracy conventions: a zero-volatility series with positive mean
//! excess return has infinite Sharpe/Sortino, a zero-volatility series
//! with non-positive mean has 0; beta is NaN when the benchmark has no
//! variance. Callers detect degeneracy by inspecting the metric values;
//! these functions never error.

use cabarete_portfolio::compute_drawdown;
use cabarete_traits::stats::{mean, sample_std};

/// Weekly periods per year used for annualization.
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Positionally align two return series, dropping pairs where either value
/// is non-finite.
#[must_use]
pub fn align_series(a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut out_a = Vec::with_capacity(a.len().min(b.len()));
    let mut out_b = Vec::with_capacity(a.len().min(b.len()));
    for (&x, &y) in a.iter().zip(b) {
        if x.is_finite() && y.is_finite() {
            out_a.push(x);
            out_b.push(y);
        }
    }
    (out_a, out_b)
}

/// Annualized mean and standard deviation of a weekly return series.
///
/// Returns `(NaN, NaN)` for an empty series.
#[must_use]
pub fn annualize_mean_std(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let mu = mean(returns);
    if mu.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    (mu * WEEKS_PER_YEAR, sample_std(returns) * WEEKS_PER_YEAR.sqrt())
}

/// Annualized Sharpe ratio of weekly returns against a flat risk-free rate.
#[must_use]
pub fn sharpe(returns: &[f64], risk_free: f64) -> f64 {
    let excess: Vec<f64> = returns
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v - risk_free)
        .collect();
    if excess.is_empty() {
        return f64::NAN;
    }
    let std = sample_std(&excess);
    if std == 0.0 {
        return if mean(&excess) > 0.0 { f64::INFINITY } else { 0.0 };
    }
    mean(&excess) / std * WEEKS_PER_YEAR.sqrt()
}

/// Annualized Sortino ratio: mean excess return over downside deviation.
#[must_use]
pub fn sortino(returns: &[f64], risk_free: f64) -> f64 {
    let excess: Vec<f64> = returns
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v - risk_free)
        .collect();
    if excess.is_empty() {
        return f64::NAN;
    }
    let downside: Vec<f64> = excess.iter().map(|&v| v.min(0.0)).collect();
    let downside_std = sample_std(&downside);
    if downside_std == 0.0 {
        return if mean(&excess) > 0.0 { f64::INFINITY } else { 0.0 };
    }
    mean(&excess) / downside_std * WEEKS_PER_YEAR.sqrt()
}

/// Weekly alpha and beta from closed-form OLS against a benchmark series.
///
/// Series are positionally aligned with non-finite pairs dropped first.
/// Returns `(NaN, NaN)` with fewer than two aligned observations or when
/// the benchmark variance is zero.
#[must_use]
pub fn alpha_beta(returns: &[f64], benchmark: &[f64]) -> (f64, f64) {
    let (r, b) = align_series(returns, benchmark);
    let n = r.len();
    if n < 2 {
        return (f64::NAN, f64::NAN);
    }
    let mean_r = mean(&r);
    let mean_b = mean(&b);
    let cov: f64 = r
        .iter()
        .zip(&b)
        .map(|(x, y)| (x - mean_r) * (y - mean_b))
        .sum::<f64>()
        / (n - 1) as f64;
    let var_b: f64 = b.iter().map(|y| (y - mean_b).powi(2)).sum::<f64>() / (n - 1) as f64;
    if var_b == 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let beta = cov / var_b;
    let alpha = mean_r - beta * mean_b;
    (alpha, beta)
}

/// Compound annual growth rate of an equity path.
///
/// NaN for fewer than two points or a non-positive total return ratio.
#[must_use]
pub fn cagr(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return f64::NAN;
    }
    let total = equity[equity.len() - 1] / equity[0];
    if !(total > 0.0) {
        return f64::NAN;
    }
    let periods = (equity.len() - 1) as f64;
    total.powf(WEEKS_PER_YEAR / periods) - 1.0
}

/// Maximum drawdown of an equity path; NaN for an empty path.
#[must_use]
pub fn max_drawdown(equity: &[f64]) -> f64 {
    if equity.is_empty() {
        return f64::NAN;
    }
    compute_drawdown(equity)
        .into_iter()
        .fold(0.0_f64, f64::max)
}

/// Deflated Sharpe ratio following Lopez de Prado.
///
/// Corrects an observed annualized Sharpe for sample size, lag-1
/// autocorrelation (AR(1) effective-sample-size shrinkage), and the number
/// of strategy variants tried, returning a probability-like score in
/// `[0, 1]`. NaN for degenerate inputs: `m < 1`, `n <= 1`, non-finite
/// Sharpe, `|autocorr| >= 1`, or a collapsed effective sample.
#[must_use]
pub fn deflated_sharpe(observed_sharpe: f64, n: usize, m: usize, autocorr: f64) -> f64 {
    if m < 1 || n <= 1 || !observed_sharpe.is_finite() || autocorr.abs() >= 1.0 {
        return f64::NAN;
    }

    let n_eff = n as f64 * (1.0 - autocorr) / (1.0 + autocorr);
    if n_eff <= 1.0 {
        return f64::NAN;
    }

    let se = ((1.0 + 0.5 * observed_sharpe.powi(2)) / (n_eff - 1.0)).sqrt();

    let bias = if m > 1 {
        se * (2.0 * (m as f64).ln()).sqrt()
    } else {
        0.0
    };

    let z = if se == 0.0 { 0.0 } else { (observed_sharpe - bias) / se };
    normal_cdf(z)
}

/// Standard normal CDF via the erf identity.
fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz & Stegun 7.1.26 rational approximation, |error| < 1.5e-7.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}
