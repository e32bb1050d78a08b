//! Statistical helpers shared across factors, neutralization, and metrics.

/// Minimum standard deviation treated as non-zero variance.
///
/// Groups or series below this threshold standardize to all zeros instead
/// of dividing by a near-zero value.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Mean of the finite values in a slice; NaN when none are finite.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        if v.is_finite() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sample standard deviation (n-1 denominator) of the finite values.
///
/// Returns 0.0 when fewer than two finite observations exist, matching the
/// degeneracy convention used by the ratio metrics.
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return 0.0;
    }
    let mu = finite.iter().sum::<f64>() / finite.len() as f64;
    let var = finite.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (finite.len() - 1) as f64;
    var.sqrt()
}

/// Z-score a slice against its own mean and sample standard deviation.
///
/// Low-variance input (std below [`MIN_STD_THRESHOLD`]) yields all zeros.
#[must_use]
pub fn zscores(values: &[f64]) -> Vec<f64> {
    let mu = mean(values);
    let sd = sample_std(values);
    if !mu.is_finite() || sd < MIN_STD_THRESHOLD {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mu) / sd).collect()
}
