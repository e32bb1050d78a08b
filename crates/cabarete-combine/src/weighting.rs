//! Factor weight normalization and gate application.

use std::collections::BTreeMap;

/// Clamp negative and non-finite scores to 0, then normalize to sum 1.
///
/// When no positive mass remains, every factor gets 0 rather than an
/// undefined division.
#[must_use]
pub fn clamp_and_normalize(scores: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let clamped: BTreeMap<String, f64> = scores
        .iter()
        .map(|(name, &value)| {
            let v = if value.is_finite() && value > 0.0 {
                value
            } else {
                0.0
            };
            (name.clone(), v)
        })
        .collect();

    let total: f64 = clamped.values().sum();
    if total > 0.0 {
        clamped
            .into_iter()
            .map(|(name, value)| (name, value / total))
            .collect()
    } else {
        clamped.into_iter().map(|(name, _)| (name, 0.0)).collect()
    }
}

/// Zero out weights whose gate is closed; open factors keep their weight.
///
/// Factors missing from the gate row default to open. No renormalization
/// happens here; the caller decides whether to re-spread the gated mass.
#[must_use]
pub fn apply_gates(
    weights: &BTreeMap<String, f64>,
    gates: &BTreeMap<String, bool>,
) -> BTreeMap<String, f64> {
    weights
        .iter()
        .map(|(name, &weight)| {
            let open = gates.get(name).copied().unwrap_or(true);
            (name.clone(), if open { weight } else { 0.0 })
        })
        .collect()
}
