//! Percentile ranking and top-K selection.

use cabarete_traits::Ticker;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Percentile rank of each ticker's score, ascending.
///
/// The lowest score maps to `1/n` and the highest to `1.0`. The sort is
/// stable, so ties keep the input map's iteration order rather than
/// receiving averaged ranks.
#[must_use]
pub fn percentile_rank(scores: &BTreeMap<Ticker, f64>) -> BTreeMap<Ticker, f64> {
    let mut items: Vec<(&Ticker, f64)> = scores.iter().map(|(t, &v)| (t, v)).collect();
    if items.is_empty() {
        return BTreeMap::new();
    }
    items.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    let n = items.len() as f64;
    items
        .into_iter()
        .enumerate()
        .map(|(idx, (ticker, _))| (ticker.clone(), (idx + 1) as f64 / n))
        .collect()
}

/// Equal-weight the `k` highest-ranked names.
///
/// `k` is clamped to at least 1; a universe smaller than `k` selects every
/// available name. Each selected name receives `1 / k_selected`.
#[must_use]
pub fn select_top_k(ranked: &BTreeMap<Ticker, f64>, k: usize) -> BTreeMap<Ticker, f64> {
    let k = k.max(1);
    let mut items: Vec<(&Ticker, f64)> = ranked.iter().map(|(t, &v)| (t, v)).collect();
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    items.truncate(k);
    if items.is_empty() {
        return BTreeMap::new();
    }
    let weight = 1.0 / items.len() as f64;
    items
        .into_iter()
        .map(|(ticker, _)| (ticker.clone(), weight))
        .collect()
}
