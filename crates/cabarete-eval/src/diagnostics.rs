//! Cross-sectional signal diagnostics.

use cabarete_traits::Ticker;
use std::collections::BTreeMap;

/// Fraction of tickers where the predicted sign matched the realized sign.
///
/// Computed over the key intersection; zero-products (either side exactly
/// 0) count as misses. Returns 0.0 when no keys overlap.
#[must_use]
pub fn hit_rate(
    predicted: &BTreeMap<Ticker, f64>,
    realized: &BTreeMap<Ticker, f64>,
) -> f64 {
    let mut hits = 0usize;
    let mut total = 0usize;
    for (ticker, &p) in predicted {
        if let Some(&r) = realized.get(ticker) {
            total += 1;
            if p * r > 0.0 {
                hits += 1;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Mean next-period return of the top factor bucket minus the bottom one.
///
/// Tickers are sorted by factor score and split into `q` buckets of
/// `n / q` names; returns 0.0 when the overlap is smaller than `q` or
/// `q <= 1`.
#[must_use]
pub fn quintile_spread(
    factor: &BTreeMap<Ticker, f64>,
    next_returns: &BTreeMap<Ticker, f64>,
    q: usize,
) -> f64 {
    let mut keys: Vec<&Ticker> = factor
        .keys()
        .filter(|t| next_returns.contains_key(*t))
        .collect();
    if keys.len() < q || q <= 1 {
        return 0.0;
    }
    keys.sort_by(|a, b| {
        factor[*a]
            .partial_cmp(&factor[*b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let bucket = keys.len() / q;
    if bucket == 0 {
        return 0.0;
    }
    let low: f64 = keys[..bucket].iter().map(|t| next_returns[*t]).sum::<f64>() / bucket as f64;
    let high: f64 = keys[keys.len() - bucket..]
        .iter()
        .map(|t| next_returns[*t])
        .sum::<f64>()
        / bucket as f64;
    high - low
}

/// Number of names with non-zero weight.
#[must_use]
pub fn breadth(weights: &BTreeMap<Ticker, f64>) -> usize {
    weights.values().filter(|w| w.abs() > 0.0).count()
}

/// Herfindahl-Hirschman concentration of absolute weights.
///
/// 1/n for an equal-weight book of n names, approaching 1.0 as the book
/// concentrates into a single name. An empty or all-zero book yields 0.
#[must_use]
pub fn hhi(weights: &BTreeMap<Ticker, f64>) -> f64 {
    let total: f64 = weights.values().map(|w| w.abs()).sum();
    if total == 0.0 {
        return 0.0;
    }
    weights
        .values()
        .map(|w| (w.abs() / total).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn map_of(pairs: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        pairs.iter().map(|(t, v)| (t.to_string(), *v)).collect()
    }

    #[test]
    fn test_hit_rate() {
        let predicted = map_of(&[("A", 1.0), ("B", -1.0), ("C", 1.0), ("D", 1.0)]);
        let realized = map_of(&[("A", 0.02), ("B", -0.01), ("C", -0.03), ("D", 0.0)]);
        // A and B hit; C misses; D's zero return is not a hit.
        assert_relative_eq!(hit_rate(&predicted, &realized), 0.5);
    }

    #[test]
    fn test_hit_rate_no_overlap() {
        let predicted = map_of(&[("A", 1.0)]);
        let realized = map_of(&[("Z", 1.0)]);
        assert_eq!(hit_rate(&predicted, &realized), 0.0);
    }

    #[test]
    fn test_quintile_spread_orders_buckets() {
        // 10 names, scores 0..9, returns proportional to score.
        let factor: BTreeMap<Ticker, f64> =
            (0..10).map(|i| (format!("T{i:02}"), i as f64)).collect();
        let returns: BTreeMap<Ticker, f64> = (0..10)
            .map(|i| (format!("T{i:02}"), 0.01 * i as f64))
            .collect();
        let spread = quintile_spread(&factor, &returns, 5);
        // Top bucket {8,9} vs bottom bucket {0,1}: 0.085 - 0.005.
        assert_relative_eq!(spread, 0.08, epsilon = 1e-12);
    }

    #[test]
    fn test_quintile_spread_degenerate() {
        let factor = map_of(&[("A", 1.0), ("B", 2.0)]);
        let returns = map_of(&[("A", 0.01), ("B", 0.02)]);
        assert_eq!(quintile_spread(&factor, &returns, 5), 0.0);
        assert_eq!(quintile_spread(&factor, &returns, 1), 0.0);
    }

    #[test]
    fn test_breadth() {
        let weights = map_of(&[("A", 0.5), ("B", 0.0), ("C", -0.5)]);
        assert_eq!(breadth(&weights), 2);
        assert_eq!(breadth(&BTreeMap::new()), 0);
    }

    #[test]
    fn test_hhi_equal_weight() {
        let weights = map_of(&[("A", 0.25), ("B", 0.25), ("C", 0.25), ("D", 0.25)]);
        assert_relative_eq!(hhi(&weights), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_hhi_concentrated() {
        let weights = map_of(&[("A", 1.0)]);
        assert_relative_eq!(hhi(&weights), 1.0, epsilon = 1e-12);
        assert_eq!(hhi(&BTreeMap::new()), 0.0);
    }
}
