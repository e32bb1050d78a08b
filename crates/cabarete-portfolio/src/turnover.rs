//! Portfolio turnover.

use cabarete_traits::Ticker;
use std::collections::{BTreeMap, BTreeSet};

/// Turnover between two consecutive weight books: half the sum of absolute
/// weight changes over the union of their tickers.
///
/// Symmetric, non-negative, and zero for identical books. Tickers present
/// in only one book count their full weight as a change.
#[must_use]
pub fn turnover(prev: &BTreeMap<Ticker, f64>, curr: &BTreeMap<Ticker, f64>) -> f64 {
    let tickers: BTreeSet<&Ticker> = prev.keys().chain(curr.keys()).collect();
    let change: f64 = tickers
        .into_iter()
        .map(|t| {
            let before = prev.get(t).copied().unwrap_or(0.0);
            let after = curr.get(t).copied().unwrap_or(0.0);
            (after - before).abs()
        })
        .sum();
    0.5 * change
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weights_of(pairs: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        pairs.iter().map(|(t, v)| (t.to_string(), *v)).collect()
    }

    #[test]
    fn test_identity_is_zero() {
        let w = weights_of(&[("A", 0.5), ("B", 0.5)]);
        assert_eq!(turnover(&w, &w), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = weights_of(&[("A", 0.5), ("B", 0.3), ("C", 0.2)]);
        let b = weights_of(&[("A", 0.4), ("B", 0.4), ("D", 0.2)]);
        assert_relative_eq!(turnover(&a, &b), turnover(&b, &a), epsilon = 1e-12);
        assert!(turnover(&a, &b) > 0.0);
    }

    #[test]
    fn test_full_replacement() {
        let a = weights_of(&[("A", 1.0)]);
        let b = weights_of(&[("B", 1.0)]);
        assert_relative_eq!(turnover(&a, &b), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_shift() {
        let a = weights_of(&[("A", 0.5), ("B", 0.3), ("C", 0.2)]);
        let b = weights_of(&[("A", 0.4), ("B", 0.4), ("C", 0.2)]);
        assert_relative_eq!(turnover(&a, &b), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_from_empty_book() {
        let b = weights_of(&[("A", 0.6), ("B", 0.4)]);
        assert_relative_eq!(turnover(&BTreeMap::new(), &b), 0.5, epsilon = 1e-12);
    }
}
