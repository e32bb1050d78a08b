//! Per-name and per-sector weight caps.

use cabarete_traits::{SectorMap, Ticker};
use std::collections::BTreeMap;

const REDISTRIBUTION_EPS: f64 = 1e-12;

/// Clip each weight to `[-cap, cap]` and restore full deployment when
/// capacity allows.
///
/// After clipping, if total absolute weight exceeds 1 everything is scaled
/// down to sum to exactly 1. If it falls short, the shortfall is
/// redistributed proportionally among names that still have capacity under
/// the cap, respecting each name's sign, iterating until either the
/// shortfall is exhausted or no capacity remains. The loop terminates
/// because remaining capacity strictly shrinks on every pass.
#[must_use]
pub fn cap_by_name(weights: &BTreeMap<Ticker, f64>, cap: f64) -> BTreeMap<Ticker, f64> {
    let mut clipped: BTreeMap<Ticker, f64> = weights
        .iter()
        .map(|(t, &w)| (t.clone(), w.clamp(-cap, cap)))
        .collect();

    let total: f64 = clipped.values().map(|v| v.abs()).sum();
    if total == 0.0 {
        return clipped.keys().map(|t| (t.clone(), 0.0)).collect();
    }
    if total >= 1.0 {
        return clipped.iter().map(|(t, v)| (t.clone(), v / total)).collect();
    }

    let mut capacities: BTreeMap<Ticker, f64> = clipped
        .iter()
        .map(|(t, v)| (t.clone(), (cap - v.abs()).max(0.0)))
        .collect();
    let signs: BTreeMap<Ticker, f64> = clipped
        .iter()
        .map(|(t, &v)| {
            let sign = if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                // Zero after clipping: fall back to the original sign so a
                // name clipped to zero still knows its direction.
                let orig = weights.get(t).copied().unwrap_or(0.0);
                if orig > 0.0 {
                    1.0
                } else if orig < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            };
            (t.clone(), sign)
        })
        .collect();

    let mut leftover = 1.0 - total;
    while leftover > REDISTRIBUTION_EPS {
        let available: Vec<Ticker> = capacities
            .iter()
            .filter_map(|(ticker, &cap_left)| {
                (cap_left > REDISTRIBUTION_EPS && signs[ticker] != 0.0)
                    .then(|| ticker.clone())
            })
            .collect();
        if available.is_empty() {
            break;
        }
        let share = leftover / available.len() as f64;
        let mut progressed = false;
        for ticker in available {
            let delta = capacities[&ticker].min(share);
            if delta <= 0.0 {
                continue;
            }
            *clipped.get_mut(&ticker).unwrap() += signs[&ticker] * delta;
            *capacities.get_mut(&ticker).unwrap() -= delta;
            leftover -= delta;
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    let total: f64 = clipped.values().map(|v| v.abs()).sum();
    if total == 0.0 {
        return clipped.keys().map(|t| (t.clone(), 0.0)).collect();
    }
    if total >= 1.0 {
        return clipped.iter().map(|(t, v)| (t.clone(), v / total)).collect();
    }
    clipped
}

/// Scale down any sector whose aggregate absolute weight exceeds `cap`.
///
/// Every member of an over-cap sector is scaled by `cap / sector_sum`.
/// Afterwards the book is renormalized globally only if total absolute
/// weight exceeds 1; exposure lost to a sector cap is never scaled back
/// up.
#[must_use]
pub fn cap_by_sector(
    weights: &BTreeMap<Ticker, f64>,
    sectors: &SectorMap,
    cap: f64,
) -> BTreeMap<Ticker, f64> {
    let mut sector_sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (ticker, &weight) in weights {
        *sector_sums.entry(sectors.sector_of(ticker)).or_insert(0.0) += weight.abs();
    }

    let scaled: BTreeMap<Ticker, f64> = weights
        .iter()
        .map(|(ticker, &weight)| {
            let sum = sector_sums[sectors.sector_of(ticker)];
            let w = if sum > cap && sum > 0.0 {
                weight * (cap / sum)
            } else {
                weight
            };
            (ticker.clone(), w)
        })
        .collect();

    let total: f64 = scaled.values().map(|v| v.abs()).sum();
    if total == 0.0 {
        return scaled.keys().map(|t| (t.clone(), 0.0)).collect();
    }
    if total > 1.0 {
        return scaled.iter().map(|(t, v)| (t.clone(), v / total)).collect();
    }
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weights_of(pairs: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        pairs.iter().map(|(t, v)| (t.to_string(), *v)).collect()
    }

    fn sectors_of(pairs: &[(&str, &str)]) -> SectorMap {
        pairs
            .iter()
            .map(|(t, s)| (t.to_string(), s.to_string()))
            .collect()
    }

    fn abs_sum(weights: &BTreeMap<Ticker, f64>) -> f64 {
        weights.values().map(|v| v.abs()).sum()
    }

    #[test]
    fn test_name_cap_holds_and_renormalizes() {
        let capped = cap_by_name(&weights_of(&[("A", 0.9), ("B", 0.1)]), 0.5);
        assert!(capped.values().all(|v| v.abs() <= 0.5 + 1e-12));
        assert_relative_eq!(abs_sum(&capped), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_name_cap_redistributes_shortfall() {
        // Equal weights clipped from 0.5 to 0.3 leave a 0.4 shortfall that
        // cannot be absorbed: both names are already at the cap.
        let capped = cap_by_name(&weights_of(&[("A", 0.5), ("B", 0.5)]), 0.3);
        assert_relative_eq!(capped["A"], 0.3, epsilon = 1e-12);
        assert_relative_eq!(capped["B"], 0.3, epsilon = 1e-12);

        // With a third name under the cap, the shortfall flows to it.
        let capped = cap_by_name(&weights_of(&[("A", 0.5), ("B", 0.4), ("C", 0.1)]), 0.4);
        assert!(capped.values().all(|v| v.abs() <= 0.4 + 1e-12));
        assert_relative_eq!(abs_sum(&capped), 1.0, epsilon = 1e-9);
        assert!(capped["C"] > 0.1);
    }

    #[test]
    fn test_name_cap_respects_sign() {
        let capped = cap_by_name(&weights_of(&[("A", 0.7), ("B", -0.5)]), 0.4);
        assert!(capped["A"] > 0.0);
        assert!(capped["B"] < 0.0);
        assert!(capped.values().all(|v| v.abs() <= 0.4 + 1e-12));
    }

    #[test]
    fn test_name_cap_all_zero() {
        let capped = cap_by_name(&weights_of(&[("A", 0.0), ("B", 0.0)]), 0.5);
        assert!(capped.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sector_cap_limits_exposure() {
        let weights = weights_of(&[("A", 0.6), ("B", 0.4), ("C", 0.0)]);
        let sectors = sectors_of(&[("A", "S1"), ("B", "S1"), ("C", "S2")]);
        let capped = cap_by_sector(&weights, &sectors, 0.7);
        let s1 = capped["A"].abs() + capped["B"].abs();
        assert!(s1 <= 0.7 + 1e-12);
    }

    #[test]
    fn test_sector_cap_never_scales_up() {
        let weights = weights_of(&[("A", 0.5), ("B", 0.3), ("C", 0.2)]);
        let sectors = sectors_of(&[("A", "S1"), ("B", "S1"), ("C", "S2")]);
        let capped = cap_by_sector(&weights, &sectors, 0.4);
        // S1 scaled from 0.8 to 0.4; total drops below 1 and stays there.
        assert!(abs_sum(&capped) < 1.0);
        assert_relative_eq!(capped["C"], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_sector_cap_unknown_sector_grouped() {
        let weights = weights_of(&[("A", 0.6), ("B", 0.4)]);
        let sectors = SectorMap::default();
        let capped = cap_by_sector(&weights, &sectors, 0.5);
        // Both fall into UNK, which is over the cap and gets scaled.
        assert!(abs_sum(&capped) <= 0.5 + 1e-12);
    }

    #[test]
    fn test_both_caps_hold_simultaneously() {
        let weights = weights_of(&[("A", 0.4), ("B", 0.3), ("C", 0.2), ("D", 0.1)]);
        let sectors = sectors_of(&[("A", "S1"), ("B", "S1"), ("C", "S2"), ("D", "S2")]);
        let capped = cap_by_sector(&cap_by_name(&weights, 0.25), &sectors, 0.45);

        assert!(capped.values().all(|v| v.abs() <= 0.25 + 1e-9));
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for (t, w) in &capped {
            *sums.entry(sectors.sector_of(t)).or_insert(0.0) += w.abs();
        }
        assert!(sums.values().all(|&s| s <= 0.45 + 1e-9));
    }
}
