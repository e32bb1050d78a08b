//! Sector-relative standardization.

use cabarete_traits::{SectorMap, Ticker, stats};
use std::collections::BTreeMap;

/// Z-score each ticker's value against its sector peers.
///
/// For every sector group with at least two members, output
/// `(x - mean) / std` using the sample standard deviation (n-1). Groups
/// with fewer than two members, or with ~zero variance, yield 0 for all of
/// their members: defined degeneracy, not an error. Tickers missing from
/// the sector map are grouped under the `"UNK"` sentinel and neutralized
/// among themselves.
///
/// This removes each sector's mean level before ranking, so no sector can
/// bias the cross-sectional comparison.
#[must_use]
pub fn sector_zscore(
    scores: &BTreeMap<Ticker, f64>,
    sectors: &SectorMap,
) -> BTreeMap<Ticker, f64> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (ticker, &score) in scores {
        groups.entry(sectors.sector_of(ticker)).or_default().push(score);
    }

    let group_stats: BTreeMap<&str, (f64, f64)> = groups
        .into_iter()
        .map(|(sector, values)| {
            if values.len() < 2 {
                (sector, (0.0, 0.0))
            } else {
                (sector, (stats::mean(&values), stats::sample_std(&values)))
            }
        })
        .collect();

    scores
        .iter()
        .map(|(ticker, &score)| {
            let (mean, std) = group_stats[sectors.sector_of(ticker)];
            let z = if std < stats::MIN_STD_THRESHOLD {
                0.0
            } else {
                (score - mean) / std
            };
            (ticker.clone(), z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scores_of(pairs: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        pairs.iter().map(|(t, v)| (t.to_string(), *v)).collect()
    }

    fn sectors_of(pairs: &[(&str, &str)]) -> SectorMap {
        pairs
            .iter()
            .map(|(t, s)| (t.to_string(), s.to_string()))
            .collect()
    }

    #[test]
    fn test_sector_means_are_zero() {
        let scores = scores_of(&[("A", 1.0), ("B", 2.0), ("C", 3.0), ("D", 10.0), ("E", 20.0)]);
        let sectors = sectors_of(&[
            ("A", "Tech"),
            ("B", "Tech"),
            ("C", "Tech"),
            ("D", "Fin"),
            ("E", "Fin"),
        ]);
        let z = sector_zscore(&scores, &sectors);

        let tech_mean = (z["A"] + z["B"] + z["C"]) / 3.0;
        let fin_mean = (z["D"] + z["E"]) / 2.0;
        assert_relative_eq!(tech_mean, 0.0, epsilon = 1e-10);
        assert_relative_eq!(fin_mean, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_singleton_sector_scores_zero() {
        let scores = scores_of(&[("A", 5.0), ("B", 1.0), ("C", 2.0)]);
        let sectors = sectors_of(&[("A", "Solo"), ("B", "Pair"), ("C", "Pair")]);
        let z = sector_zscore(&scores, &sectors);
        assert_eq!(z["A"], 0.0);
        assert!(z["B"] < 0.0);
        assert!(z["C"] > 0.0);
    }

    #[test]
    fn test_zero_variance_sector_scores_zero() {
        let scores = scores_of(&[("A", 3.0), ("B", 3.0), ("C", 3.0)]);
        let sectors = sectors_of(&[("A", "S"), ("B", "S"), ("C", "S")]);
        let z = sector_zscore(&scores, &sectors);
        assert!(z.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unmapped_tickers_group_under_unk() {
        let scores = scores_of(&[("A", 1.0), ("B", 3.0)]);
        let sectors = SectorMap::default();
        let z = sector_zscore(&scores, &sectors);
        // Both land in UNK and neutralize against each other.
        assert!(z["A"] < 0.0);
        assert!(z["B"] > 0.0);
        assert_relative_eq!(z["A"] + z["B"], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_empty_input() {
        let z = sector_zscore(&BTreeMap::new(), &SectorMap::default());
        assert!(z.is_empty());
    }
}
