//! Exponential moving averages of factor IC series.

use cabarete_traits::Date;
use std::collections::{BTreeMap, BTreeSet};

/// Single EMA update: `alpha * x + (1 - alpha) * prev`.
#[must_use]
pub fn ema_step(prev: Option<f64>, x: f64, alpha: f64) -> f64 {
    prev.map_or(x, |p| alpha * x + (1.0 - alpha) * p)
}

/// Per-date IC-EMA across factors.
///
/// The EMA seeds at each factor's first finite observation rather than
/// decaying from NaN. A missing or non-finite observation leaves the EMA
/// unchanged for that date (carry-forward, not reset); dates before the
/// first observation report NaN. Output rows cover the union of all
/// factors' dates, ascending.
#[must_use]
pub fn ic_ema_series(
    ic_by_factor: &BTreeMap<String, BTreeMap<Date, f64>>,
    alpha: f64,
) -> BTreeMap<Date, BTreeMap<String, f64>> {
    let dates: BTreeSet<Date> = ic_by_factor
        .values()
        .flat_map(|series| series.keys().copied())
        .collect();

    let mut state: BTreeMap<&String, Option<f64>> =
        ic_by_factor.keys().map(|name| (name, None)).collect();

    let mut out = BTreeMap::new();
    for date in dates {
        let mut row = BTreeMap::new();
        for (name, series) in ic_by_factor {
            let prev = state[name];
            match series.get(&date) {
                Some(&value) if value.is_finite() => {
                    let updated = ema_step(prev, value, alpha);
                    state.insert(name, Some(updated));
                    row.insert(name.clone(), updated);
                }
                _ => {
                    row.insert(name.clone(), prev.unwrap_or(f64::NAN));
                }
            }
        }
        out.insert(date, row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_ema_seeds_at_first_observation() {
        assert_relative_eq!(ema_step(None, 0.1, 0.5), 0.1);
        assert_relative_eq!(ema_step(Some(0.1), 0.3, 0.5), 0.2);
    }

    #[test]
    fn test_ema_progression() {
        let series: BTreeMap<String, BTreeMap<Date, f64>> = [(
            "f".to_string(),
            [(date(1), 0.1), (date(2), 0.3), (date(3), -0.1)].into(),
        )]
        .into();
        let ema = ic_ema_series(&series, 0.5);

        assert_relative_eq!(ema[&date(1)]["f"], 0.1, epsilon = 1e-12);
        assert_relative_eq!(ema[&date(2)]["f"], 0.2, epsilon = 1e-12);
        assert_relative_eq!(ema[&date(3)]["f"], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_observation_carries_forward() {
        let series: BTreeMap<String, BTreeMap<Date, f64>> = [
            (
                "f".to_string(),
                [(date(1), 0.1), (date(3), 0.3)].into(),
            ),
            (
                "g".to_string(),
                [(date(1), 0.2), (date(2), 0.2), (date(3), 0.2)].into(),
            ),
        ]
        .into();
        let ema = ic_ema_series(&series, 0.5);

        // f has no observation on day 2: the EMA holds at 0.1.
        assert_relative_eq!(ema[&date(2)]["f"], 0.1, epsilon = 1e-12);
        assert_relative_eq!(ema[&date(3)]["f"], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_observation_carries_forward() {
        let series: BTreeMap<String, BTreeMap<Date, f64>> = [(
            "f".to_string(),
            [(date(1), 0.1), (date(2), f64::NAN), (date(3), 0.3)].into(),
        )]
        .into();
        let ema = ic_ema_series(&series, 0.5);
        assert_relative_eq!(ema[&date(2)]["f"], 0.1, epsilon = 1e-12);
        assert_relative_eq!(ema[&date(3)]["f"], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_leading_gap_reports_nan() {
        let series: BTreeMap<String, BTreeMap<Date, f64>> = [
            ("f".to_string(), [(date(2), 0.1)].into()),
            ("g".to_string(), [(date(1), 0.2)].into()),
        ]
        .into();
        let ema = ic_ema_series(&series, 0.5);
        assert!(ema[&date(1)]["f"].is_nan());
        assert_relative_eq!(ema[&date(2)]["f"], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert!(ic_ema_series(&BTreeMap::new(), 0.5).is_empty());
    }
}
