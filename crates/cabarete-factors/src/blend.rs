//! Weighted blending of sector-neutralized factor scores.

use crate::{
    momentum::Momentum, neutralize::sector_zscore, quality::QualityComposite,
    revisions::RevisionVelocity,
};
use cabarete_traits::{Factor, SectorMap, Ticker, WeeklyBatch, WeeklyParams};
use std::collections::BTreeMap;
use std::fmt;

/// A caller-specified weighted blend of factors.
///
/// Each component factor is scored on the batch, sector-neutralized, and
/// combined as `sum_i w_i * z_i(ticker)` over the batch's universe. Any
/// number of components is allowed; the blend is not hard-coded to a
/// particular factor set.
#[derive(Default)]
pub struct CompositeBlend {
    components: Vec<(f64, Box<dyn Factor>)>,
}

impl CompositeBlend {
    /// Create an empty blend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard momentum/revisions/quality blend used by the weekly
    /// engines, weighted per [`WeeklyParams`].
    #[must_use]
    pub fn standard(params: &WeeklyParams) -> Self {
        Self::new()
            .with(params.w_mom, Momentum::default())
            .with(params.w_rev, RevisionVelocity::default())
            .with(params.w_qual, QualityComposite::default())
    }

    /// Add a weighted component factor.
    #[must_use]
    pub fn with(mut self, weight: f64, factor: impl Factor + 'static) -> Self {
        self.components.push((weight, Box::new(factor)));
        self
    }

    /// Number of component factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the blend has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Longest lookback required by any component.
    #[must_use]
    pub fn lookback(&self) -> usize {
        self.components
            .iter()
            .map(|(_, factor)| factor.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Sector-neutralized composite score per ticker in the batch universe.
    ///
    /// Tickers missing from a component's output contribute 0 for that
    /// component rather than dropping out of the composite.
    #[must_use]
    pub fn score(&self, batch: &WeeklyBatch, sectors: &SectorMap) -> BTreeMap<Ticker, f64> {
        let neutralized: Vec<(f64, BTreeMap<Ticker, f64>)> = self
            .components
            .iter()
            .map(|(weight, factor)| (*weight, sector_zscore(&factor.score(batch), sectors)))
            .collect();

        batch
            .universe()
            .map(|ticker| {
                let composite = neutralized
                    .iter()
                    .map(|(weight, scores)| weight * scores.get(ticker).copied().unwrap_or(0.0))
                    .sum();
                (ticker.clone(), composite)
            })
            .collect()
    }
}

impl fmt::Debug for CompositeBlend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .components
            .iter()
            .map(|(weight, factor)| format!("{}*{}", weight, factor.name()))
            .collect();
        f.debug_struct("CompositeBlend")
            .field("components", &parts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::low_vol::LowVolatility;
    use approx::assert_relative_eq;

    fn demo_batch() -> (WeeklyBatch, SectorMap) {
        let mut batch = WeeklyBatch::default();
        batch.prices.insert(
            "AAA".to_string(),
            vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0],
        );
        batch
            .prices
            .insert("BBB".to_string(), vec![10.0, 9.0, 9.5, 9.7, 9.9, 10.2]);
        batch
            .prices
            .insert("CCC".to_string(), vec![5.0, 5.1, 5.2, 5.3, 5.4, 5.5]);
        let sectors: SectorMap = [
            ("AAA".to_string(), "Tech".to_string()),
            ("BBB".to_string(), "Finance".to_string()),
            ("CCC".to_string(), "Tech".to_string()),
        ]
        .into_iter()
        .collect();
        (batch, sectors)
    }

    #[test]
    fn test_standard_blend_has_three_components() {
        let blend = CompositeBlend::standard(&WeeklyParams::default());
        assert_eq!(blend.len(), 3);
        assert_eq!(blend.lookback(), 53);
    }

    #[test]
    fn test_blend_is_extensible() {
        let blend = CompositeBlend::standard(&WeeklyParams::default())
            .with(0.15, LowVolatility::default());
        assert_eq!(blend.len(), 4);
    }

    #[test]
    fn test_momentum_blend_prefers_trending_name() {
        let (batch, sectors) = demo_batch();
        let blend = CompositeBlend::new().with(1.0, Momentum::default());
        let scores = blend.score(&batch, &sectors);

        // AAA trends up strongly, CCC mildly; both are Tech so they
        // neutralize against each other. BBB is alone in Finance -> 0.
        assert!(scores["AAA"] > scores["CCC"]);
        assert_eq!(scores["BBB"], 0.0);
    }

    #[test]
    fn test_empty_blend_scores_zero() {
        let (batch, sectors) = demo_batch();
        let blend = CompositeBlend::new();
        let scores = blend.score(&batch, &sectors);
        assert_eq!(scores.len(), 3);
        assert!(scores.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_blend_weights_scale_contributions() {
        let (batch, sectors) = demo_batch();
        let single = CompositeBlend::new().with(1.0, Momentum::default());
        let doubled = CompositeBlend::new().with(2.0, Momentum::default());
        let s1 = single.score(&batch, &sectors);
        let s2 = doubled.score(&batch, &sectors);
        for ticker in s1.keys() {
            assert_relative_eq!(2.0 * s1[ticker], s2[ticker], epsilon = 1e-12);
        }
    }
}
