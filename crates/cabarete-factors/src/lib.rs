#![forbid(unsafe_code)]

//! Alpha factor computation and sector neutralization for Cabarete.
//!
//! Batch factors ([`Momentum`], [`RevisionVelocity`], [`QualityComposite`],
//! [`LowVolatility`]) score one rebalance step; the [`library`] module holds
//! their date-indexed panel counterparts used by IC telemetry. Raw scores
//! are standardized against sector peers via [`sector_zscore`] and blended
//! with [`CompositeBlend`].

pub mod blend;
pub mod library;
pub mod low_vol;
pub mod momentum;
pub mod neutralize;
pub mod quality;
pub mod revisions;

pub use blend::CompositeBlend;
pub use library::{PanelFactor, standardize_by_date};
pub use low_vol::{LowVolConfig, LowVolatility};
pub use momentum::{Momentum, MomentumConfig, price_momentum};
pub use neutralize::sector_zscore;
pub use quality::{QualityComposite, QualityWeights, quality_score};
pub use revisions::{RevisionConfig, RevisionVelocity, revision_velocity};
