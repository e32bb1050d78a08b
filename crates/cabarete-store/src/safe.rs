//! JSON-safe float wrapper.
//!
//! Standard JSON has no encoding for NaN or the infinities, but the
//! toolkit's degeneracy conventions produce all three. [`MetricValue`]
//! serializes finite floats as numbers and non-finite ones as the tagged
//! strings `"NaN"`, `"Infinity"`, and `"-Infinity"`, and accepts both
//! forms when deserializing.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A float that survives JSON round-trips even when non-finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValue(pub f64);

impl MetricValue {
    /// The wrapped value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else if self.0.is_nan() {
            serializer.serialize_str("NaN")
        } else if self.0 > 0.0 {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }
}

struct MetricValueVisitor;

impl Visitor<'_> for MetricValueVisitor {
    type Value = MetricValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a number or one of \"NaN\", \"Infinity\", \"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<MetricValue, E> {
        Ok(MetricValue(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<MetricValue, E> {
        Ok(MetricValue(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<MetricValue, E> {
        Ok(MetricValue(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<MetricValue, E> {
        match value {
            "NaN" => Ok(MetricValue(f64::NAN)),
            "Infinity" => Ok(MetricValue(f64::INFINITY)),
            "-Infinity" => Ok(MetricValue(f64::NEG_INFINITY)),
            other => Err(de::Error::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetricValueVisitor)
    }
}

/// Wrap a flat metrics mapping for persistence.
#[must_use]
pub fn to_metric_map(metrics: &BTreeMap<String, f64>) -> BTreeMap<String, MetricValue> {
    metrics
        .iter()
        .map(|(name, &value)| (name.clone(), MetricValue(value)))
        .collect()
}
