//! Config hashing and code-revision capture.

use cabarete_traits::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::process::Command;

/// Deterministic SHA-256 hex digest of a configuration.
///
/// The value is serialized through `serde_json::Value`, whose object maps
/// keep keys sorted, so logically equal configs hash identically
/// regardless of field declaration order.
///
/// # Errors
///
/// Returns a serialization error if the config cannot be represented as
/// JSON.
pub fn hash_config<T: Serialize>(config: &T) -> Result<String> {
    let value = serde_json::to_value(config)?;
    let payload = serde_json::to_string(&value)?;
    let digest = Sha256::digest(payload.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(hex)
}

/// Current Git revision short SHA, or `"unknown"` when Git is unavailable.
#[must_use]
pub fn code_sha() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|sha| sha.trim().to_string())
        .filter(|sha| !sha.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct DemoConfig {
        top_k: usize,
        name_cap: f64,
    }

    #[test]
    fn test_hash_is_deterministic() {
        let config = DemoConfig {
            top_k: 20,
            name_cap: 0.07,
        };
        let a = hash_config(&config).unwrap();
        let b = hash_config(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = hash_config(&DemoConfig {
            top_k: 20,
            name_cap: 0.07,
        })
        .unwrap();
        let b = hash_config(&DemoConfig {
            top_k: 21,
            name_cap: 0.07,
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_ignores_map_insertion_order() {
        let mut forward = BTreeMap::new();
        forward.insert("a", 1);
        forward.insert("b", 2);
        let mut reverse = BTreeMap::new();
        reverse.insert("b", 2);
        reverse.insert("a", 1);
        assert_eq!(
            hash_config(&forward).unwrap(),
            hash_config(&reverse).unwrap()
        );
    }

    #[test]
    fn test_code_sha_never_empty() {
        assert!(!code_sha().is_empty());
    }
}
