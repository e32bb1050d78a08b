//! Injected clock and run-id generation.
//!
//! Run metadata needs "now" and a fresh run id. Both come from a
//! [`RunContext`] capability handed into the persistence entry points
//! rather than from ambient globals, so tests can pin deterministic
//! timestamps and ids.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Clock and id-generation capability for run metadata.
pub trait RunContext: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// A fresh run identifier.
    fn new_run_id(&self) -> String;
}

/// Production context: system clock and random 12-hex run ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemContext;

impl RunContext for SystemContext {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn new_run_id(&self) -> String {
        Uuid::new_v4().simple().to_string()[..12].to_string()
    }
}

/// Deterministic context for tests: a pinned timestamp and a fixed id.
#[derive(Debug, Clone)]
pub struct FixedContext {
    /// The timestamp returned by every [`RunContext::now`] call.
    pub timestamp: DateTime<Utc>,
    /// The id returned by every [`RunContext::new_run_id`] call.
    pub run_id: String,
}

impl RunContext for FixedContext {
    fn now(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn new_run_id(&self) -> String {
        self.run_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_run_ids_are_unique() {
        let ctx = SystemContext;
        let a = ctx.new_run_id();
        let b = ctx.new_run_id();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fixed_context_is_deterministic() {
        let ctx = FixedContext {
            timestamp: DateTime::parse_from_rfc3339("2024-01-05T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            run_id: "abc123def456".to_string(),
        };
        assert_eq!(ctx.new_run_id(), "abc123def456");
        assert_eq!(ctx.now().to_rfc3339(), "2024-01-05T12:00:00+00:00");
    }
}
