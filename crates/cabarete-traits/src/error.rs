//! Error types for the Cabarete toolkit.
//!
//! Input-shape problems (empty batch sequences, malformed upstream schemas)
//! are errors and fail the run immediately. Numeric degeneracy (zero
//! variance, zero volume, insufficient history) is never an error: every
//! such case resolves to a defined fallback value (0, NaN, or ±inf) so a
//! run always completes.

use thiserror::Error;

/// The main error type for Cabarete operations.
#[derive(Debug, Error)]
pub enum CabareteError {
    /// Caller-supplied data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required column is missing from upstream data.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Not enough data for the requested operation.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Error fetching data from an external source.
    #[error("data fetch error: {0}")]
    DataFetch(String),

    /// Filesystem error while reading or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("{0}")]
    Other(String),
}

impl From<String> for CabareteError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for CabareteError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Cabarete operations.
pub type Result<T> = std::result::Result<T, CabareteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CabareteError::InvalidInput("batches must not be empty".to_string());
        assert_eq!(err.to_string(), "invalid input: batches must not be empty");

        let err = CabareteError::MissingColumn("close".to_string());
        assert_eq!(err.to_string(), "missing required column: close");
    }

    #[test]
    fn test_error_from_str() {
        let err: CabareteError = "something went wrong".into();
        assert!(matches!(err, CabareteError::Other(_)));
    }

    #[test]
    fn test_result_type() {
        let ok: Result<i32> = Ok(42);
        assert!(ok.is_ok());

        let err: Result<i32> = Err(CabareteError::Other("fail".to_string()));
        assert!(err.is_err());
    }
}
