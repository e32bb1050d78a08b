//! Error types for the data boundary.

use cabarete_traits::CabareteError;
use thiserror::Error;

/// Errors from CSV adaptation and the market-data client.
#[derive(Debug, Error)]
pub enum DataError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// CSV reading or parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] polars::error::PolarsError),

    /// A CSV file does not match its expected schema.
    #[error("schema error in {file}: {message}")]
    Schema {
        /// Offending file.
        file: String,
        /// What went wrong.
        message: String,
    },

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DataError> for CabareteError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Schema { file, message } => {
                Self::InvalidInput(format!("{file}: {message}"))
            }
            other => Self::DataFetch(other.to_string()),
        }
    }
}

/// A specialized Result type for data-boundary operations.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = DataError::Schema {
            file: "prices.csv".to_string(),
            message: "missing column 'close'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "schema error in prices.csv: missing column 'close'"
        );
    }

    #[test]
    fn test_schema_error_maps_to_invalid_input() {
        let err = DataError::Schema {
            file: "prices.csv".to_string(),
            message: "bad".to_string(),
        };
        assert!(matches!(
            CabareteError::from(err),
            CabareteError::InvalidInput(_)
        ));
    }
}
