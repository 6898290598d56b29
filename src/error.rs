//! Error types for the imbalance-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading, fitting, searching or writing.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Malformed input row.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Parameter estimation did not converge.
    #[error("convergence error: {0}")]
    Convergence(String),

    /// Optimizer exceeded its wall-clock budget.
    #[error("fit timed out after {seconds:.1}s")]
    Timeout { seconds: f64 },

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited file reader/writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ForecastError {
    /// Whether this error came from the filesystem or the delimited codec.
    pub fn is_io(&self) -> bool {
        matches!(self, ForecastError::Io(_) | ForecastError::Csv(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ForecastError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 10, got 5"
        );

        let err = ForecastError::Parse {
            line: 3,
            message: "bad timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at line 3: bad timestamp");

        let err = ForecastError::Convergence("simplex did not settle".to_string());
        assert_eq!(
            err.to_string(),
            "convergence error: simplex did not settle"
        );

        let err = ForecastError::Timeout { seconds: 2.5 };
        assert_eq!(err.to_string(), "fit timed out after 2.5s");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ForecastError = io.into();
        assert!(err.is_io());
        assert!(!ForecastError::FitRequired.is_io());
    }
}
