//! Error types for the forecast_core crate

use thiserror::Error;

/// Broad classification of a [`ForecastError`].
///
/// Transport layers map these to their own status codes; the kind is kept
/// separate from the message so the distinction survives a generic response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input failed validation
    InvalidParameter,
    /// A required series could not be supplied
    DataUnavailable,
    /// Model fitting or forecast extraction failed
    FitFailure,
    /// Configuration could not be used
    Config,
}

/// Custom error types for the forecast_core crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error from invalid caller parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A named series is missing or unreadable
    #[error("Data unavailable for {name}: {reason}")]
    DataUnavailable { name: String, reason: String },

    /// Model failed to fit or to produce a forecast
    #[error("Fit failure: {0}")]
    FitFailure(String),

    /// Error from invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    /// Shorthand for a [`ForecastError::DataUnavailable`]
    pub fn data_unavailable(name: impl Into<String>, reason: impl ToString) -> Self {
        ForecastError::DataUnavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            ForecastError::DataUnavailable { .. } | ForecastError::Io(_) => {
                ErrorKind::DataUnavailable
            }
            ForecastError::FitFailure(_) => ErrorKind::FitFailure,
            ForecastError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidParameter
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
