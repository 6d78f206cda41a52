//! Error types for eqstats.
//!
//! Every fallible operation in the workspace returns [`Result`]. Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for callers driving batch analyses
//!
//! Errors serialize to structured JSON through [`StructuredError`]:
//! ```json
//! {
//!   "code": 10,
//!   "category": "parameter",
//!   "message": "invalid parameter b = 0: must be > 0",
//!   "recoverable": false,
//!   "context": { "parameter": "b", "value": 0.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for eqstats operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller-supplied parameters outside their domain.
    Parameter,
    /// Catalog data that cannot support the requested statistic.
    Data,
    /// Stochastic catalog generation failures.
    Sampling,
    /// Configuration parsing and validation errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Parameter => write!(f, "parameter"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Sampling => write!(f, "sampling"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for eqstats.
#[derive(Error, Debug)]
pub enum Error {
    // Parameter errors (10-19)
    #[error("invalid parameter {name} = {value}: {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },

    #[error("invalid total duration {ttot}: must be finite and > 0")]
    InvalidDuration { ttot: f64 },

    // Data errors (20-29)
    #[error("empty catalog")]
    EmptyCatalog,

    #[error("length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("insufficient data: need at least {required} values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("degenerate data: {0}")]
    DegenerateData(String),

    // Sampling errors (30-39)
    #[error("detection sampling exhausted {attempts} attempts for event slot {slot}")]
    SamplingExhausted { attempts: u64, slot: usize },

    // Configuration errors (40-49)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // I/O errors (50-59)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for parameter-domain violations.
    pub fn invalid(name: &'static str, value: f64, constraint: &'static str) -> Self {
        Error::InvalidParameter {
            name,
            value,
            constraint,
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Parameter errors
    /// - 20-29: Data errors
    /// - 30-39: Sampling errors
    /// - 40-49: Configuration errors
    /// - 50-59: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidParameter { .. } => 10,
            Error::InvalidDuration { .. } => 11,
            Error::EmptyCatalog => 20,
            Error::LengthMismatch { .. } => 21,
            Error::InsufficientData { .. } => 22,
            Error::DegenerateData(_) => 23,
            Error::SamplingExhausted { .. } => 30,
            Error::Config(_) => 40,
            Error::Toml(_) => 41,
            Error::Io(_) => 50,
            Error::Json(_) => 51,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidParameter { .. } | Error::InvalidDuration { .. } => {
                ErrorCategory::Parameter
            }

            Error::EmptyCatalog
            | Error::LengthMismatch { .. }
            | Error::InsufficientData { .. }
            | Error::DegenerateData(_) => ErrorCategory::Data,

            Error::SamplingExhausted { .. } => ErrorCategory::Sampling,

            Error::Config(_) | Error::Toml(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Recoverable errors may go away by retrying with a fresh random stream
    /// or by fixing a configuration file; the rest require different inputs.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidParameter { .. } => false,
            Error::InvalidDuration { .. } => false,

            Error::EmptyCatalog => false,
            Error::LengthMismatch { .. } => false,
            Error::InsufficientData { .. } => false,
            Error::DegenerateData(_) => false,

            // Another draw may get lucky, or the cap can be raised
            Error::SamplingExhausted { .. } => true,

            Error::Config(_) => true,
            Error::Toml(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "Invalid Parameter",
            Error::InvalidDuration { .. } => "Invalid Catalog Duration",
            Error::EmptyCatalog => "Empty Catalog",
            Error::LengthMismatch { .. } => "Length Mismatch",
            Error::InsufficientData { .. } => "Insufficient Data",
            Error::DegenerateData(_) => "Degenerate Data",
            Error::SamplingExhausted { .. } => "Detection Sampling Exhausted",
            Error::Config(_) => "Configuration Error",
            Error::Toml(_) => "TOML Parse Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., parameter name and value).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidParameter { name, value, .. } => {
                context.insert("parameter".to_string(), serde_json::json!(name));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::InvalidDuration { ttot } => {
                context.insert("ttot".to_string(), serde_json::json!(ttot));
            }
            Error::LengthMismatch { expected, actual }
            | Error::InsufficientData {
                required: expected,
                actual,
            } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            Error::SamplingExhausted { attempts, slot } => {
                context.insert("attempts".to_string(), serde_json::json!(attempts));
                context.insert("slot".to_string(), serde_json::json!(slot));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
