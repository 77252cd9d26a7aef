//! Error types and utilities for tsprep

use thiserror::Error;

/// Result type alias for tsprep operations
pub type Result<T> = std::result::Result<T, TsPrepError>;

/// Main error type for tsprep operations
#[derive(Error, Debug)]
pub enum TsPrepError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failures (connect, timeout, body read)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-success HTTP status from a remote source
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// A JSON page did not have the expected shape
    #[error("Unexpected payload at {endpoint}: {message}")]
    Payload { endpoint: String, message: String },

    /// Dataset name not present in the registry
    #[error("Unknown dataset '{name}'")]
    UnknownDataset { name: String },

    /// A column required by an operation is absent
    #[error("Missing column '{column}'")]
    MissingColumn { column: String },

    /// A date string could not be parsed
    #[error("Cannot parse date '{value}': {message}")]
    DateParse { value: String, message: String },

    /// An operation met a value of the wrong kind
    #[error("Type mismatch in '{column}': {message}")]
    TypeMismatch { column: String, message: String },

    /// Row shape does not agree with the table's columns
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// CSV encoding/decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Plot rendering errors
    #[error("Plot error: {message}")]
    Plot {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TsPrepError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new payload shape error
    pub fn payload(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Payload {
            endpoint: endpoint.into(),
            message: msg.into(),
        }
    }

    /// Create a new unknown dataset error
    pub fn unknown_dataset(name: impl Into<String>) -> Self {
        Self::UnknownDataset { name: name.into() }
    }

    /// Create a new missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a new date parse error
    pub fn date_parse(value: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::DateParse {
            value: value.into(),
            message: msg.into(),
        }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(column: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            message: msg.into(),
        }
    }

    /// Create a new schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    /// Create a new plot error
    pub fn plot(msg: impl Into<String>) -> Self {
        Self::Plot {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new plot error with source
    pub fn plot_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Plot {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convert from reqwest::Error to TsPrepError
impl From<reqwest::Error> for TsPrepError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_decode() {
            Self::network_with_source("Response body could not be decoded", err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to TsPrepError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for TsPrepError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::plot_with_source("Histogram rendering failed", err)
    }
}
