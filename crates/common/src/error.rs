use std::fmt;

use arrow::datatypes::Fields;
use thiserror::Error;

/// Unified error type for the Floe crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A scan entry point with no implementation behind it was invoked.
    /// Never retried; surfaced directly to the caller.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// The remote backend could not be reached, or an in-flight call to it
    /// failed. Aborts the whole scan; any retry policy lives in the client.
    #[error("failed to reach remote backend at {endpoint}: {message}")]
    Connectivity { endpoint: String, message: String },

    /// The schema reported by the remote backend diverged from the declared
    /// table schema. Fatal.
    #[error("schema mismatch for table '{table}': declared {expected}, remote reported {actual}")]
    SchemaMismatch {
        table: String,
        expected: String,
        actual: String,
    },

    #[error("missing required option '{0}'")]
    MissingOption(String),

    #[error("invalid value for option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    #[error("failed to load configuration")]
    Config(#[from] config::ConfigError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("an internal error occurred: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a transport-level failure against `endpoint`.
    pub fn connectivity(endpoint: impl Into<String>, source: impl fmt::Display) -> Self {
        Error::Connectivity {
            endpoint: endpoint.into(),
            message: source.to_string(),
        }
    }

    /// Build a [`Error::SchemaMismatch`] from the declared and remote field
    /// lists.
    pub fn schema_mismatch(table: impl Into<String>, expected: &Fields, actual: &Fields) -> Self {
        Error::SchemaMismatch {
            table: table.into(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }
}
