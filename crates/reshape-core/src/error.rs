//! Error types for the Reshape core library
//!
//! Construction-time problems (malformed schema, unknown operations, bad
//! operation arguments) surface as [`Error::Schema`] before any data flows.
//! Run-time failures abort the whole transform call; a transform never
//! returns partial output alongside an error.

use crate::jsonpath::JSONPathError;
use crate::types::InputFormat;
use reshape_schemas::{ValidationErrors, WalkError};
use thiserror::Error;

/// Main error type for Reshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed schema or transform rules, raised at construction time
    #[error("Schema error at {path}: {message}")]
    Schema { path: String, message: String },

    /// An operation rejected its input while a transform was running
    #[error("Operation '{operation}' failed at {path}: {message}")]
    Operation {
        path: String,
        operation: String,
        message: String,
    },

    /// The raw input document could not be parsed
    #[error("Invalid {format} input: {message}")]
    Input { format: InputFormat, message: String },

    /// The output document could not be written at a path
    #[error("Cannot write output at {path}: {message}")]
    Tree { path: String, message: String },

    /// The assembled document failed the final validation gate
    #[error("Output failed validation: {0}")]
    Validation(#[from] ValidationErrors),

    /// A path expression could not be parsed or executed
    #[error("JSONPath error: {0}")]
    JSONPath(#[from] JSONPathError),

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a schema error for the instance at `path`
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error was raised while building a transformer
    pub fn is_construction_error(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<WalkError> for Error {
    fn from(err: WalkError) -> Self {
        let path = match &err {
            WalkError::NotAnObject { path }
            | WalkError::MissingProperties { path }
            | WalkError::MissingItems { path } => path.clone(),
        };
        Error::Schema {
            path,
            message: err.to_string(),
        }
    }
}
