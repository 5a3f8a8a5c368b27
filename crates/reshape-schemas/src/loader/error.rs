//! Error types for schema loading
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while reading a schema document
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read schema file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML schema '{path}': {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON schema '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Unsupported file extension
    #[error("Unsupported schema format for '{path}'. Expected .json, .yaml or .yml")]
    UnsupportedFormat { path: PathBuf },

    /// The document parsed but is not a schema object
    #[error("Schema '{path}' must be a JSON object at the root level")]
    NotAnObject { path: PathBuf },
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::YamlParse {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            path: path.into(),
            source,
        }
    }

    /// Path of the file that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. }
            | Self::YamlParse { path, .. }
            | Self::JsonParse { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::NotAnObject { path } => path,
        }
    }
}
