//! Error types for JSONPath operations
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// JSONPath error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JSONPathError {
    /// Parse errors during JSONPath expression parsing
    #[error("Parse error at position {position} in '{input}': {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// Syntax errors with the tokens the parser would have accepted
    #[error("Syntax error at position {position} in '{input}': {message} (expected one of {}, found {found})", expected.join(", "))]
    Syntax {
        message: String,
        position: usize,
        input: String,
        expected: Vec<String>,
        found: String,
    },

    /// A path is valid JSONPath but not usable where it appears
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { message: String, path: String },
}

impl JSONPathError {
    /// Create a parse error with position and context
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create a syntax error with detailed information
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        input: impl Into<String>,
        expected: &[&str],
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            input: input.into(),
            expected: expected.iter().map(|token| token.to_string()).collect(),
            found: found.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
            path: path.into(),
        }
    }
}
