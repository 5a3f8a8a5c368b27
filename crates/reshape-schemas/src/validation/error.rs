//! Validation error types for transformed documents
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single schema violation in a validated document
#[derive(Debug, Clone, Error, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON pointer of the offending value in the document
    pub instance_path: String,
    /// JSON pointer of the schema keyword that rejected it
    pub schema_path: String,
    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "/"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{}: {}", location, self.message)
    }
}

impl ValidationError {
    /// Create a new validation error
    pub fn new<P, M>(instance_path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            instance_path: instance_path.into(),
            schema_path: String::new(),
            message: message.into(),
        }
    }

    /// Attach the schema keyword location
    pub fn with_schema_path(mut self, schema_path: impl Into<String>) -> Self {
        self.schema_path = schema_path.into();
        self
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// The full, deterministically ordered list of violations for one document
#[derive(Debug, Clone, Default, Error, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// Violations ordered by instance path, then schema path, then message
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error, keeping the collection sorted
    pub fn add(&mut self, error: ValidationError) {
        let position = self.errors.partition_point(|existing| existing <= &error);
        self.errors.insert(position, error);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors in order
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Ok if no errors were collected, Err otherwise
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut errors: Vec<ValidationError> = iter.into_iter().collect();
        errors.sort();
        Self { errors }
    }
}
