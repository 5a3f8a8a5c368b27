//! Output validation gate
//!
//! The transform engine validates every assembled document exactly once
//! through the [`DocumentValidator`] trait. [`JsonSchemaValidator`] is the
//! standard implementation, compiling the target schema with the
//! `jsonschema` crate. Transform blocks embedded in the schema are unknown
//! keywords to JSON Schema and are ignored by the validator.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod error;

pub use error::{ValidationError, ValidationErrors, ValidationResult};

use serde_json::Value;

/// A validation gate applied to a fully assembled document
pub trait DocumentValidator: Send + Sync {
    /// Validate `document`
    ///
    /// Returns `Ok(true)` for a valid document and `Err` with the ordered
    /// violation list otherwise. `Ok(false)` is reserved for validators that
    /// reject without being able to explain why.
    fn validate(&self, document: &Value) -> ValidationResult<bool>;
}

/// JSON Schema backed validator
pub struct JsonSchemaValidator {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaValidator").finish_non_exhaustive()
    }
}

impl JsonSchemaValidator {
    /// Compile `schema` into a validator
    pub fn new(schema: &Value) -> Result<Self, ValidationError> {
        let validator = jsonschema::validator_for(schema).map_err(|e| {
            ValidationError::new(e.instance_path.to_string(), format!("Invalid schema: {}", e))
        })?;
        Ok(Self { validator })
    }
}

impl DocumentValidator for JsonSchemaValidator {
    fn validate(&self, document: &Value) -> ValidationResult<bool> {
        let errors: ValidationErrors = self
            .validator
            .iter_errors(document)
            .map(|e| {
                ValidationError::new(e.instance_path.to_string(), e.to_string())
                    .with_schema_path(e.schema_path.to_string())
            })
            .collect();

        if errors.is_empty() {
            Ok(true)
        } else {
            tracing::debug!(count = errors.len(), "Document failed schema validation");
            Err(errors)
        }
    }
}

/// Validator that accepts every document
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl DocumentValidator for AcceptAll {
    fn validate(&self, _document: &Value) -> ValidationResult<bool> {
        Ok(true)
    }
}
