//! The transform engine
//!
//! [`Transformer`] walks a parsed schema, resolves every instance against the
//! input document, assembles the output tree, and validates the result
//! against the same schema before handing it back.
//!
//! # Module Organization
//!
//! - [`context`] - Input documents and element-scoped lookups
//! - `resolver` - Run state and the three-tier value resolution
//! - `array` - Per-element sub-walks for array instances
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod context;

mod array;
mod resolver;


pub use context::{Document, InputContext};

use crate::schema::SchemaDescriptor;
use crate::tree::TreeBuilder;
use crate::types::InputFormat;
use crate::{Error, Result};
use reshape_schemas::{DocumentValidator, JsonSchemaValidator, ValidationError, ValidationErrors, ROOT_PATH};
use resolver::RunState;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Transforms input documents into documents of one target schema
///
/// A transformer is bound to a schema and a rule-set identifier. Calls to
/// [`Transformer::transform`] take `&mut self` because each call resets the
/// run state the transformer owns; use one transformer per thread and share
/// the parsed schema with [`Transformer::from_descriptor`].
pub struct Transformer {
    descriptor: Arc<SchemaDescriptor>,
    rule_set: String,
    format: Option<InputFormat>,
    validator: Arc<dyn DocumentValidator>,
    output: TreeBuilder,
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("rule_set", &self.rule_set)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Transformer {
    /// Parse `schema` and bind it to `rule_set`
    ///
    /// Malformed schemas, malformed rules in any rule set and schemas the
    /// validator cannot compile are rejected here.
    pub fn new(schema: &Value, rule_set: impl Into<String>) -> Result<Self> {
        let descriptor = Arc::new(SchemaDescriptor::parse(schema)?);
        Self::from_descriptor(descriptor, rule_set)
    }

    /// Build a transformer over an already parsed schema
    pub fn from_descriptor(descriptor: Arc<SchemaDescriptor>, rule_set: impl Into<String>) -> Result<Self> {
        let rule_set = rule_set.into();
        let validator = JsonSchemaValidator::new(descriptor.schema())
            .map_err(|e| Error::schema(ROOT_PATH, e.to_string()))?;

        if !descriptor.rule_sets().contains(&rule_set) {
            warn!(rule_set = %rule_set, "schema declares no rules for this rule set");
        }

        Ok(Self {
            descriptor,
            rule_set,
            format: None,
            validator: Arc::new(validator),
            output: TreeBuilder::new(),
        })
    }

    /// Parse raw input as `format` instead of detecting it
    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Replace the final validation gate
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: DocumentValidator + 'static,
    {
        self.validator = Arc::new(validator);
        self
    }

    /// The parsed schema, for sharing with other transformers
    pub fn descriptor(&self) -> &Arc<SchemaDescriptor> {
        &self.descriptor
    }

    /// Active rule-set identifier
    pub fn rule_set(&self) -> &str {
        &self.rule_set
    }

    /// Transform a raw JSON or XML document into serialized JSON
    #[instrument(skip(self, raw), fields(rule_set = %self.rule_set, bytes = raw.len()))]
    pub fn transform(&mut self, raw: &[u8]) -> Result<Vec<u8>> {
        let format = self.format.unwrap_or_else(|| InputFormat::detect(raw));
        debug!(%format, "parsing input");
        let document = Document::parse(raw, format)?;
        let output = self.run(&document)?;
        Ok(serde_json::to_vec(&output)?)
    }

    /// Transform an already parsed JSON document
    #[instrument(skip(self, input), fields(rule_set = %self.rule_set))]
    pub fn transform_value(&mut self, input: &Value) -> Result<Value> {
        self.run(&Document::Json(input.clone()))
    }

    /// Transform a parsed document of either format
    pub fn transform_document(&mut self, document: &Document) -> Result<Value> {
        self.run(document)
    }

    fn run(&mut self, document: &Document) -> Result<Value> {
        self.output.clear();

        let mut state = RunState::new(&self.rule_set, InputContext::new(document), &mut self.output);
        state.walk(self.descriptor.root())?;

        let output = std::mem::take(&mut self.output).into_document();
        match self.validator.validate(&output) {
            Ok(true) => Ok(output),
            Ok(false) => Err(Error::Validation(ValidationErrors::from(ValidationError::new(
                "",
                "document rejected by validator",
            )))),
            Err(errors) => {
                debug!(count = errors.len(), "output failed validation");
                Err(Error::Validation(errors))
            }
        }
    }
}
