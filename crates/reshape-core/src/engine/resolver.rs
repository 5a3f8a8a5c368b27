//! Per-instance value resolution
//!
//! Every instance resolves through three tiers: the explicit rule of the
//! active rule set, a direct copy of the same path from the input (not for
//! objects), and finally the schema default.

use super::array;
use super::context::{Document, InputContext};
use crate::coerce::coerce;
use crate::instructions::{concatenate, Method, SourceReference, TransformInstructions};
use crate::operations::type_name;
use crate::schema::InstanceDescriptor;
use crate::tree::TreeBuilder;
use crate::types::InstanceType;
use crate::value::SourceValue;
use crate::{Error, Result};
use serde_json::Value;
use tracing::{debug, trace};

/// Generic item path and the concrete element path it stands for
#[derive(Debug, Clone)]
pub(crate) struct PathPrefix {
    pub generic: String,
    pub concrete: String,
}

/// Mutable state of one walk over the descriptor tree
///
/// The top-level call owns one; every array element gets its own with a
/// private output tree and one more [`PathPrefix`].
pub(crate) struct RunState<'a> {
    pub rule_set: &'a str,
    pub input: InputContext<'a>,
    pub output: &'a mut TreeBuilder,
    /// Innermost last
    pub prefixes: Vec<PathPrefix>,
}

impl<'a> RunState<'a> {
    pub fn new(rule_set: &'a str, input: InputContext<'a>, output: &'a mut TreeBuilder) -> Self {
        Self {
            rule_set,
            input,
            output,
            prefixes: Vec::new(),
        }
    }

    /// Replace generic `[*]` prefixes in `path` with the elements being walked
    pub fn concrete_path(&self, path: &str) -> String {
        let mut path = path.to_string();
        for prefix in self.prefixes.iter().rev() {
            if let Some(rest) = path.strip_prefix(prefix.generic.as_str()) {
                if rest.is_empty() || rest.starts_with('.') || rest.starts_with('[') {
                    path = format!("{}{}", prefix.concrete, rest);
                }
            }
        }
        path
    }

    /// Walk `instance` and everything below it, writing into the output
    pub fn walk(&mut self, instance: &InstanceDescriptor) -> Result<()> {
        match instance.instance_type {
            InstanceType::Array => array::group_array(self, instance),
            InstanceType::Object => {
                let value = self.resolve(instance)?;
                self.write(instance, value)?;
                for property in &instance.properties {
                    self.walk(property)?;
                }
                Ok(())
            }
            InstanceType::Scalar(_) => {
                let value = self.resolve(instance)?;
                self.write(instance, value)
            }
        }
    }

    fn write(&mut self, instance: &InstanceDescriptor, value: Option<SourceValue>) -> Result<()> {
        let path = self.concrete_path(&instance.path);
        let value = value.map(SourceValue::into_json).filter(|value| !value.is_null());
        self.output.write(&path, value)
    }

    /// Resolve the value of `instance` through the three tiers
    pub fn resolve(&self, instance: &InstanceDescriptor) -> Result<Option<SourceValue>> {
        let path = self.concrete_path(&instance.path);

        if let Some(rule) = instance.rule(self.rule_set) {
            if let Some(value) = self.evaluate_rule(instance, rule, &path)? {
                debug!(path = %path, tier = "rule", "resolved instance");
                return Ok(Some(value));
            }
        }

        if instance.instance_type != InstanceType::Object {
            if let Some(value) = self.direct_copy(instance, &path)? {
                debug!(path = %path, tier = "direct", "resolved instance");
                return Ok(Some(value));
            }
        }

        match &instance.default {
            Some(default) => {
                debug!(path = %path, tier = "default", "resolved instance");
                Ok(Some(SourceValue::Json(default.clone())))
            }
            None => {
                trace!(path = %path, "no value");
                Ok(None)
            }
        }
    }

    fn direct_copy(&self, instance: &InstanceDescriptor, path: &str) -> Result<Option<SourceValue>> {
        let Some(found) = self.input.lookup_json(path)? else {
            return Ok(None);
        };

        match instance.instance_type.scalar_kind() {
            Some(kind) => {
                let coerced = coerce(&found, kind);
                if coerced.is_none() {
                    trace!(path, expected = %kind, "direct copy does not coerce");
                }
                Ok(coerced.map(SourceValue::Json))
            }
            None => Ok(Some(found)),
        }
    }

    fn evaluate_rule(
        &self,
        instance: &InstanceDescriptor,
        rule: &TransformInstructions,
        path: &str,
    ) -> Result<Option<SourceValue>> {
        match rule.method {
            Method::First => self.first_of(instance, rule.sources.iter(), path),
            Method::Last => self.first_of(instance, rule.sources.iter().rev(), path),
            Method::Concatenate => {
                let mut parts = Vec::new();
                for source in &rule.sources {
                    match self.evaluate_source(instance, source, path)?.map(SourceValue::into_json) {
                        None | Some(Value::Null) => {}
                        Some(Value::String(part)) => parts.push(part),
                        Some(other) => {
                            return Err(Error::Operation {
                                path: path.to_string(),
                                operation: "concatenate".to_string(),
                                message: format!("expected string, found {}", type_name(&other)),
                            })
                        }
                    }
                }
                Ok(concatenate(parts, &rule.delimiter).map(|joined| SourceValue::Json(Value::String(joined))))
            }
        }
    }

    fn first_of<'s>(
        &self,
        instance: &InstanceDescriptor,
        sources: impl Iterator<Item = &'s SourceReference>,
        path: &str,
    ) -> Result<Option<SourceValue>> {
        for source in sources {
            if let Some(value) = self.evaluate_source(instance, source, path)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Look up one source, coerce it and run its operations
    fn evaluate_source(
        &self,
        instance: &InstanceDescriptor,
        source: &SourceReference,
        path: &str,
    ) -> Result<Option<SourceValue>> {
        let found = match (self.input.document(), &source.xml_path, &source.json_path) {
            (Document::Xml(_), Some(xml_path), _) => self.input.lookup_xml(xml_path),
            (_, _, Some(json_path)) => self.input.lookup_json(&self.concrete_path(json_path))?,
            _ => None,
        };
        let Some(mut value) = found else {
            return Ok(None);
        };

        if let Some(kind) = instance.instance_type.scalar_kind() {
            if let Some(coerced) = coerce(&value, kind) {
                value = SourceValue::Json(coerced);
            }
        }

        if source.operations.is_empty() {
            return Ok(Some(value));
        }

        let mut current = value.into_json();
        for operation in &source.operations {
            current = operation.apply(current).map_err(|e| Error::Operation {
                path: path.to_string(),
                operation: operation.name().to_string(),
                message: e.to_string(),
            })?;
            if current.is_null() {
                return Ok(None);
            }
        }
        Ok(SourceValue::from_json(current))
    }
}
