//! Parsed schema descriptor tree
//!
//! [`SchemaDescriptor::parse`] walks a target schema once and turns every
//! instance into an [`InstanceDescriptor`] with its declared type, default,
//! and parsed transform rules for every rule set. Malformed schemas and
//! malformed rules are rejected here, before any document is transformed.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::instructions::TransformInstructions;
use crate::types::InstanceType;
use crate::{Error, Result};
use reshape_schemas::{schema_type, walk, WalkEntry, WalkKey, ROOT_PATH};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One schema instance
#[derive(Debug, Clone)]
pub struct InstanceDescriptor {
    /// JSONPath of the instance, with `[*]` for array items
    pub path: String,
    /// Property name, `None` for the root and for array items
    pub name: Option<String>,
    pub instance_type: InstanceType,
    pub default: Option<Value>,
    /// Names listed in `required` (object instances)
    pub required: Vec<String>,
    /// Child instances in declaration order (object instances)
    pub properties: Vec<InstanceDescriptor>,
    /// Item instance (array instances)
    pub items: Option<Box<InstanceDescriptor>>,
    /// Transform rules keyed by rule-set identifier
    pub transforms: BTreeMap<String, TransformInstructions>,
}

impl InstanceDescriptor {
    /// Rules for `rule_set`, if the instance declares any
    pub fn rule(&self, rule_set: &str) -> Option<&TransformInstructions> {
        self.transforms.get(rule_set)
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a InstanceDescriptor>) {
        out.push(self);
        for property in &self.properties {
            property.visit(out);
        }
        if let Some(items) = &self.items {
            items.visit(out);
        }
    }
}

/// Immutable, shareable result of parsing a schema
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    root: InstanceDescriptor,
    schema: Value,
}

impl SchemaDescriptor {
    /// Parse `schema` and every transform rule it carries
    pub fn parse(schema: &Value) -> Result<Self> {
        let mut stack: Vec<InstanceDescriptor> = Vec::new();

        walk(schema, |entry: &WalkEntry<'_>| {
            while stack.len() > entry.depth {
                attach(&mut stack);
            }
            let enclosing = enclosing_path(entry.path, stack.last());
            stack.push(describe(entry, &enclosing)?);
            Ok::<(), Error>(())
        })?;

        while stack.len() > 1 {
            attach(&mut stack);
        }
        let root = stack
            .pop()
            .ok_or_else(|| Error::schema(ROOT_PATH, "schema has no root instance"))?;

        debug!(
            instances = root_count(&root),
            rule_sets = ?collect_rule_sets(&root),
            "parsed schema descriptor"
        );

        Ok(Self {
            root,
            schema: schema.clone(),
        })
    }

    /// The root instance
    pub fn root(&self) -> &InstanceDescriptor {
        &self.root
    }

    /// The raw schema the descriptor was parsed from
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Every instance in walk order
    pub fn instances(&self) -> Vec<&InstanceDescriptor> {
        let mut out = Vec::new();
        self.root.visit(&mut out);
        out
    }

    /// Every rule-set identifier used anywhere in the schema
    pub fn rule_sets(&self) -> BTreeSet<String> {
        collect_rule_sets(&self.root)
    }
}

/// Pop the top of the stack and hang it off its parent
fn attach(stack: &mut Vec<InstanceDescriptor>) {
    let Some(child) = stack.pop() else {
        return;
    };
    if let Some(parent) = stack.last_mut() {
        match parent.instance_type {
            InstanceType::Array => parent.items = Some(Box::new(child)),
            _ => parent.properties.push(child),
        }
    }
}

/// Path that a leading `@` stands for in rules of the instance at `path`
fn enclosing_path(path: &str, parent: Option<&InstanceDescriptor>) -> String {
    if path.ends_with("[*]") {
        return path.to_string();
    }
    parent
        .map(|parent| parent.path.clone())
        .unwrap_or_else(|| ROOT_PATH.to_string())
}

fn describe(entry: &WalkEntry<'_>, enclosing: &str) -> Result<InstanceDescriptor> {
    let fragment = entry.fragment;
    let type_name =
        schema_type(fragment).ok_or_else(|| Error::schema(entry.path, "instance declares no type"))?;
    let format = fragment.get("format").and_then(Value::as_str);
    let instance_type = InstanceType::from_schema(type_name, format)
        .ok_or_else(|| Error::schema(entry.path, format!("unsupported type '{}'", type_name)))?;

    let required = fragment
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let transforms = match fragment.get("transform") {
        None => BTreeMap::new(),
        Some(Value::Object(blocks)) => blocks
            .iter()
            .map(|(rule_set, block)| {
                let instructions = TransformInstructions::parse(block, entry.path, enclosing, instance_type)?;
                Ok((rule_set.clone(), instructions))
            })
            .collect::<Result<BTreeMap<_, _>>>()?,
        Some(_) => return Err(Error::schema(entry.path, "'transform' must be an object")),
    };

    let name = match entry.key {
        WalkKey::Property(name) => Some(name.to_string()),
        WalkKey::Root | WalkKey::Items => None,
    };

    Ok(InstanceDescriptor {
        path: entry.path.to_string(),
        name,
        instance_type,
        default: fragment.get("default").filter(|value| !value.is_null()).cloned(),
        required,
        properties: Vec::new(),
        items: None,
        transforms,
    })
}

fn root_count(root: &InstanceDescriptor) -> usize {
    let mut out = Vec::new();
    root.visit(&mut out);
    out.len()
}

fn collect_rule_sets(root: &InstanceDescriptor) -> BTreeSet<String> {
    let mut out = Vec::new();
    root.visit(&mut out);
    out.iter()
        .flat_map(|instance| instance.transforms.keys().cloned())
        .collect()
}
