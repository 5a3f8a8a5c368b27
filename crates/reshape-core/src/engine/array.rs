//! Array instances
//!
//! An array resolves its own value first, then walks its item schema once
//! per element. Each element walk gets a private output tree, an input
//! context narrowed to the element, and a path prefix that turns the generic
//! `[*]` item path into the element's concrete index.

use super::resolver::{PathPrefix, RunState};
use crate::schema::InstanceDescriptor;
use crate::tree::TreeBuilder;
use crate::{Error, Result};
use serde_json::Value;
use tracing::debug;

pub(crate) fn group_array(state: &mut RunState<'_>, instance: &InstanceDescriptor) -> Result<()> {
    let items = instance
        .items
        .as_deref()
        .ok_or_else(|| Error::schema(&instance.path, "array instance has no items schema"))?;
    let concrete = state.concrete_path(&instance.path);

    let Some(base) = state.resolve(instance)? else {
        return Ok(());
    };

    let seeds = base.into_seeds();
    let total = seeds.len();
    let mut elements = Vec::with_capacity(total);

    for (index, seed) in seeds.into_iter().enumerate() {
        let element_path = format!("{}[{}]", concrete, index);
        let mut output = TreeBuilder::new();

        let mut prefixes = state.prefixes.clone();
        prefixes.push(PathPrefix {
            generic: items.path.clone(),
            concrete: element_path.clone(),
        });
        let mut element_state = RunState {
            rule_set: state.rule_set,
            input: state.input.narrow(&element_path, seed),
            output: &mut output,
            prefixes,
        };
        element_state.walk(items)?;

        if let Some(element) = output.take(&element_path)? {
            elements.push(element);
        }
    }

    debug!(path = %concrete, total, kept = elements.len(), "grouped array");
    state.output.write(&concrete, Some(Value::Array(elements)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::{Document, InputContext};
    use crate::schema::SchemaDescriptor;
    use serde_json::json;

    fn run(schema: Value, input: Value) -> Value {
        let descriptor = SchemaDescriptor::parse(&schema).unwrap();
        let document = Document::Json(input);
        let mut output = TreeBuilder::new();
        let mut state = RunState::new("cms", InputContext::new(&document), &mut output);
        state.walk(descriptor.root()).unwrap();
        output.into_document()
    }

    #[test]
    fn test_elements_without_value_are_dropped() {
        let schema = json!({
            "type": "object",
            "properties": {
                "ids": {"type": "array", "items": {"type": "integer"}}
            }
        });
        let output = run(schema, json!({"ids": [1, "two", null, "3"]}));
        assert_eq!(output, json!({"ids": [1, 3]}));
    }

    #[test]
    fn test_empty_array_written_when_base_present() {
        let schema = json!({
            "type": "object",
            "properties": {
                "ids": {"type": "array", "items": {"type": "integer"}},
                "absent": {"type": "array", "items": {"type": "integer"}}
            }
        });
        let output = run(schema, json!({"ids": ["x", "y"]}));
        assert_eq!(output, json!({"ids": []}));
    }

    #[test]
    fn test_non_array_base_is_single_seed() {
        let schema = json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": {"type": "string"},
                    "transform": {"cms": {"from": [{"jsonPath": "$.tag"}]}}
                }
            }
        });
        let output = run(schema, json!({"tag": "solo"}));
        assert_eq!(output, json!({"tags": ["solo"]}));
    }

    #[test]
    fn test_nested_prefixes_substitute_outer_indices() {
        let schema = json!({
            "type": "object",
            "properties": {
                "groups": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "label": {"type": "string"},
                            "members": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "name": {"type": "string"},
                                        "group": {
                                            "type": "string",
                                            "transform": {"cms": {"from": [{"jsonPath": "$.groups[*].label"}]}}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        });
        let input = json!({
            "groups": [
                {"label": "a", "members": [{"name": "x"}, {"name": "y"}]},
                {"label": "b", "members": [{"name": "z"}]}
            ]
        });

        let output = run(schema, input);
        assert_eq!(
            output,
            json!({
                "groups": [
                    {"label": "a", "members": [{"name": "x", "group": "a"}, {"name": "y", "group": "a"}]},
                    {"label": "b", "members": [{"name": "z", "group": "b"}]}
                ]
            })
        );
    }
}
