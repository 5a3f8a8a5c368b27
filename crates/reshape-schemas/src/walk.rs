//! Depth-first traversal of a target schema
//!
//! The walker visits every schema instance exactly once, in pre-order, using
//! declaration order for object properties. Array items are visited once at a
//! templated `[*]` path; concrete indices only exist at transform time.
//!
//! The walker reads just enough of each fragment to know where to recurse.
//! Interpreting `type`, `format`, `default` and `transform` is left to the
//! caller.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use thiserror::Error;

/// Path of the schema root instance
pub const ROOT_PATH: &str = "$";

/// Structural problems found while walking a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    /// A schema fragment is not a JSON object
    #[error("Schema fragment at {path} must be an object")]
    NotAnObject { path: String },

    /// An object instance declares no `properties`
    #[error("Object instance at {path} has no properties")]
    MissingProperties { path: String },

    /// An array instance declares no single-schema `items`
    #[error("Array instance at {path} has no items schema")]
    MissingItems { path: String },
}

/// How an entry was reached from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkKey<'a> {
    /// The schema root
    Root,
    /// A named property of an object instance
    Property(&'a str),
    /// The item schema of an array instance
    Items,
}

/// One visited schema instance
#[derive(Debug, Clone, Copy)]
pub struct WalkEntry<'a> {
    /// JSONPath of the instance, with `[*]` for array items
    pub path: &'a str,
    /// Nesting depth, zero for the root
    pub depth: usize,
    /// How this instance hangs off its parent
    pub key: WalkKey<'a>,
    /// Raw schema fragment describing the instance
    pub fragment: &'a Value,
}

/// Walk `schema` depth-first, calling `visit` once per instance path
///
/// The first error, from either the walker or the visitor, aborts the walk.
pub fn walk<F, E>(schema: &Value, mut visit: F) -> Result<(), E>
where
    F: FnMut(&WalkEntry<'_>) -> Result<(), E>,
    E: From<WalkError>,
{
    walk_fragment(schema, ROOT_PATH, 0, WalkKey::Root, &mut visit)
}

fn walk_fragment<F, E>(
    fragment: &Value,
    path: &str,
    depth: usize,
    key: WalkKey<'_>,
    visit: &mut F,
) -> Result<(), E>
where
    F: FnMut(&WalkEntry<'_>) -> Result<(), E>,
    E: From<WalkError>,
{
    let object = fragment.as_object().ok_or_else(|| WalkError::NotAnObject {
        path: path.to_string(),
    })?;

    visit(&WalkEntry {
        path,
        depth,
        key,
        fragment,
    })?;

    match schema_type(fragment) {
        Some("object") => {
            let properties = object
                .get("properties")
                .and_then(Value::as_object)
                .ok_or_else(|| WalkError::MissingProperties {
                    path: path.to_string(),
                })?;

            for (name, property) in properties {
                let child = child_path(path, name);
                walk_fragment(property, &child, depth + 1, WalkKey::Property(name), visit)?;
            }
        }
        Some("array") => {
            let items = object
                .get("items")
                .filter(|items| items.is_object())
                .ok_or_else(|| WalkError::MissingItems {
                    path: path.to_string(),
                })?;

            walk_fragment(items, &item_path(path), depth + 1, WalkKey::Items, visit)?;
        }
        _ => {}
    }

    Ok(())
}

/// Resolve the declared type of a schema fragment
///
/// Accepts a plain `"type"` string or a type list (the first non-`null`
/// entry wins). Without a `type`, the presence of `properties` or `items`
/// implies `object` or `array`.
pub fn schema_type(fragment: &Value) -> Option<&str> {
    match fragment.get("type") {
        Some(Value::String(name)) => Some(name.as_str()),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null"),
        _ if fragment.get("properties").is_some() => Some("object"),
        _ if fragment.get("items").is_some() => Some("array"),
        _ => None,
    }
}

/// Build the path of a named property below `parent`
///
/// Plain identifiers use dot notation, anything else is quoted in brackets.
pub fn child_path(parent: &str, name: &str) -> String {
    let is_identifier = !name.is_empty()
        && name
            .chars()
            .next()
            .map(|c| c.is_alphabetic() || c == '_')
            .unwrap_or(false)
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-');

    if is_identifier {
        format!("{}.{}", parent, name)
    } else {
        format!("{}['{}']", parent, name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Build the templated item path of an array at `parent`
pub fn item_path(parent: &str) -> String {
    format!("{}[*]", parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(schema: &Value) -> Result<Vec<(String, usize)>, WalkError> {
        let mut entries = Vec::new();
        walk(schema, |entry| {
            entries.push((entry.path.to_string(), entry.depth));
            Ok::<(), WalkError>(())
        })?;
        Ok(entries)
    }

    #[test]
    fn test_walk_declaration_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "number"},
                "mid": {
                    "type": "object",
                    "properties": {"inner": {"type": "boolean"}}
                }
            }
        });

        let entries = collect(&schema).unwrap();
        let paths: Vec<&str> = entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["$", "$.zeta", "$.alpha", "$.mid", "$.mid.inner"]);
        assert_eq!(entries[4].1, 2);
    }

    #[test]
    fn test_walk_array_items_templated_once() {
        let schema = json!({
            "type": "object",
            "properties": {
                "grid": {
                    "type": "array",
                    "items": {"type": "array", "items": {"type": "string"}}
                }
            }
        });

        let entries = collect(&schema).unwrap();
        let paths: Vec<&str> = entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["$", "$.grid", "$.grid[*]", "$.grid[*][*]"]);
    }

    #[test]
    fn test_walk_missing_properties_aborts() {
        let schema = json!({
            "type": "object",
            "properties": {"broken": {"type": "object"}}
        });

        let err = collect(&schema).unwrap_err();
        assert_eq!(
            err,
            WalkError::MissingProperties {
                path: "$.broken".to_string()
            }
        );
    }

    #[test]
    fn test_walk_missing_items_aborts() {
        let schema = json!({"type": "array"});
        assert_eq!(
            collect(&schema).unwrap_err(),
            WalkError::MissingItems {
                path: "$".to_string()
            }
        );
    }

    #[test]
    fn test_visitor_error_stops_walk() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}}
        });

        let mut seen = 0;
        let result = walk(&schema, |entry| {
            seen += 1;
            if entry.path == "$.a" {
                return Err(WalkError::NotAnObject {
                    path: entry.path.to_string(),
                });
            }
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_schema_type_inference() {
        assert_eq!(schema_type(&json!({"type": "string"})), Some("string"));
        assert_eq!(schema_type(&json!({"type": ["null", "integer"]})), Some("integer"));
        assert_eq!(schema_type(&json!({"properties": {}})), Some("object"));
        assert_eq!(schema_type(&json!({"items": {}})), Some("array"));
        assert_eq!(schema_type(&json!({"default": 1})), None);
    }

    #[test]
    fn test_child_path_quoting() {
        assert_eq!(child_path("$", "title"), "$.title");
        assert_eq!(child_path("$", "publish-url"), "$.publish-url");
        assert_eq!(child_path("$.a", "two words"), "$.a['two words']");
        assert_eq!(child_path("$", "it's"), "$['it\\'s']");
        assert_eq!(item_path("$.crops"), "$.crops[*]");
    }
}
