//! Values flowing out of input lookups
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::xml::XmlNode;
use serde_json::Value;

/// A value resolved from the input document
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValue {
    /// A JSON value, or the result of an operation chain
    Json(Value),
    /// A non-empty XML node-set in document order
    Nodes(Vec<XmlNode>),
}

impl SourceValue {
    /// Wrap a node-set, treating an empty set as nil
    pub fn from_nodes(nodes: Vec<XmlNode>) -> Option<Self> {
        (!nodes.is_empty()).then_some(SourceValue::Nodes(nodes))
    }

    /// Wrap a JSON value, treating `null` as nil
    pub fn from_json(value: Value) -> Option<Self> {
        (!value.is_null()).then_some(SourceValue::Json(value))
    }

    /// Text of the first node, trimmed
    pub fn node_text(&self) -> Option<String> {
        match self {
            SourceValue::Nodes(nodes) => nodes.first().map(|node| node.inner_text().trim().to_string()),
            SourceValue::Json(_) => None,
        }
    }

    /// Convert into a JSON value
    ///
    /// A single node becomes its trimmed text; several nodes become an array
    /// of texts.
    pub fn into_json(self) -> Value {
        match self {
            SourceValue::Json(value) => value,
            SourceValue::Nodes(mut nodes) if nodes.len() == 1 => {
                Value::String(nodes.remove(0).inner_text().trim().to_string())
            }
            SourceValue::Nodes(nodes) => Value::Array(
                nodes
                    .iter()
                    .map(|node| Value::String(node.inner_text().trim().to_string()))
                    .collect(),
            ),
        }
    }

    /// Split into per-element seeds for an array sub-walk
    ///
    /// JSON arrays yield their elements, node-sets yield one seed per node and
    /// anything else is a single seed.
    pub fn into_seeds(self) -> Vec<SourceValue> {
        match self {
            SourceValue::Json(Value::Array(items)) => items.into_iter().map(SourceValue::Json).collect(),
            SourceValue::Nodes(nodes) => nodes.into_iter().map(|node| SourceValue::Nodes(vec![node])).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{NodePath, XmlDocument};
    use serde_json::json;

    fn items() -> Vec<XmlNode> {
        let document = XmlDocument::parse("<r><i> a </i><i>b</i></r>").unwrap();
        document.select(&NodePath::parse("/r/i").unwrap(), None)
    }

    #[test]
    fn test_nil_detection() {
        assert_eq!(SourceValue::from_json(Value::Null), None);
        assert_eq!(SourceValue::from_nodes(Vec::new()), None);
        assert!(SourceValue::from_json(json!(0)).is_some());
    }

    #[test]
    fn test_node_set_into_json() {
        let nodes = items();
        assert_eq!(SourceValue::Nodes(nodes[..1].to_vec()).into_json(), json!("a"));
        assert_eq!(SourceValue::Nodes(nodes).into_json(), json!(["a", "b"]));
    }

    #[test]
    fn test_into_seeds() {
        assert_eq!(SourceValue::Json(json!([1, null])).into_seeds().len(), 2);
        assert_eq!(SourceValue::Json(json!({"a": 1})).into_seeds().len(), 1);
        assert_eq!(SourceValue::Nodes(items()).into_seeds().len(), 2);
    }
}
