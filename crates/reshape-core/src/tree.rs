//! Output document assembly
//!
//! [`TreeBuilder`] writes values at concrete JSONPath addresses, creating
//! the objects and arrays along the way. Index segments extend arrays,
//! padding skipped positions with empty objects.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::jsonpath::{IndexSelector, JSONPath, Selector};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// One addressable step of a concrete path
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Incrementally built output document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeBuilder {
    root: Value,
}

impl TreeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` at `path`; writing `None` is a no-op
    pub fn write(&mut self, path: &str, value: Option<Value>) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };

        let segments = segments(path)?;
        let mut node = &mut self.root;
        for (depth, segment) in segments.iter().enumerate() {
            node = step_mut(node, segment).ok_or_else(|| Error::Tree {
                path: path.to_string(),
                message: format!(
                    "cannot address {} through a non-container value at depth {}",
                    describe(segment),
                    depth
                ),
            })?;
        }

        *node = value;
        Ok(())
    }

    /// Read the value at a concrete `path`
    pub fn get(&self, path: &str) -> Result<Option<&Value>> {
        let segments = segments(path)?;
        let mut node = &self.root;
        for segment in &segments {
            let next = match (segment, node) {
                (Segment::Key(key), Value::Object(map)) => map.get(key),
                (Segment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            };
            match next {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok((!node.is_null()).then_some(node))
    }

    /// Move the value at `path` out of the document
    ///
    /// The vacated slot is left as `null` so sibling indices do not shift.
    pub fn take(&mut self, path: &str) -> Result<Option<Value>> {
        let segments = segments(path)?;
        let mut node = &mut self.root;
        for segment in &segments {
            let next = match (segment, node) {
                (Segment::Key(key), Value::Object(map)) => map.get_mut(key),
                (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
                _ => None,
            };
            match next {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        let value = node.take();
        Ok((!value.is_null()).then_some(value))
    }

    /// Discard everything written so far
    pub fn clear(&mut self) {
        self.root = Value::Null;
    }

    /// The document as built so far
    pub fn document(&self) -> &Value {
        &self.root
    }

    /// Finish building; an untouched builder yields `{}`
    pub fn into_document(self) -> Value {
        match self.root {
            Value::Null => Value::Object(Map::new()),
            other => other,
        }
    }
}

fn segments(path: &str) -> Result<Vec<Segment>> {
    let parsed = JSONPath::parse(path)?;
    parsed
        .expression()
        .selectors
        .iter()
        .map(|selector| match selector {
            Selector::Child(key) => Ok(Segment::Key(key.clone())),
            Selector::Index(IndexSelector::Positive(index)) => Ok(Segment::Index(*index)),
            _ => Err(Error::Tree {
                path: path.to_string(),
                message: "output paths must be concrete".to_string(),
            }),
        })
        .collect()
}

/// Descend one segment, creating the container when the slot is empty
fn step_mut<'a>(node: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    if node.is_null() {
        *node = match segment {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        };
    }

    match (segment, node) {
        (Segment::Key(key), Value::Object(map)) => Some(map.entry(key.clone()).or_insert(Value::Null)),
        (Segment::Index(index), Value::Array(items)) => {
            while items.len() < *index {
                items.push(Value::Object(Map::new()));
            }
            if items.len() == *index {
                items.push(Value::Null);
            }
            items.get_mut(*index)
        }
        _ => None,
    }
}

fn describe(segment: &Segment) -> String {
    match segment {
        Segment::Key(key) => format!("key '{}'", key),
        Segment::Index(index) => format!("index {}", index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_write_creates_intermediate_containers() {
        let mut tree = TreeBuilder::new();
        tree.write("$.URL.absolute", Some(json!("a"))).unwrap();
        tree.write("$.crops[1].name", Some(json!("n"))).unwrap();
        tree.write("$['two words']", Some(json!(true))).unwrap();

        assert_eq!(
            tree.into_document(),
            json!({
                "URL": {"absolute": "a"},
                "crops": [{}, {"name": "n"}],
                "two words": true
            })
        );
    }

    #[test]
    fn test_write_none_is_noop() {
        let mut tree = TreeBuilder::new();
        tree.write("$.a.b", None).unwrap();
        assert_eq!(tree.document(), &Value::Null);
        assert_eq!(tree.into_document(), json!({}));
    }

    #[test]
    fn test_overwrite_leaf_replaces() {
        let mut tree = TreeBuilder::new();
        tree.write("$.a", Some(json!(1))).unwrap();
        tree.write("$.a", Some(json!({"b": 2}))).unwrap();
        assert_eq!(tree.document(), &json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_write_through_conflict_errors() {
        let mut tree = TreeBuilder::new();
        tree.write("$.a", Some(json!("leaf"))).unwrap();
        let err = tree.write("$.a.b", Some(json!(1))).unwrap_err();
        assert!(matches!(err, Error::Tree { ref path, .. } if path == "$.a.b"));

        tree.write("$.list", Some(json!([]))).unwrap();
        assert!(tree.write("$.list.key", Some(json!(1))).is_err());
    }

    #[test]
    fn test_non_concrete_path_rejected() {
        let mut tree = TreeBuilder::new();
        assert!(tree.write("$.crops[*].name", Some(json!(1))).is_err());
        assert!(tree.write("$.items[-1]", Some(json!(1))).is_err());
        assert!(tree.get("$..name").is_err());
    }

    #[test]
    fn test_root_write_replaces_document() {
        let mut tree = TreeBuilder::new();
        tree.write("$", Some(json!({"x": 1}))).unwrap();
        assert_eq!(tree.get("$.x").unwrap(), Some(&json!(1)));
    }

    #[test]
    fn test_get_and_take() {
        let mut tree = TreeBuilder::new();
        tree.write("$.crops[0].name", Some(json!("a"))).unwrap();
        tree.write("$.crops[1].name", Some(json!("b"))).unwrap();

        assert_eq!(tree.get("$.crops[1].name").unwrap(), Some(&json!("b")));
        assert_eq!(tree.get("$.crops[5]").unwrap(), None);
        assert_eq!(tree.take("$.crops[0]").unwrap(), Some(json!({"name": "a"})));
        assert_eq!(tree.take("$.crops[0]").unwrap(), None);
        assert_eq!(tree.get("$.crops[1].name").unwrap(), Some(&json!("b")));
    }

    proptest! {
        #[test]
        fn prop_index_write_pads_with_empty_objects(index in 0usize..32, value in any::<i64>()) {
            let mut tree = TreeBuilder::new();
            tree.write(&format!("$.items[{}]", index), Some(json!(value))).unwrap();

            let items = tree.get("$.items").unwrap().and_then(Value::as_array).cloned().unwrap();
            prop_assert_eq!(items.len(), index + 1);
            let empty = json!({});
            prop_assert!(items[..index].iter().all(|item| item == &empty));
            prop_assert_eq!(&items[index], &json!(value));
        }

        #[test]
        fn prop_written_value_reads_back(keys in proptest::collection::vec("[a-z][a-z0-9_]{0,8}", 1..5), value in ".*") {
            let path = keys.iter().fold("$".to_string(), |path, key| format!("{}.{}", path, key));
            let mut tree = TreeBuilder::new();
            tree.write(&path, Some(json!(value.clone()))).unwrap();
            prop_assert_eq!(tree.get(&path).unwrap(), Some(&json!(value)));
        }
    }
}
