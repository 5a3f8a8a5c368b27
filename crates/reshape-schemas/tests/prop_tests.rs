//! Property-based tests for schema walking
//!
//! Generated schemas are nested objects and arrays with scalar leaves; the
//! walker must visit every instance exactly once, parents before children.

use proptest::prelude::*;
use reshape_schemas::{walk, WalkError};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Strategy for schema fragments together with their instance count
fn schema_strategy() -> impl Strategy<Value = (Value, usize)> {
    let leaf = prop_oneof![
        Just("string"),
        Just("number"),
        Just("integer"),
        Just("boolean"),
    ]
    .prop_map(|t| (json!({ "type": t }), 1usize));

    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|(items, count)| {
                (json!({"type": "array", "items": items}), count + 1)
            }),
            proptest::collection::vec(inner, 1..4).prop_map(|children| {
                let mut properties = Map::new();
                let mut count = 1;
                for (i, (child, child_count)) in children.into_iter().enumerate() {
                    properties.insert(format!("p{}", i), child);
                    count += child_count;
                }
                (json!({"type": "object", "properties": properties}), count)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn walk_visits_every_instance_once((schema, count) in schema_strategy()) {
        let mut paths = Vec::new();
        walk(&schema, |entry| {
            paths.push(entry.path.to_string());
            Ok::<(), WalkError>(())
        }).unwrap();

        prop_assert_eq!(paths.len(), count);
        let unique: HashSet<&String> = paths.iter().collect();
        prop_assert_eq!(unique.len(), count);
    }

    #[test]
    fn walk_visits_parents_first((schema, _count) in schema_strategy()) {
        let mut seen: HashSet<String> = HashSet::new();
        walk(&schema, |entry| {
            if entry.depth > 0 {
                let parent = if let Some(stripped) = entry.path.strip_suffix("[*]") {
                    stripped.to_string()
                } else {
                    let cut = entry.path.rfind('.').unwrap_or(0);
                    entry.path[..cut].to_string()
                };
                assert!(seen.contains(&parent), "{} visited before {}", entry.path, parent);
            }
            seen.insert(entry.path.to_string());
            Ok::<(), WalkError>(())
        }).unwrap();
    }
}
