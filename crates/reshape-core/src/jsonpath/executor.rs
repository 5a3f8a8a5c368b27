//! JSONPath expression executor
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::ast::{Expression, IndexSelector, Selector};
use serde_json::Value;

/// Evaluates parsed expressions against JSON values
#[derive(Debug, Default, Clone, Copy)]
pub struct Executor;

impl Executor {
    /// Create a new executor
    pub fn new() -> Self {
        Self
    }

    /// Execute `expression` with `data` as its root
    ///
    /// Both `$` and `@` roots resolve to `data`. Matches come back in document
    /// order.
    pub fn execute<'a>(&self, expression: &Expression, data: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![data];

        for selector in &expression.selectors {
            let mut next = Vec::new();
            for value in current {
                self.execute_selector(selector, value, &mut next);
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }

        current
    }

    fn execute_selector<'a>(&self, selector: &Selector, value: &'a Value, out: &mut Vec<&'a Value>) {
        match selector {
            Selector::Child(name) => {
                if let Some(child) = value.as_object().and_then(|map| map.get(name)) {
                    out.push(child);
                }
            }
            Selector::Index(index) => {
                if let Some(element) = value.as_array().and_then(|array| resolve_index(array, *index)) {
                    out.push(element);
                }
            }
            Selector::Wildcard => match value {
                Value::Object(map) => out.extend(map.values()),
                Value::Array(array) => out.extend(array.iter()),
                _ => {}
            },
            Selector::RecursiveDescent => collect_descendants(value, out),
        }
    }
}

fn resolve_index(array: &[Value], index: IndexSelector) -> Option<&Value> {
    match index {
        IndexSelector::Positive(i) => array.get(i),
        IndexSelector::Negative(i) => array.len().checked_sub(i).and_then(|i| array.get(i)),
    }
}

fn collect_descendants<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    out.push(value);
    match value {
        Value::Object(map) => map.values().for_each(|child| collect_descendants(child, out)),
        Value::Array(array) => array.iter().for_each(|child| collect_descendants(child, out)),
        _ => {}
    }
}
