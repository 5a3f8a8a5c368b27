//! Abstract syntax tree definitions for JSONPath expressions
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use reshape_schemas::child_path;
use std::fmt;

/// A parsed JSONPath expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    /// Which node the expression starts from
    pub root: Root,
    /// Chain of selectors applied after the root
    pub selectors: Vec<Selector>,
}

/// Root of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    /// `$`, the document root
    Document,
    /// `@`, the current node
    Current,
}

/// Individual selector in a JSONPath expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Child property selector (`.property` or `['property']`)
    Child(String),
    /// Array index selector (`[index]`)
    Index(IndexSelector),
    /// Wildcard selector (`*` or `[*]`)
    Wildcard,
    /// Recursive descent selector (`..`)
    RecursiveDescent,
}

/// Array index selector variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexSelector {
    /// Positive index from start
    Positive(usize),
    /// Negative index from end, `[-1]` is the last element
    Negative(usize),
}

impl Expression {
    /// Create a new expression
    pub fn new(root: Root, selectors: Vec<Selector>) -> Self {
        Self { root, selectors }
    }

    /// Whether the expression selects at most one node
    pub fn is_definite(&self) -> bool {
        self.selectors
            .iter()
            .all(|selector| matches!(selector, Selector::Child(_) | Selector::Index(_)))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Root::Document => write!(f, "$")?,
            Root::Current => write!(f, "@")?,
        }

        let mut after_descent = false;
        for selector in &self.selectors {
            match selector {
                Selector::Child(name) => {
                    let rendered = child_path("", name);
                    match rendered.strip_prefix('.') {
                        Some(bare) if after_descent => write!(f, "{}", bare)?,
                        _ => write!(f, "{}", rendered)?,
                    }
                }
                Selector::Index(IndexSelector::Positive(index)) => write!(f, "[{}]", index)?,
                Selector::Index(IndexSelector::Negative(index)) => write!(f, "[-{}]", index)?,
                Selector::Wildcard if after_descent => write!(f, "*")?,
                Selector::Wildcard => write!(f, "[*]")?,
                Selector::RecursiveDescent => write!(f, "..")?,
            }
            after_descent = matches!(selector, Selector::RecursiveDescent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_canonical_form() {
        let expression = Expression::new(
            Root::Document,
            vec![
                Selector::Child("crops".to_string()),
                Selector::Wildcard,
                Selector::Child("two words".to_string()),
                Selector::Index(IndexSelector::Negative(1)),
            ],
        );
        assert_eq!(expression.to_string(), "$.crops[*]['two words'][-1]");
        assert!(!expression.is_definite());
    }

    #[test]
    fn test_display_recursive_descent() {
        let expression = Expression::new(
            Root::Current,
            vec![Selector::RecursiveDescent, Selector::Child("id".to_string())],
        );
        assert_eq!(expression.to_string(), "@..id");
    }
}
