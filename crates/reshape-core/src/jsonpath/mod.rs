//! JSONPath engine used for rule sources, output paths and operation arguments
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod executor;
pub mod parser;

pub use ast::{Expression, IndexSelector, Root, Selector};
pub use error::JSONPathError;
pub use executor::Executor;
pub use parser::Parser;

use crate::Result;
use serde_json::Value;
use std::fmt;

/// High-level JSONPath expression for convenient API usage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JSONPath {
    expression: Expression,
}

impl JSONPath {
    /// Parse a JSONPath expression
    pub fn parse(path: &str) -> Result<Self> {
        let expression = Parser::new(path)?.parse()?;
        Ok(Self { expression })
    }

    /// Execute the JSONPath against the given data
    pub fn execute<'a>(&self, data: &'a Value) -> Vec<&'a Value> {
        Executor::new().execute(&self.expression, data)
    }

    /// Execute and return the first match, if any
    pub fn execute_single<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.execute(data).into_iter().next()
    }

    /// Whether the path selects at most one node
    pub fn is_definite(&self) -> bool {
        self.expression.is_definite()
    }

    /// Get the parsed expression for inspection
    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

impl fmt::Display for JSONPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// Select every match of `path` in `data`
pub fn select<'a>(path: &str, data: &'a Value) -> Result<Vec<&'a Value>> {
    Ok(JSONPath::parse(path)?.execute(data))
}

/// Select the first match of `path` in `data`
pub fn select_single<'a>(path: &str, data: &'a Value) -> Result<Option<&'a Value>> {
    Ok(JSONPath::parse(path)?.execute_single(data))
}
