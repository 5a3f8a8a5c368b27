//! Named, argument-validated value operations
//!
//! Each operation takes one JSON value and produces one JSON value. Operations
//! are declared in transform rules as `{"type": "...", "args": {...}}`; the
//! argument set of every operation kind is checked when the rules are parsed,
//! so a transformer never starts with a misconfigured chain.
//!
//! # Module Organization
//!
//! - [`built_in`] - Implementations of the operation kinds
//! - `tests` - Behavior tests for every kind
//!
//! # Examples
//!
//! ```
//! use reshape_core::operations::{Operation, OperationSpec};
//! use serde_json::json;
//!
//! let spec: OperationSpec = serde_json::from_value(json!({"type": "duration"})).unwrap();
//! let duration = Operation::parse(&spec).unwrap();
//! assert_eq!(duration.apply(json!("01:13")).unwrap(), json!(73));
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod built_in;


use crate::jsonpath::JSONPath;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Wire form of an operation inside a source reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation kind, e.g. `changeCase`
    #[serde(rename = "type")]
    pub kind: String,
    /// Named string arguments
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

/// Errors raised while building or running an operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    /// No operation of this kind exists
    #[error("unknown operation '{0}'")]
    Unknown(String),

    /// Arguments do not match the kind's required set
    #[error("invalid arguments for '{operation}': {message}")]
    InvalidArguments { operation: String, message: String },

    /// The input value has the wrong shape
    #[error("expected {expected}, found {found}")]
    InvalidInput { expected: String, found: String },

    /// The input had the right shape but could not be processed
    #[error("{0}")]
    Failed(String),
}

impl OperationError {
    pub(crate) fn invalid_input(expected: &str, found: &Value) -> Self {
        Self::InvalidInput {
            expected: expected.to_string(),
            found: type_name(found).to_string(),
        }
    }
}

/// Target case for `changeCase`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

/// A parsed, ready-to-run operation
#[derive(Debug, Clone)]
pub enum Operation {
    ChangeCase { to: Case },
    Inverse,
    Duration,
    Max { by: JSONPath, ret: JSONPath },
    Replace { regex: Regex, new: String },
    Split { on: String },
    TimeParse { format: String, layout: String },
    StringToInteger,
    ToCamelCase,
    Trim,
    Join { on: String },
}

/// Required argument names per operation kind
static OPERATION_ARGS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let table: [(&'static str, &'static [&'static str]); 11] = [
        ("changeCase", &["to"]),
        ("inverse", &[]),
        ("duration", &[]),
        ("max", &["by", "return"]),
        ("replace", &["regex", "new"]),
        ("split", &["on"]),
        ("timeParse", &["format", "layout"]),
        ("stringToInteger", &[]),
        ("toCamelCase", &[]),
        ("trim", &[]),
        ("join", &["on"]),
    ];
    table.into_iter().collect()
});

impl Operation {
    /// Build an operation from its wire form
    pub fn parse(spec: &OperationSpec) -> Result<Self, OperationError> {
        let required = OPERATION_ARGS
            .get(spec.kind.as_str())
            .ok_or_else(|| OperationError::Unknown(spec.kind.clone()))?;
        check_arguments(&spec.kind, required, &spec.args)?;

        let arg = |name: &str| spec.args.get(name).cloned().unwrap_or_default();
        let invalid = |message: String| OperationError::InvalidArguments {
            operation: spec.kind.clone(),
            message,
        };

        let operation = match spec.kind.as_str() {
            "changeCase" => match arg("to").as_str() {
                "upper" => Operation::ChangeCase { to: Case::Upper },
                "lower" => Operation::ChangeCase { to: Case::Lower },
                other => return Err(invalid(format!("'to' must be upper or lower, got '{}'", other))),
            },
            "inverse" => Operation::Inverse,
            "duration" => Operation::Duration,
            "max" => {
                let path = |name: &str| {
                    JSONPath::parse(&arg(name)).map_err(|e| invalid(format!("'{}' is not a valid path: {}", name, e)))
                };
                Operation::Max {
                    by: path("by")?,
                    ret: path("return")?,
                }
            }
            "replace" => Operation::Replace {
                regex: Regex::new(&arg("regex")).map_err(|e| invalid(e.to_string()))?,
                new: arg("new"),
            },
            "split" => {
                let on = arg("on");
                if on.is_empty() {
                    return Err(invalid("'on' must not be empty".to_string()));
                }
                Operation::Split { on }
            }
            "join" => Operation::Join { on: arg("on") },
            "timeParse" => {
                let format = arg("format");
                let layout = arg("layout");
                built_in::check_time_layout(&format).map_err(|e| invalid(format!("'format': {}", e)))?;
                built_in::check_time_layout(&layout).map_err(|e| invalid(format!("'layout': {}", e)))?;
                Operation::TimeParse { format, layout }
            }
            "stringToInteger" => Operation::StringToInteger,
            "toCamelCase" => Operation::ToCamelCase,
            "trim" => Operation::Trim,
            other => return Err(OperationError::Unknown(other.to_string())),
        };

        Ok(operation)
    }

    /// Wire name of the operation kind
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ChangeCase { .. } => "changeCase",
            Operation::Inverse => "inverse",
            Operation::Duration => "duration",
            Operation::Max { .. } => "max",
            Operation::Replace { .. } => "replace",
            Operation::Split { .. } => "split",
            Operation::TimeParse { .. } => "timeParse",
            Operation::StringToInteger => "stringToInteger",
            Operation::ToCamelCase => "toCamelCase",
            Operation::Trim => "trim",
            Operation::Join { .. } => "join",
        }
    }

    /// Run the operation on one value
    pub fn apply(&self, value: Value) -> Result<Value, OperationError> {
        match self {
            Operation::ChangeCase { to } => built_in::change_case(value, *to),
            Operation::Inverse => built_in::inverse(value),
            Operation::Duration => built_in::duration(value),
            Operation::Max { by, ret } => built_in::max(value, by, ret),
            Operation::Replace { regex, new } => built_in::replace(value, regex, new),
            Operation::Split { on } => built_in::split(value, on),
            Operation::TimeParse { format, layout } => built_in::time_parse(value, format, layout),
            Operation::StringToInteger => built_in::string_to_integer(value),
            Operation::ToCamelCase => built_in::to_camel_case(value),
            Operation::Trim => built_in::trim(value),
            Operation::Join { on } => built_in::join(value, on),
        }
    }
}

fn check_arguments(
    kind: &str,
    required: &[&str],
    args: &BTreeMap<String, String>,
) -> Result<(), OperationError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !args.contains_key(*name))
        .collect();
    let extra: Vec<&str> = args
        .keys()
        .map(String::as_str)
        .filter(|name| !required.contains(name))
        .collect();

    if missing.is_empty() && extra.is_empty() {
        return Ok(());
    }

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        problems.push(format!("unexpected {}", extra.join(", ")));
    }
    Err(OperationError::InvalidArguments {
        operation: kind.to_string(),
        message: problems.join("; "),
    })
}

/// Short JSON type name used in error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
