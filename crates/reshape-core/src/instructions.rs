//! Transform rules attached to schema instances
//!
//! A schema instance carries a `transform` block keyed by rule-set
//! identifier. Each entry lists candidate sources in priority order and says
//! how their values combine:
//!
//! ```json
//! "transform": {
//!   "cms": {
//!     "from": [{"jsonPath": "@.title", "operations": [{"type": "trim"}]}],
//!     "method": "concatenate",
//!     "methodOptions": {"concatenateDelimiter": " / "}
//!   }
//! }
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::jsonpath::JSONPath;
use crate::operations::{Operation, OperationSpec};
use crate::types::{InstanceType, ScalarKind};
use crate::xml::NodePath;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How values from several sources combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// First source producing a value wins
    #[default]
    First,
    /// Last source producing a value wins
    Last,
    /// Join every produced string with the delimiter
    Concatenate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct InstructionsSpec {
    from: Vec<SourceSpec>,
    #[serde(default)]
    method: Method,
    #[serde(default)]
    method_options: MethodOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MethodOptions {
    #[serde(default)]
    concatenate_delimiter: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SourceSpec {
    json_path: Option<String>,
    xml_path: Option<String>,
    #[serde(default)]
    operations: Vec<OperationSpec>,
}

/// One candidate source of a value
#[derive(Debug, Clone)]
pub struct SourceReference {
    /// JSONPath with any leading `@` already expanded; may contain `[*]`
    pub json_path: Option<String>,
    /// Node path for XML input
    pub xml_path: Option<NodePath>,
    /// Operations applied in order to the looked-up value
    pub operations: Vec<Operation>,
}

/// Parsed rule for one schema instance and rule set
#[derive(Debug, Clone)]
pub struct TransformInstructions {
    pub sources: Vec<SourceReference>,
    pub method: Method,
    pub delimiter: String,
}

impl TransformInstructions {
    /// Parse the rule `block` attached to the instance at `path`
    ///
    /// A leading `@` in a `jsonPath` is replaced with `enclosing`, the path of
    /// the object or array the instance belongs to.
    pub fn parse(block: &Value, path: &str, enclosing: &str, instance: InstanceType) -> Result<Self> {
        let spec: InstructionsSpec = serde_json::from_value(block.clone())
            .map_err(|e| Error::schema(path, format!("invalid transform rule: {}", e)))?;

        if spec.from.is_empty() {
            return Err(Error::schema(path, "transform rule has no sources"));
        }
        if spec.method == Method::Concatenate
            && !matches!(
                instance,
                InstanceType::Scalar(ScalarKind::String) | InstanceType::Scalar(ScalarKind::DateTime)
            )
        {
            return Err(Error::schema(
                path,
                format!("concatenate requires a string instance, found {}", instance),
            ));
        }

        let sources = spec
            .from
            .into_iter()
            .map(|source| SourceReference::parse(source, path, enclosing))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sources,
            method: spec.method,
            delimiter: spec.method_options.concatenate_delimiter,
        })
    }
}

impl SourceReference {
    fn parse(spec: SourceSpec, path: &str, enclosing: &str) -> Result<Self> {
        if spec.json_path.is_none() && spec.xml_path.is_none() {
            return Err(Error::schema(path, "source needs a jsonPath or an xmlPath"));
        }

        let json_path = spec
            .json_path
            .map(|json_path| {
                let expanded = expand_current(&json_path, enclosing);
                JSONPath::parse(&expanded)
                    .map_err(|e| Error::schema(path, format!("invalid jsonPath '{}': {}", json_path, e)))?;
                Ok::<_, Error>(expanded)
            })
            .transpose()?;

        let xml_path = spec
            .xml_path
            .map(|xml_path| NodePath::parse(&xml_path).map_err(|e| Error::schema(path, e.to_string())))
            .transpose()?;

        let operations = spec
            .operations
            .iter()
            .map(|operation| Operation::parse(operation).map_err(|e| Error::schema(path, e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            json_path,
            xml_path,
            operations,
        })
    }
}

/// Replace a leading `@` with the enclosing path
fn expand_current(json_path: &str, enclosing: &str) -> String {
    match json_path.trim().strip_prefix('@') {
        Some(rest) => format!("{}{}", enclosing, rest),
        None => json_path.trim().to_string(),
    }
}

/// Join strings, inserting `delimiter` only between two non-empty parts
///
/// Returns `None` when there are no values at all.
pub fn concatenate<I>(values: I, delimiter: &str) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut values = values.into_iter();
    let mut joined = values.next()?;
    for value in values {
        if !joined.is_empty() && !value.is_empty() {
            joined.push_str(delimiter);
        }
        joined.push_str(&value);
    }
    Some(joined)
}
