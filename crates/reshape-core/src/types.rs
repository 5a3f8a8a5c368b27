//! Shared value types for the transform engine
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of a raw input document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// JSON text, queried with JSONPath
    Json,
    /// XML text, queried with node paths
    Xml,
}

impl InputFormat {
    /// Guess the format of a raw document from its first significant byte
    pub fn detect(raw: &[u8]) -> Self {
        // Skip a UTF-8 byte order mark before looking for '<'
        let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
        match raw.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'<') => InputFormat::Xml,
            _ => InputFormat::Json,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::Xml => write!(f, "XML"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "xml" => Ok(InputFormat::Xml),
            other => Err(format!("unknown input format '{}'", other)),
        }
    }
}

/// Kind of a scalar schema instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarKind {
    Boolean,
    Number,
    Integer,
    String,
    /// A string declared with `format: "date-time"`
    DateTime,
}

/// Closed set of schema instance shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceType {
    Scalar(ScalarKind),
    Object,
    Array,
}

impl InstanceType {
    /// Resolve a schema `type` name and optional `format`
    pub fn from_schema(type_name: &str, format: Option<&str>) -> Option<Self> {
        let instance = match type_name {
            "object" => InstanceType::Object,
            "array" => InstanceType::Array,
            "boolean" => InstanceType::Scalar(ScalarKind::Boolean),
            "number" => InstanceType::Scalar(ScalarKind::Number),
            "integer" => InstanceType::Scalar(ScalarKind::Integer),
            "string" if format == Some("date-time") => InstanceType::Scalar(ScalarKind::DateTime),
            "string" => InstanceType::Scalar(ScalarKind::String),
            _ => return None,
        };
        Some(instance)
    }

    /// The scalar kind, for scalar instances
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            InstanceType::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Boolean => "boolean",
            ScalarKind::Number => "number",
            ScalarKind::Integer => "integer",
            ScalarKind::String => "string",
            ScalarKind::DateTime => "date-time",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceType::Scalar(kind) => write!(f, "{}", kind),
            InstanceType::Object => write!(f, "object"),
            InstanceType::Array => write!(f, "array"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(InputFormat::detect(b"  <feed/>"), InputFormat::Xml);
        assert_eq!(InputFormat::detect(b"\xEF\xBB\xBF<?xml version=\"1.0\"?><a/>"), InputFormat::Xml);
        assert_eq!(InputFormat::detect(b"{\"a\": 1}"), InputFormat::Json);
        assert_eq!(InputFormat::detect(b""), InputFormat::Json);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("XML".parse::<InputFormat>().unwrap(), InputFormat::Xml);
        assert!("csv".parse::<InputFormat>().is_err());
    }

    #[test]
    fn test_instance_type_from_schema() {
        assert_eq!(
            InstanceType::from_schema("string", Some("date-time")),
            Some(InstanceType::Scalar(ScalarKind::DateTime))
        );
        assert_eq!(
            InstanceType::from_schema("string", Some("uri")),
            Some(InstanceType::Scalar(ScalarKind::String))
        );
        assert_eq!(InstanceType::from_schema("array", None), Some(InstanceType::Array));
        assert_eq!(InstanceType::from_schema("null", None), None);
        assert_eq!(InstanceType::Scalar(ScalarKind::DateTime).to_string(), "date-time");
    }
}
