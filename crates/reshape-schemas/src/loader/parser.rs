//! Schema document formats
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;

/// Supported schema document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(LoaderError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse `content` in this format; `path` is only used for error context
    pub fn parse(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        match self {
            Format::Json => {
                serde_json::from_str(content).map_err(|e| LoaderError::json_parse(path, e))
            }
            Format::Yaml => {
                // Go through serde_yaml::Value first so YAML errors keep their own type
                let yaml: serde_yaml::Value = serde_yaml::from_str(content)
                    .map_err(|e| LoaderError::yaml_parse(path, e))?;
                serde_json::to_value(yaml).map_err(|e| LoaderError::json_parse(path, e))
            }
        }
    }
}
