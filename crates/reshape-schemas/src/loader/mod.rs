//! Schema file loading
//!
//! Reads target schemas from JSON or YAML files into `serde_json::Value`,
//! keeping property declaration order. `$ref` dereferencing is not performed;
//! schemas handed to the engine are expected to be self-contained.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use reshape_schemas::loader::SchemaLoader;
//! use std::path::Path;
//!
//! let mut loader = SchemaLoader::new();
//! let schema = loader.load(Path::new("schemas/image.schema.json"))?;
//! println!("{}", serde_json::to_string_pretty(&schema)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::Format;

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads schema documents from disk, caching each file after the first read
#[derive(Debug, Default)]
pub struct SchemaLoader {
    cache: HashMap<PathBuf, Value>,
}

impl SchemaLoader {
    /// Create a loader with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a schema file, detecting its format from the extension
    pub fn load(&mut self, path: &Path) -> LoaderResult<Value> {
        if let Some(cached) = self.cache.get(path) {
            tracing::trace!(path = %path.display(), "Schema served from cache");
            return Ok(cached.clone());
        }

        let format = Format::from_path(path)?;
        let content =
            std::fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        let schema = format.parse(&content, path)?;

        if !schema.is_object() {
            return Err(LoaderError::NotAnObject {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), ?format, "Loaded schema");
        self.cache.insert(path.to_path_buf(), schema.clone());
        Ok(schema)
    }

    /// Number of cached schema documents
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached document
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_json_keeps_declaration_order() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"type": "object", "properties": {{"b": {{"type": "string"}}, "a": {{"type": "string"}}}}}}"#
        )
        .unwrap();

        let mut loader = SchemaLoader::new();
        let schema = loader.load(file.path()).unwrap();
        let keys: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(loader.cached(), 1);
    }

    #[test]
    fn test_load_yaml() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "type: object\nproperties:\n  title:\n    type: string").unwrap();

        let mut loader = SchemaLoader::new();
        let schema = loader.load(file.path()).unwrap();
        assert_eq!(schema["properties"]["title"]["type"], "string");
    }

    #[test]
    fn test_load_rejects_non_object_root() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let err = SchemaLoader::new().load(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::NotAnObject { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let err = SchemaLoader::new().load(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat { .. }));
    }
}
