//! Reshape Schemas - schema collaborators for the transform engine
//!
//! This crate provides the pieces of schema handling that the transform engine
//! consumes but does not own:
//!
//! - **Walking**: depth-first, declaration-ordered traversal of a target schema,
//!   reporting every instance path together with its raw schema fragment
//! - **Loading**: reading JSON or YAML schema files into `serde_json::Value`
//! - **Validation**: a [`DocumentValidator`] seam with a JSON Schema backed
//!   implementation used as the final gate of every transform
//!
//! ## Quick Start
//!
//! ```rust
//! use reshape_schemas::{walk, WalkError};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "title": {"type": "string"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     }
//! });
//!
//! let mut paths = Vec::new();
//! walk(&schema, |entry| {
//!     paths.push(entry.path.to_string());
//!     Ok::<(), WalkError>(())
//! })
//! .unwrap();
//!
//! assert_eq!(paths, vec!["$", "$.title", "$.tags", "$.tags[*]"]);
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod loader;
pub mod validation;
pub mod walk;

pub use loader::{Format, LoaderError, LoaderResult, SchemaLoader};
pub use validation::{
    AcceptAll, DocumentValidator, JsonSchemaValidator, ValidationError, ValidationErrors, ValidationResult,
};
pub use walk::{child_path, item_path, schema_type, walk, WalkEntry, WalkError, WalkKey, ROOT_PATH};
