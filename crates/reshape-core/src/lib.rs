//! Reshape Core - schema-driven transformation of JSON and XML records
//!
//! This crate converts arbitrary source documents into documents conforming
//! to a target JSON Schema. Per-field transform rules live inside the schema
//! itself, keyed by rule-set identifier, so one schema can normalize several
//! upstream feeds.
//!
//! # Main Components
//!
//! - **Transformer**: walks the schema, resolves each instance and validates
//!   the assembled output
//! - **Schema Descriptor**: the parsed, shareable form of a target schema
//! - **Operations**: named value transforms such as `duration` or `replace`
//! - **Path lookup**: a JSONPath subset for JSON input and node paths for XML
//! - **Tree Builder**: path-addressed assembly of the output document
//!
//! # Example
//!
//! ```
//! use reshape_core::{Result, Transformer};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let schema = json!({
//!         "type": "object",
//!         "properties": {
//!             "title": {
//!                 "type": "string",
//!                 "transform": {"cms": {"from": [
//!                     {"jsonPath": "$.headline", "operations": [{"type": "trim"}]}
//!                 ]}}
//!             }
//!         }
//!     });
//!
//!     let mut transformer = Transformer::new(&schema, "cms")?;
//!     let output = transformer.transform(br#"{"headline": "  Hello  "}"#)?;
//!     assert_eq!(output, br#"{"title":"Hello"}"#.to_vec());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod coerce;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod jsonpath;
pub mod operations;
pub mod schema;
pub mod tree;
pub mod types;
pub mod value;
pub mod xml;

pub use engine::{Document, Transformer};
pub use error::{Error, Result};
pub use instructions::{Method, SourceReference, TransformInstructions};
pub use operations::{Operation, OperationError, OperationSpec};
pub use schema::{InstanceDescriptor, SchemaDescriptor};
pub use tree::TreeBuilder;
pub use types::{InputFormat, InstanceType, ScalarKind};
pub use value::SourceValue;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
