//! Reshape Core - data-shaping engine for JSON-like trees
//!
//! This crate provides the pure components behind the Reshape API. Every
//! operation is a stateless function over the shared tree representation
//! (`serde_json::Value` with insertion-order-preserving mappings):
//!
//! - **Format Transformer**: parse/serialize across JSON, CSV, XML, YAML,
//!   and TOML
//! - **Flattener/Unflattener**: nested trees to delimiter-joined paths and
//!   back
//! - **Query Engine**: JMESPath evaluation with match counting
//! - **Diff Engine**: structural comparison with classified changes
//! - **Schema Validator**: JSON Schema checks with per-violation detail
//!
//! # Example
//!
//! ```
//! use reshape_core::transform::{parse_input, serialize, Format, TransformOptions};
//! use serde_json::json;
//!
//! let tree = parse_input(&json!("name,age\nNK,25"), Format::Csv)?;
//! let yaml = serialize(&tree, Format::Yaml, &TransformOptions::default())?;
//! assert!(yaml.contains("name: NK"));
//! # Ok::<(), reshape_core::Error>(())
//! ```

pub mod diff;
pub mod error;
pub mod flatten;
pub mod query;
pub mod transform;
pub mod tree;
pub mod validate;

// Re-export the types handlers touch most
pub use diff::{diff_trees, Change, DiffReport, DiffSummary, ElementChange};
pub use error::{Error, Result};
pub use flatten::{flatten, unflatten, FlattenOptions, FlattenResult, UnflattenResult};
pub use query::{run_query, QueryOutcome};
pub use transform::{parse_input, serialize, Format, TransformOptions};
pub use validate::{validate_schema, CompiledSchemaCache, ValidationIssue, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
