//! JSON Schema validation
//!
//! Compiles the schema with the jsonschema crate (format assertions
//! enabled, matching ajv + ajv-formats behavior) and reports one issue per
//! violation. Ordinary violations are a normal `valid: false` report; only
//! a structurally malformed schema document is an error.
//!
//! Recompiling the same schema on every call is usually fine because each
//! request carries its own schema value. [`CompiledSchemaCache`] exists for
//! callers that repeatedly validate against identical schemas; entries are
//! keyed by a content hash and never invalidated (schemas are immutable
//! per call).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Instance path of the offending value (`/` for the root)
    pub path: String,
    /// Human-readable message from the validator
    pub message: String,
    /// The violated schema keyword (`type`, `required`, `format`, ...)
    pub keyword: String,
}

/// Validation verdict plus per-violation detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Validate a tree against a JSON Schema document.
pub fn validate_schema(tree: &Value, schema: &Value) -> Result<ValidationReport> {
    let validator = compile(schema)?;
    Ok(check(&validator, tree))
}

fn compile(schema: &Value) -> Result<jsonschema::Validator> {
    jsonschema::options()
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| Error::schema(e.to_string()))
}

fn check(validator: &jsonschema::Validator, tree: &Value) -> ValidationReport {
    let errors: Vec<ValidationIssue> = validator
        .iter_errors(tree)
        .map(|err| {
            let instance_path = err.instance_path.to_string();
            ValidationIssue {
                path: if instance_path.is_empty() {
                    "/".to_string()
                } else {
                    instance_path
                },
                message: err.to_string(),
                keyword: keyword_of(&err.schema_path.to_string()),
            }
        })
        .collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// The violated keyword is the last non-index segment of the schema path
/// (`/properties/email/format` -> `format`).
fn keyword_of(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or("schema")
        .to_string()
}

/// Process-wide cache of compiled schemas, keyed by content hash.
#[derive(Default)]
pub struct CompiledSchemaCache {
    validators: Mutex<HashMap<u64, Arc<jsonschema::Validator>>>,
}

impl CompiledSchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate using a cached compiled schema, compiling on first sight.
    pub fn validate(&self, tree: &Value, schema: &Value) -> Result<ValidationReport> {
        let key = content_hash(schema);

        let cached = {
            let validators = self.validators.lock().expect("schema cache poisoned");
            validators.get(&key).cloned()
        };

        let validator = match cached {
            Some(validator) => validator,
            None => {
                tracing::debug!(key, "compiling schema for cache");
                let compiled = Arc::new(compile(schema)?);
                let mut validators = self.validators.lock().expect("schema cache poisoned");
                validators.entry(key).or_insert_with(|| compiled.clone());
                compiled
            }
        };

        Ok(check(&validator, tree))
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.validators.lock().expect("schema cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn content_hash(schema: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    schema.to_string().hash(&mut hasher);
    hasher.finish()
}
