//! JMESPath query evaluation
//!
//! A thin wrapper around the jmespath crate: compile the expression, run it
//! against the tree, and report the match count alongside the result. The
//! count is the result length for list results, zero for null, one for any
//! other value.

use crate::error::{Error, Result};
use serde_json::Value;

/// Outcome of a query evaluation
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Matched value(s); null when nothing matched
    pub result: Value,
    /// Number of matches represented by `result`
    pub match_count: usize,
}

/// Evaluate a JMESPath expression against a tree.
pub fn run_query(tree: &Value, expression: &str) -> Result<QueryOutcome> {
    let compiled = jmespath::compile(expression).map_err(|e| Error::query(e.to_string()))?;

    let data = jmespath::Variable::from_json(&tree.to_string())
        .map_err(|e| Error::query(e.to_string()))?;
    let matched = compiled
        .search(data)
        .map_err(|e| Error::query(e.to_string()))?;

    let match_count = if matched.is_array() {
        matched.as_array().map(Vec::len).unwrap_or(0)
    } else if matched.is_null() {
        0
    } else {
        1
    };

    let result = serde_json::to_value(matched.as_ref())?;

    Ok(QueryOutcome {
        result,
        match_count,
    })
}
