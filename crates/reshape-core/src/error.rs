//! Error types for the Reshape core library
//!
//! Every component reports failures through the [`Error`] enum defined here,
//! using thiserror for ergonomic error definitions. Variants carry enough
//! context for the HTTP layer to map them onto its wire-level error codes
//! without inspecting message text.

use crate::transform::Format;
use thiserror::Error;

/// Main error type for Reshape core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed source-format data
    #[error("Invalid {format} input: {message}")]
    Parse { format: Format, message: String },

    /// The tree cannot be represented in the requested output format
    #[error("Failed to serialize to {format}: {message}")]
    Serialize { format: Format, message: String },

    /// Malformed query expression or evaluation failure
    #[error("Invalid JMESPath query: {message}")]
    Query { message: String },

    /// Structurally malformed schema document (not a failed validation)
    #[error("Invalid schema document: {message}")]
    Schema { message: String },

    /// JSON encoding/decoding errors outside of a format transform
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a parse error for the given source format
    pub fn parse(format: Format, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Create a serialize error for the given target format
    pub fn serialize(format: Format, message: impl Into<String>) -> Self {
        Self::Serialize {
            format,
            message: message.into(),
        }
    }

    /// Create a query error wrapping the underlying evaluator message
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a schema error for a malformed schema document
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}
