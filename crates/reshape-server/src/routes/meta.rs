//! Info endpoints: service description, health, and MCP tool definition

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Service name reported by the info endpoints
pub const SERVICE_NAME: &str = "reshape";
/// Service version reported by the info endpoints
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub uptime: u64,
    pub version: &'static str,
    pub timestamp: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        uptime: state.started.elapsed().as_secs(),
        version: VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn service_info() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": VERSION,
        "description": "Convert JSON to CSV, XML, YAML, TOML, and back - in one API call.",
        "pricing": { "credits": 1, "usd": "$0.01" },
        "endpoints": [
            { "method": "POST", "path": "/api/transform", "description": "Convert data between formats (JSON, CSV, XML, YAML, TOML)" },
            { "method": "POST", "path": "/api/flatten", "description": "Flatten nested JSON into dot-notation keys" },
            { "method": "POST", "path": "/api/unflatten", "description": "Expand dot-notation keys back into nested objects" },
            { "method": "POST", "path": "/api/query", "description": "Query JSON data using JMESPath expressions" },
            { "method": "POST", "path": "/api/diff", "description": "Compare two JSON objects and return differences" },
            { "method": "POST", "path": "/api/validate", "description": "Validate JSON data against a JSON Schema" },
        ],
        "health": "/health",
        "mcp": "/mcp-tool.json",
    }))
}

pub async fn mcp_tool() -> Json<Value> {
    Json(json!({
        "name": "reshape",
        "description": "Convert data between JSON, CSV, XML, YAML, and TOML formats. Also supports flattening nested objects, querying with JMESPath, comparing JSON objects (diff), and validating against JSON Schema.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["transform", "flatten", "unflatten", "query", "diff", "validate"],
                    "description": "The operation to perform"
                },
                "input": {
                    "type": "string",
                    "enum": ["json", "csv", "xml", "yaml", "toml"],
                    "description": "Input format (for transform action)"
                },
                "output": {
                    "type": "string",
                    "enum": ["json", "csv", "xml", "yaml", "toml"],
                    "description": "Output format (for transform action)"
                },
                "data": {
                    "description": "The data to process"
                }
            },
            "required": ["action"]
        },
        "endpoint": "POST /api/{action}",
        "pricing": { "credits": 1, "usd": 0.01 }
    }))
}
