//! End-to-end tests driving the full router in process

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn get(path: &str) -> (StatusCode, Value) {
    let response = reshape_server::app()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    split(response).await
}

async fn post(path: &str, body: Value) -> (StatusCode, Value) {
    post_raw(path, body.to_string()).await
}

async fn post_raw(path: &str, body: String) -> (StatusCode, Value) {
    let response = reshape_server::app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");
    split(response).await
}

async fn split(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

fn error_code(body: &Value) -> &str {
    assert_eq!(body["success"], json!(false));
    body["error"]["code"].as_str().expect("error code")
}

#[tokio::test]
async fn health_reports_status_and_uptime() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert!(body["uptime"].is_u64());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn service_info_lists_endpoints() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("reshape"));
    let endpoints = body["endpoints"].as_array().expect("endpoints");
    assert_eq!(endpoints.len(), 6);
}

#[tokio::test]
async fn mcp_tool_definition_is_served() {
    let (status, body) = get("/mcp-tool.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputSchema"]["required"], json!(["action"]));
}

#[tokio::test]
async fn unknown_route_returns_not_found_envelope() {
    let (status, body) = get("/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn transform_json_to_yaml() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "yaml", "data": {"name": "NK", "age": 25}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["result"].as_str().unwrap().contains("name: NK"));
    assert_eq!(body["data"]["inputFormat"], json!("json"));
    assert_eq!(body["data"]["outputFormat"], json!("yaml"));
    assert_eq!(body["meta"]["credits"], json!(1));
    assert!(body["meta"]["processingMs"].is_u64());
}

#[tokio::test]
async fn transform_json_to_csv() {
    let (status, body) = post(
        "/api/transform",
        json!({
            "input": "json",
            "output": "csv",
            "data": [{"name": "NK", "age": 25}, {"name": "Bob", "age": 30}],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = body["data"]["result"].as_str().unwrap();
    let lines: Vec<&str> = result.lines().collect();
    assert!(lines[0].contains("name"));
    assert!(lines[0].contains("age"));
    assert!(lines[1].contains("NK"));
    assert!(lines[1].contains("25"));
}

#[tokio::test]
async fn transform_json_to_xml() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "xml", "data": {"name": "NK"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = body["data"]["result"].as_str().unwrap();
    assert!(result.contains("<root>"));
    assert!(result.contains("<name>NK</name>"));
}

#[tokio::test]
async fn transform_csv_to_json_round_trip() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "csv", "output": "json", "data": "name,age\nNK,25"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let parsed: Value =
        serde_json::from_str(body["data"]["result"].as_str().unwrap()).expect("result json");
    assert_eq!(parsed, json!([{"name": "NK", "age": 25}]));
}

#[tokio::test]
async fn transform_missing_input_is_invalid_input() {
    let (status, body) = post(
        "/api/transform",
        json!({"output": "yaml", "data": {"name": "NK"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn transform_unknown_format_is_invalid_format() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "avro", "data": {}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_FORMAT");
}

#[tokio::test]
async fn transform_identical_formats_are_rejected() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "json", "data": {}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNSUPPORTED_CONVERSION");
}

#[tokio::test]
async fn transform_oversized_payload_is_rejected_before_parsing() {
    let huge = "x".repeat(5 * 1024 * 1024 + 1);
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "yaml", "data": huge}),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_code(&body), "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn transform_malformed_source_is_parse_error() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "yaml", "data": "{not json"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "PARSE_ERROR");
}

#[tokio::test]
async fn transform_unrepresentable_output_is_internal_error() {
    let (status, body) = post(
        "/api/transform",
        json!({"input": "json", "output": "toml", "data": [1, 2, 3]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&body), "INTERNAL_ERROR");
}

#[tokio::test]
async fn flatten_nested_object() {
    let (status, body) = post(
        "/api/flatten",
        json!({"data": {"user": {"name": {"first": "NK"}}}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"]["user.name.first"], json!("NK"));
    assert_eq!(body["data"]["keysFlattened"], json!(1));
    assert_eq!(body["data"]["originalDepth"], json!(3));
}

#[tokio::test]
async fn flatten_requires_plain_object() {
    let (status, body) = post("/api/flatten", json!({"data": [1, 2]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn flatten_validates_max_depth_range() {
    let (status, body) = post("/api/flatten", json!({"data": {}, "maxDepth": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn unflatten_dot_notation() {
    let (status, body) = post(
        "/api/unflatten",
        json!({"data": {"user.name.first": "NK"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["result"],
        json!({"user": {"name": {"first": "NK"}}})
    );
    assert_eq!(body["data"]["keysExpanded"], json!(1));
}

#[tokio::test]
async fn flatten_unflatten_round_trip() {
    let tree = json!({"user": {"name": "NK", "roles": ["admin", "ops"]}, "count": 3});

    let (_, flat) = post("/api/flatten", json!({"data": tree})).await;
    let (status, back) = post(
        "/api/unflatten",
        json!({"data": flat["data"]["result"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(back["data"]["result"], tree);
}

#[tokio::test]
async fn query_with_filter_projection() {
    let (status, body) = post(
        "/api/query",
        json!({
            "data": {"users": [
                {"name": "NK", "role": "admin"},
                {"name": "Bob", "role": "user"},
            ]},
            "query": "users[?role=='admin'].name",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], json!(["NK"]));
    assert_eq!(body["data"]["matchCount"], json!(1));
}

#[tokio::test]
async fn query_without_match_yields_null_and_zero() {
    let (status, body) = post(
        "/api/query",
        json!({"data": {"a": 1}, "query": "missing"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], Value::Null);
    assert_eq!(body["data"]["matchCount"], json!(0));
}

#[tokio::test]
async fn query_malformed_expression_is_query_error() {
    let (status, body) = post(
        "/api/query",
        json!({"data": {}, "query": "users[?"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "QUERY_ERROR");
}

#[tokio::test]
async fn query_requires_non_empty_string() {
    let (status, body) = post("/api/query", json!({"data": {}, "query": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn diff_classifies_changes() {
    let (status, body) = post(
        "/api/diff",
        json!({
            "original": {"name": "NK", "age": 25},
            "modified": {"name": "NK", "age": 26, "city": "SF"},
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["added"], json!(1));
    assert_eq!(body["data"]["summary"]["changed"], json!(1));
    assert_eq!(body["data"]["summary"]["removed"], json!(0));

    let changes = body["data"]["changes"].as_array().expect("changes");
    assert!(changes
        .iter()
        .any(|c| c["type"] == json!("changed") && c["path"] == json!("age")));
    assert!(changes
        .iter()
        .any(|c| c["type"] == json!("added") && c["path"] == json!("city")));
}

#[tokio::test]
async fn diff_of_identical_trees_is_empty() {
    let tree = json!({"a": 1, "b": [1, 2, {"c": 3}]});
    let (status, body) = post(
        "/api/diff",
        json!({"original": tree, "modified": tree}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changes"], json!([]));
    assert_eq!(body["data"]["summary"]["added"], json!(0));
    assert_eq!(body["data"]["summary"]["removed"], json!(0));
    assert_eq!(body["data"]["summary"]["changed"], json!(0));
}

#[tokio::test]
async fn diff_requires_both_sides() {
    let (status, body) = post("/api/diff", json!({"original": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn validate_accepts_conforming_document() {
    let (status, body) = post(
        "/api/validate",
        json!({
            "data": {"name": "NK", "email": "nk@example.com"},
            "schema": {
                "type": "object",
                "required": ["name", "email"],
                "properties": {
                    "name": {"type": "string"},
                    "email": {"type": "string", "format": "email"},
                },
            },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], json!(true));
    assert_eq!(body["data"]["errors"], json!([]));
}

#[tokio::test]
async fn validate_reports_violations_as_success() {
    let (status, body) = post(
        "/api/validate",
        json!({
            "data": {"name": "NK", "email": "not-an-email"},
            "schema": {
                "type": "object",
                "required": ["name", "email"],
                "properties": {
                    "email": {"type": "string", "format": "email"},
                },
            },
        }),
    )
    .await;

    // a failed validation is a normal response, not an error
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], json!(false));
    let errors = body["data"]["errors"].as_array().expect("errors");
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e["keyword"] == json!("format")));
}

#[tokio::test]
async fn validate_malformed_schema_is_validation_error() {
    let (status, body) = post(
        "/api/validate",
        json!({"data": {}, "schema": {"type": "not-a-real-type"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn validate_requires_object_schema() {
    let (status, body) = post("/api/validate", json!({"data": {}, "schema": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn non_json_body_is_invalid_input() {
    let (status, body) = post_raw("/api/diff", "this is not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}
