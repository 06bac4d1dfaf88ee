//! Format transformer: parse and serialize JSON-like trees
//!
//! Supports five textual encodings: JSON, CSV, XML, YAML, and TOML. Parsing
//! produces the shared tree representation; serialization renders a tree in
//! the requested output encoding. YAML and TOML delegate to their library
//! codecs, XML is built on quick-xml's event API, and CSV is implemented
//! in-tree (delimiter detection and type coercion are part of the contract).

pub mod csv;
pub mod xml;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Textual encoding of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
    Xml,
    Yaml,
    Toml,
}

impl Format {
    /// All supported format tags, in wire order
    pub const ALL: [Format; 5] = [
        Format::Json,
        Format::Csv,
        Format::Xml,
        Format::Yaml,
        Format::Toml,
    ];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            "xml" => Ok(Format::Xml),
            "yaml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            _ => Err(()),
        }
    }
}

/// Output shaping options for [`serialize`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Pretty-print JSON/XML output
    pub pretty: bool,
    /// Indent width for pretty output
    pub indent: usize,
    /// Field delimiter for CSV output
    pub delimiter: String,
    /// Emit a header row in CSV output
    pub headers: bool,
    /// Name of the root element wrapping XML output
    pub root_element: String,
    /// Join array cells with `;` in CSV output instead of JSON-encoding them
    pub flatten_arrays: bool,
    /// How many levels of nesting become dot-joined CSV sub-columns
    pub flatten_depth: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            delimiter: ",".to_string(),
            headers: true,
            root_element: "root".to_string(),
            flatten_arrays: true,
            flatten_depth: 1,
        }
    }
}

/// Parse request data in the given source format into a tree.
///
/// JSON input may arrive as an already-parsed tree (passed through) or as a
/// string (parsed strictly). Every other format requires a string.
pub fn parse_input(data: &Value, format: Format) -> Result<Value> {
    if format == Format::Json {
        return match data {
            Value::String(s) => {
                serde_json::from_str(s).map_err(|e| Error::parse(Format::Json, e.to_string()))
            }
            other => Ok(other.clone()),
        };
    }

    let text = data.as_str().ok_or_else(|| {
        Error::parse(
            format,
            format!("{} input must be a string", format.to_string().to_uppercase()),
        )
    })?;

    match format {
        Format::Csv => csv::parse_csv(text),
        Format::Xml => xml::parse_xml(text),
        Format::Yaml => parse_yaml(text),
        Format::Toml => parse_toml(text),
        Format::Json => unreachable!("handled above"),
    }
}

/// Serialize a tree into the given output format.
pub fn serialize(tree: &Value, format: Format, options: &TransformOptions) -> Result<String> {
    match format {
        Format::Json => serialize_json(tree, options),
        Format::Csv => csv::to_csv(tree, options),
        Format::Xml => xml::to_xml(tree, options),
        Format::Yaml => {
            serde_yaml::to_string(tree).map_err(|e| Error::serialize(Format::Yaml, e.to_string()))
        }
        Format::Toml => serialize_toml(tree),
    }
}

fn serialize_json(tree: &Value, options: &TransformOptions) -> Result<String> {
    if !options.pretty {
        return serde_json::to_string(tree).map_err(|e| Error::serialize(Format::Json, e.to_string()));
    }

    let indent = " ".repeat(options.indent.max(1));
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    tree.serialize(&mut ser)
        .map_err(|e| Error::serialize(Format::Json, e.to_string()))?;
    String::from_utf8(out).map_err(|e| Error::serialize(Format::Json, e.to_string()))
}

fn parse_yaml(text: &str) -> Result<Value> {
    let parsed: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| Error::parse(Format::Yaml, e.to_string()))?;
    Ok(yaml_to_tree(parsed))
}

/// Convert a YAML value into the tree representation, stringifying the
/// non-string mapping keys YAML permits and JSON does not.
fn yaml_to_tree(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_tree).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (key, val) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                object.insert(key, yaml_to_tree(val));
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_tree(tagged.value),
    }
}

fn parse_toml(text: &str) -> Result<Value> {
    let parsed: toml::Value =
        toml::from_str(text).map_err(|e| Error::parse(Format::Toml, e.to_string()))?;
    Ok(toml_to_tree(parsed))
}

fn toml_to_tree(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_tree).collect()),
        toml::Value::Table(table) => {
            let mut object = serde_json::Map::new();
            for (key, val) in table {
                object.insert(key, toml_to_tree(val));
            }
            Value::Object(object)
        }
    }
}

fn serialize_toml(tree: &Value) -> Result<String> {
    let Value::Object(map) = tree else {
        return Err(Error::serialize(
            Format::Toml,
            "TOML output requires a plain object at the root level",
        ));
    };

    let mut table = toml::Table::new();
    for (key, val) in map {
        table.insert(key.clone(), tree_to_toml(val, key)?);
    }

    toml::to_string_pretty(&table).map_err(|e| Error::serialize(Format::Toml, e.to_string()))
}

fn tree_to_toml(value: &Value, path: &str) -> Result<toml::Value> {
    match value {
        Value::Null => Err(Error::serialize(
            Format::Toml,
            format!("TOML cannot represent null (at '{}')", path),
        )),
        Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(toml::Value::Integer(i))
            } else {
                Ok(toml::Value::Float(n.as_f64().unwrap_or(0.0)))
            }
        }
        Value::String(s) => Ok(toml::Value::String(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(tree_to_toml(item, &format!("{}.{}", path, index))?);
            }
            Ok(toml::Value::Array(out))
        }
        Value::Object(map) => {
            let mut table = toml::Table::new();
            for (key, val) in map {
                table.insert(key.clone(), tree_to_toml(val, &format!("{}.{}", path, key))?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_round_trip_tags() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>(), Ok(format));
        }
        assert!("JSON".parse::<Format>().is_err());
        assert!("avro".parse::<Format>().is_err());
    }

    #[test]
    fn test_json_string_input_parsed_strictly() {
        let data = json!(r#"{"a": 1}"#);
        assert_eq!(parse_input(&data, Format::Json).unwrap(), json!({"a": 1}));

        let trailing = json!(r#"{"a": 1} garbage"#);
        assert!(parse_input(&trailing, Format::Json).is_err());
    }

    #[test]
    fn test_json_tree_input_passes_through() {
        let data = json!({"a": [1, 2]});
        assert_eq!(parse_input(&data, Format::Json).unwrap(), data);
    }

    #[test]
    fn test_text_formats_require_strings() {
        let err = parse_input(&json!({"a": 1}), Format::Yaml).unwrap_err();
        assert!(err.to_string().contains("YAML input must be a string"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let tree = parse_input(&json!("name: NK\nskills:\n  - code\n  - deploy"), Format::Yaml)
            .unwrap();
        assert_eq!(tree, json!({"name": "NK", "skills": ["code", "deploy"]}));

        let out = serialize(&tree, Format::Yaml, &TransformOptions::default()).unwrap();
        assert!(out.contains("name: NK"));
    }

    #[test]
    fn test_yaml_numeric_keys_stringified() {
        let tree = parse_input(&json!("1: one\n2: two"), Format::Yaml).unwrap();
        assert_eq!(tree, json!({"1": "one", "2": "two"}));
    }

    #[test]
    fn test_toml_round_trip() {
        let tree = parse_input(&json!("title = \"demo\"\n\n[owner]\nname = \"NK\""), Format::Toml)
            .unwrap();
        assert_eq!(tree, json!({"title": "demo", "owner": {"name": "NK"}}));

        let out = serialize(&tree, Format::Toml, &TransformOptions::default()).unwrap();
        assert!(out.contains("title = \"demo\""));
    }

    #[test]
    fn test_toml_rejects_non_object_root() {
        let err = serialize(&json!([1, 2]), Format::Toml, &TransformOptions::default())
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("TOML output requires a plain object at the root level"));
    }

    #[test]
    fn test_toml_rejects_null() {
        let err = serialize(
            &json!({"a": {"b": null}}),
            Format::Toml,
            &TransformOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn test_json_round_trip_is_idempotent() {
        let source = json!(r#"{"b": 2, "a": {"xs": [1, 2.5, null, "s"], "ok": true}}"#);
        let first = parse_input(&source, Format::Json).unwrap();
        let text = serialize(&first, Format::Json, &TransformOptions::default()).unwrap();
        let second = parse_input(&json!(text), Format::Json).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_pretty_and_compact() {
        let tree = json!({"a": 1});
        let pretty = serialize(&tree, Format::Json, &TransformOptions::default()).unwrap();
        assert!(pretty.contains("\n"));

        let compact = serialize(
            &tree,
            Format::Json,
            &TransformOptions {
                pretty: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(compact, r#"{"a":1}"#);
    }
}
