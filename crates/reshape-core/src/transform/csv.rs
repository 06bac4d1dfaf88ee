//! CSV reader and writer
//!
//! The reader detects its delimiter from the header line, honors
//! double-quote-enclosed fields with doubled-quote escaping, and coerces
//! cells through [`coerce_scalar`]. The writer flattens each row one level
//! into dot-joined sub-columns and emits the union of row keys as the
//! header set. Cell types are best-effort: a CSV round-trip preserves
//! booleans and numbers only by re-detection.

use crate::error::{Error, Result};
use crate::flatten::{flatten, FlattenOptions};
use crate::transform::{Format, TransformOptions};
use crate::tree::coerce_scalar;
use serde_json::{Map, Value};

/// Candidate delimiters, tried against the header line
const DELIMITERS: [char; 4] = [',', '\t', '|', ';'];

/// Parse CSV text into an array of header-keyed row mappings.
pub fn parse_csv(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    let lines: Vec<&str> = trimmed.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let delimiter = detect_delimiter(lines[0]);
    let headers = parse_line(lines[0], delimiter)?;

    let mut rows = Vec::with_capacity(lines.len().saturating_sub(1));
    for line in &lines[1..] {
        let cells = parse_line(line, delimiter)?;
        let mut row = Map::new();
        for (index, header) in headers.iter().enumerate() {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            row.insert(header.clone(), coerce_scalar(cell));
        }
        rows.push(Value::Object(row));
    }

    Ok(Value::Array(rows))
}

/// Pick the candidate with the highest occurrence count in the header line.
/// Comma wins ties and delimiter-free single-column input.
fn detect_delimiter(header: &str) -> char {
    let mut detected = ',';
    let mut max_count = 0;

    for candidate in DELIMITERS {
        let count = header.matches(candidate).count();
        if count > max_count {
            max_count = count;
            detected = candidate;
        }
    }

    detected
}

/// Split one line into trimmed cells, honoring quoted fields.
fn parse_line(line: &str, delimiter: char) -> Result<Vec<String>> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    if in_quotes {
        return Err(Error::parse(Format::Csv, "unterminated quoted field"));
    }

    cells.push(current.trim().to_string());
    Ok(cells)
}

/// Serialize a tree as CSV.
///
/// Non-array roots become a single row; non-mapping rows become a
/// `value` column.
pub fn to_csv(tree: &Value, options: &TransformOptions) -> Result<String> {
    let rows: Vec<Value> = match tree {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    if rows.is_empty() {
        return Ok(String::new());
    }

    let flatten_options = FlattenOptions {
        delimiter: ".".to_string(),
        max_depth: options.flatten_depth,
    };
    let flat_rows: Vec<Map<String, Value>> = rows
        .iter()
        .map(|row| match row {
            Value::Object(_) | Value::Array(_) => flatten(row, &flatten_options).result,
            scalar => {
                let mut single = Map::new();
                single.insert("value".to_string(), scalar.clone());
                single
            }
        })
        .collect();

    // Union of keys across all rows, in first-seen order
    let mut header_set: Vec<String> = Vec::new();
    for row in &flat_rows {
        for key in row.keys() {
            if !header_set.contains(key) {
                header_set.push(key.clone());
            }
        }
    }

    let delimiter = options.delimiter.as_str();
    let mut lines = Vec::with_capacity(flat_rows.len() + 1);

    if options.headers {
        let header_line: Vec<String> = header_set
            .iter()
            .map(|h| escape_value(h, delimiter))
            .collect();
        lines.push(header_line.join(delimiter));
    }

    for row in &flat_rows {
        let cells: Vec<String> = header_set
            .iter()
            .map(|header| {
                let rendered = match row.get(header) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::Array(items)) => {
                        if options.flatten_arrays {
                            items
                                .iter()
                                .map(cell_text)
                                .collect::<Vec<_>>()
                                .join(";")
                        } else {
                            serde_json::to_string(items).unwrap_or_default()
                        }
                    }
                    Some(Value::Object(map)) => {
                        serde_json::to_string(map).unwrap_or_default()
                    }
                    Some(scalar) => cell_text(scalar),
                };
                escape_value(&rendered, delimiter)
            })
            .collect();
        lines.push(cells.join(delimiter));
    }

    Ok(lines.join("\n"))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        container => serde_json::to_string(container).unwrap_or_default(),
    }
}

/// Quote-wrap a field when it contains the delimiter, a quote, or a newline;
/// embedded quotes are doubled.
fn escape_value(value: &str, delimiter: &str) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
