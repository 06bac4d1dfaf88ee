//! XML reader and writer
//!
//! Trees map onto XML with a fixed convention: attributes become mapping
//! keys with the `@_` prefix, text inside mixed-content elements lands
//! under `#text`, repeated sibling elements collapse into an array, and a
//! text-only element collapses to its (scalar-coerced) text. Serialization
//! wraps the tree under a single configurable root element.

use crate::error::{Error, Result};
use crate::transform::{Format, TransformOptions};
use crate::tree::coerce_scalar;
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

/// Attribute key prefix in the tree representation
const ATTR_PREFIX: &str = "@_";
/// Mapping key holding element text in mixed content
const TEXT_KEY: &str = "#text";

#[derive(Debug, Default)]
struct ElementNode {
    children: Map<String, Value>,
    text: String,
}

/// Parse an XML document into a tree keyed by its root element name.
pub fn parse_xml(text: &str) -> Result<Value> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<(String, ElementNode)> = Vec::new();
    let mut document = ElementNode::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                let mut node = ElementNode::default();
                read_attributes(&start, &mut node.children)?;
                stack.push((name, node));
            }
            Ok(Event::Empty(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                let mut node = ElementNode::default();
                read_attributes(&start, &mut node.children)?;
                let parent = stack
                    .last_mut()
                    .map(|(_, node)| node)
                    .unwrap_or(&mut document);
                insert_child(&mut parent.children, name, finalize(node));
            }
            Ok(Event::Text(t)) => {
                let decoded = t
                    .unescape()
                    .map_err(|e| Error::parse(Format::Xml, e.to_string()))?;
                let current = stack
                    .last_mut()
                    .map(|(_, node)| node)
                    .unwrap_or(&mut document);
                current.text.push_str(&decoded);
            }
            Ok(Event::CData(c)) => {
                let decoded = String::from_utf8_lossy(&c.into_inner()).into_owned();
                let current = stack
                    .last_mut()
                    .map(|(_, node)| node)
                    .unwrap_or(&mut document);
                current.text.push_str(&decoded);
            }
            Ok(Event::End(_)) => {
                let (name, node) = stack
                    .pop()
                    .ok_or_else(|| Error::parse(Format::Xml, "unexpected closing tag"))?;
                let parent = stack
                    .last_mut()
                    .map(|(_, node)| node)
                    .unwrap_or(&mut document);
                insert_child(&mut parent.children, name, finalize(node));
            }
            Ok(Event::Eof) => {
                if let Some((name, _)) = stack.last() {
                    return Err(Error::parse(
                        Format::Xml,
                        format!("unclosed element <{}>", name),
                    ));
                }
                break;
            }
            Ok(_) => {} // declarations, comments, processing instructions
            Err(e) => return Err(Error::parse(Format::Xml, e.to_string())),
        }
    }

    if document.children.is_empty() {
        return Err(Error::parse(Format::Xml, "no root element found"));
    }
    Ok(Value::Object(document.children))
}

fn read_attributes(
    start: &quick_xml::events::BytesStart<'_>,
    children: &mut Map<String, Value>,
) -> Result<()> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::parse(Format::Xml, e.to_string()))?;
        let key = format!(
            "{}{}",
            ATTR_PREFIX,
            String::from_utf8_lossy(attr.key.as_ref())
        );
        let value = attr
            .unescape_value()
            .map_err(|e| Error::parse(Format::Xml, e.to_string()))?;
        children.insert(key, coerce_scalar(&value));
    }
    Ok(())
}

/// Collapse a finished element: text-only elements become their coerced
/// text, everything else becomes a mapping (with `#text` for mixed
/// content). An element with no content at all becomes an empty string.
fn finalize(node: ElementNode) -> Value {
    if node.children.is_empty() {
        return if node.text.is_empty() {
            Value::String(String::new())
        } else {
            coerce_scalar(&node.text)
        };
    }

    let mut map = node.children;
    if !node.text.is_empty() {
        map.insert(TEXT_KEY.to_string(), coerce_scalar(&node.text));
    }
    Value::Object(map)
}

/// Repeated siblings collapse into an array under their shared name.
fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.entry(name) {
        serde_json::map::Entry::Vacant(slot) => {
            slot.insert(value);
        }
        serde_json::map::Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            if let Value::Array(items) = existing {
                items.push(value);
            } else {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
}

/// Serialize a tree as XML wrapped under `options.root_element`.
pub fn to_xml(tree: &Value, options: &TransformOptions) -> Result<String> {
    let buffer = if options.pretty {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', options.indent);
        write_value(&mut writer, &options.root_element, tree)
            .map_err(|e| Error::serialize(Format::Xml, e.to_string()))?;
        writer.into_inner()
    } else {
        let mut writer = Writer::new(Vec::new());
        write_value(&mut writer, &options.root_element, tree)
            .map_err(|e| Error::serialize(Format::Xml, e.to_string()))?;
        writer.into_inner()
    };

    String::from_utf8(buffer).map_err(|e| Error::serialize(Format::Xml, e.to_string()))
}

fn write_value<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> quick_xml::Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_value(writer, name, item)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            let mut attributes: Vec<(String, String)> = Vec::new();
            let mut children: Vec<(&str, &Value)> = Vec::new();
            let mut text: Option<String> = None;

            for (key, val) in map {
                if let Some(attr_name) = key.strip_prefix(ATTR_PREFIX) {
                    attributes.push((attr_name.to_string(), scalar_text(val)));
                } else if key == TEXT_KEY {
                    text = Some(scalar_text(val));
                } else {
                    children.push((key.as_str(), val));
                }
            }

            let element = writer
                .create_element(name)
                .with_attributes(attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));

            if children.is_empty() {
                match text {
                    Some(t) if !t.is_empty() => {
                        element.write_text_content(BytesText::new(&t))?;
                    }
                    _ => {
                        element.write_empty()?;
                    }
                }
            } else {
                element.write_inner_content(|w| {
                    for (child_name, child_value) in &children {
                        write_value(w, child_name, child_value)?;
                    }
                    if let Some(t) = &text {
                        if !t.is_empty() {
                            w.write_event(Event::Text(BytesText::new(t)))?;
                        }
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
            }
            Ok(())
        }
        scalar => {
            let text = scalar_text(scalar);
            if text.is_empty() {
                writer.create_element(name).write_empty()?;
            } else {
                writer
                    .create_element(name)
                    .write_text_content(BytesText::new(&text))?;
            }
            Ok(())
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        container => serde_json::to_string(container).unwrap_or_default(),
    }
}
