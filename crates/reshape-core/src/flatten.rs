//! Flatten nested trees into delimiter-joined paths, and back
//!
//! `flatten` walks a tree depth-first and records every leaf under its
//! joined path; subtrees below the depth limit are stored verbatim rather
//! than force-flattened, and empty containers are kept as leaves so they
//! survive the trip. `unflatten` rebuilds a tree from such a mapping,
//! guessing per key whether an intermediate container is a list (next
//! segment all digits) or a mapping. Guesses are independent per key; on
//! conflicting guesses the later key wins.

use serde_json::{Map, Value};

use crate::tree;

/// Options for [`flatten`]
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// Path segment separator
    pub delimiter: String,
    /// Nesting levels to expand before storing subtrees verbatim
    pub max_depth: usize,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            delimiter: ".".to_string(),
            max_depth: 10,
        }
    }
}

/// Outcome of [`flatten`]
#[derive(Debug, Clone)]
pub struct FlattenResult {
    /// Single-level mapping of joined path to leaf value
    pub result: Map<String, Value>,
    /// Number of leaves stored
    pub keys_flattened: usize,
    /// True nesting depth of the source tree, independent of `max_depth`
    pub original_depth: usize,
}

/// Outcome of [`unflatten`]
#[derive(Debug, Clone)]
pub struct UnflattenResult {
    /// Reconstructed tree
    pub result: Value,
    /// Number of flat keys expanded
    pub keys_expanded: usize,
}

/// Flatten a tree into a single-level path-keyed mapping.
pub fn flatten(tree: &Value, options: &FlattenOptions) -> FlattenResult {
    let mut result = Map::new();
    let mut keys_flattened = 0;
    let original_depth = tree::depth(tree);

    recurse(
        tree,
        String::new(),
        0,
        options,
        &mut result,
        &mut keys_flattened,
    );

    FlattenResult {
        result,
        keys_flattened,
        original_depth,
    }
}

fn recurse(
    current: &Value,
    path: String,
    depth: usize,
    options: &FlattenOptions,
    result: &mut Map<String, Value>,
    keys_flattened: &mut usize,
) {
    if depth > options.max_depth {
        result.insert(path, current.clone());
        *keys_flattened += 1;
        return;
    }

    match current {
        Value::Array(items) => {
            if items.is_empty() {
                result.insert(path, current.clone());
                *keys_flattened += 1;
                return;
            }
            for (index, item) in items.iter().enumerate() {
                recurse(
                    item,
                    join_path(&path, &index.to_string(), &options.delimiter),
                    depth + 1,
                    options,
                    result,
                    keys_flattened,
                );
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                result.insert(path, current.clone());
                *keys_flattened += 1;
                return;
            }
            for (key, value) in map {
                recurse(
                    value,
                    join_path(&path, key, &options.delimiter),
                    depth + 1,
                    options,
                    result,
                    keys_flattened,
                );
            }
        }
        leaf => {
            result.insert(path, leaf.clone());
            *keys_flattened += 1;
        }
    }
}

fn join_path(path: &str, segment: &str, delimiter: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", path, delimiter, segment)
    }
}

/// List indices beyond this are kept as mapping keys so a single hostile
/// flat key cannot force a huge allocation.
const MAX_ARRAY_INDEX: usize = 65_536;

/// Expand a flat path-keyed mapping back into a nested tree.
pub fn unflatten(mapping: &Map<String, Value>, delimiter: &str) -> UnflattenResult {
    let mut root = Value::Object(Map::new());
    let mut keys_expanded = 0;

    for (flat_key, value) in mapping {
        let segments: Vec<&str> = flat_key.split(delimiter).collect();
        insert_path(&mut root, &segments, value.clone());
        keys_expanded += 1;
    }

    UnflattenResult {
        result: root,
        keys_expanded,
    }
}

/// Parse a segment as a list index, honoring the allocation guard.
fn index_of(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    segment.parse::<usize>().ok().filter(|i| *i <= MAX_ARRAY_INDEX)
}

fn fresh_container(next_is_index: bool) -> Value {
    if next_is_index {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn insert_path(current: &mut Value, segments: &[&str], value: Value) {
    let segment = segments[0];

    if segments.len() == 1 {
        set_child(current, segment, value);
        return;
    }

    let next_is_index = index_of(segments[1]).is_some();
    let child = child_container(current, segment, next_is_index);
    insert_path(child, &segments[1..], value);
}

/// Fetch or create the container under `segment` that will hold the next
/// path segment. An existing mapping always qualifies; an existing list
/// qualifies only when the next segment is an index; anything else is
/// overwritten (later keys win).
fn child_container<'a>(parent: &'a mut Value, segment: &str, next_is_index: bool) -> &'a mut Value {
    let list_index = match &*parent {
        Value::Array(_) => index_of(segment),
        _ => None,
    };

    if let Some(index) = list_index {
        let Value::Array(items) = parent else { unreachable!() };
        while items.len() <= index {
            items.push(Value::Null);
        }
        let slot = &mut items[index];
        let keep = match slot {
            Value::Object(_) => true,
            Value::Array(_) => next_is_index,
            _ => false,
        };
        if !keep {
            *slot = fresh_container(next_is_index);
        }
        return slot;
    }

    // everything else descends through a mapping; a non-mapping parent is
    // replaced by the later key's structural guess
    if !matches!(parent, Value::Object(_)) {
        *parent = Value::Object(Map::new());
    }
    let Value::Object(map) = parent else { unreachable!() };

    match map.entry(segment.to_string()) {
        serde_json::map::Entry::Vacant(slot) => slot.insert(fresh_container(next_is_index)),
        serde_json::map::Entry::Occupied(slot) => {
            let existing = slot.into_mut();
            let keep = match existing {
                Value::Object(_) => true,
                Value::Array(_) => next_is_index,
                _ => false,
            };
            if !keep {
                *existing = fresh_container(next_is_index);
            }
            existing
        }
    }
}

fn set_child(parent: &mut Value, segment: &str, value: Value) {
    let list_index = match &*parent {
        Value::Array(_) => index_of(segment),
        _ => None,
    };

    if let Some(index) = list_index {
        let Value::Array(items) = parent else { unreachable!() };
        while items.len() <= index {
            items.push(Value::Null);
        }
        items[index] = value;
        return;
    }

    if !matches!(parent, Value::Object(_)) {
        *parent = Value::Object(Map::new());
    }
    let Value::Object(map) = parent else { unreachable!() };
    map.insert(segment.to_string(), value);
}
