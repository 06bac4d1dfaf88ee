//! Structural diff over JSON-like trees
//!
//! Walks two trees path-by-path and classifies every divergence as an
//! addition, removal, or change; list-length differences are reported as
//! array entries carrying the element index and the inner classification.
//! The summary's `unchanged` count keeps the historical approximation
//! `max(0, leaf_count(original) - removed - changed)` for wire
//! compatibility; it is not an exact count of untouched leaves when
//! additions or removals nest inside changed substructures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tree::leaf_count;

/// One classified divergence between the two trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Change {
    /// Key present only in the modified tree
    Added { path: String, value: Value },
    /// Key present only in the original tree
    Removed { path: String, value: Value },
    /// Present in both with different values
    Changed { path: String, from: Value, to: Value },
    /// List element added or removed at `index` of the list at `path`
    Array {
        path: String,
        index: usize,
        item: ElementChange,
    },
}

/// Inner classification of a list-element change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementChange {
    Added { value: Value },
    Removed { value: Value },
}

/// Counts per change class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
}

/// Full diff outcome: ordered changes plus summary counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    pub changes: Vec<Change>,
    pub summary: DiffSummary,
}

/// Compare two trees structurally.
pub fn diff_trees(original: &Value, modified: &Value) -> DiffReport {
    let mut changes = Vec::new();
    walk(original, modified, String::new(), &mut changes);

    let mut summary = DiffSummary::default();
    for change in &changes {
        match change {
            Change::Added { .. } => summary.added += 1,
            Change::Removed { .. } => summary.removed += 1,
            Change::Changed { .. } => summary.changed += 1,
            Change::Array { item, .. } => match item {
                ElementChange::Added { .. } => summary.added += 1,
                ElementChange::Removed { .. } => summary.removed += 1,
            },
        }
    }

    summary.unchanged = leaf_count(original)
        .saturating_sub(summary.removed)
        .saturating_sub(summary.changed);

    DiffReport { changes, summary }
}

fn walk(original: &Value, modified: &Value, path: String, changes: &mut Vec<Change>) {
    match (original, modified) {
        (Value::Object(orig), Value::Object(modif)) => {
            for (key, orig_val) in orig {
                let child_path = join_path(&path, key);
                match modif.get(key) {
                    Some(modif_val) => walk(orig_val, modif_val, child_path, changes),
                    None => changes.push(Change::Removed {
                        path: child_path,
                        value: orig_val.clone(),
                    }),
                }
            }
            for (key, modif_val) in modif {
                if !orig.contains_key(key) {
                    changes.push(Change::Added {
                        path: join_path(&path, key),
                        value: modif_val.clone(),
                    });
                }
            }
        }
        (Value::Array(orig), Value::Array(modif)) => {
            let common = orig.len().min(modif.len());
            for index in 0..common {
                walk(
                    &orig[index],
                    &modif[index],
                    join_path(&path, &index.to_string()),
                    changes,
                );
            }
            for (index, value) in orig.iter().enumerate().skip(common) {
                changes.push(Change::Array {
                    path: path.clone(),
                    index,
                    item: ElementChange::Removed {
                        value: value.clone(),
                    },
                });
            }
            for (index, value) in modif.iter().enumerate().skip(common) {
                changes.push(Change::Array {
                    path: path.clone(),
                    index,
                    item: ElementChange::Added {
                        value: value.clone(),
                    },
                });
            }
        }
        (orig, modif) => {
            if orig != modif {
                changes.push(Change::Changed {
                    path,
                    from: orig.clone(),
                    to: modif.clone(),
                });
            }
        }
    }
}

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_identity_diff_is_empty() {
        let tree = json!({"a": 1, "b": {"c": [1, 2, 3]}});
        let report = diff_trees(&tree, &tree);
        assert!(report.changes.is_empty());
        assert_eq!(report.summary.added, 0);
        assert_eq!(report.summary.removed, 0);
        assert_eq!(report.summary.changed, 0);
        assert_eq!(report.summary.unchanged, 4);
    }

    #[test]
    fn test_added_removed_changed() {
        let original = json!({"name": "NK", "age": 25, "city": "SF"});
        let modified = json!({"name": "NK", "age": 26, "role": "admin"});
        let report = diff_trees(&original, &modified);

        assert!(report.changes.contains(&Change::Changed {
            path: "age".to_string(),
            from: json!(25),
            to: json!(26),
        }));
        assert!(report.changes.contains(&Change::Removed {
            path: "city".to_string(),
            value: json!("SF"),
        }));
        assert!(report.changes.contains(&Change::Added {
            path: "role".to_string(),
            value: json!("admin"),
        }));
        assert_eq!(report.summary.added, 1);
        assert_eq!(report.summary.removed, 1);
        assert_eq!(report.summary.changed, 1);
        // 3 original leaves - 1 removed - 1 changed
        assert_eq!(report.summary.unchanged, 1);
    }

    #[test]
    fn test_nested_paths_are_dot_joined() {
        let original = json!({"user": {"name": "NK"}});
        let modified = json!({"user": {"name": "Bob"}});
        let report = diff_trees(&original, &modified);
        assert_eq!(
            report.changes,
            vec![Change::Changed {
                path: "user.name".to_string(),
                from: json!("NK"),
                to: json!("Bob"),
            }]
        );
    }

    #[test]
    fn test_array_growth_and_shrink() {
        let report = diff_trees(&json!({"xs": [1, 2]}), &json!({"xs": [1, 2, 3]}));
        assert_eq!(
            report.changes,
            vec![Change::Array {
                path: "xs".to_string(),
                index: 2,
                item: ElementChange::Added { value: json!(3) },
            }]
        );
        assert_eq!(report.summary.added, 1);

        let report = diff_trees(&json!({"xs": [1, 2]}), &json!({"xs": [1]}));
        assert_eq!(report.summary.removed, 1);
    }

    #[test]
    fn test_array_element_edit_uses_index_path() {
        let report = diff_trees(&json!({"xs": [1, 2]}), &json!({"xs": [1, 9]}));
        assert_eq!(
            report.changes,
            vec![Change::Changed {
                path: "xs.1".to_string(),
                from: json!(2),
                to: json!(9),
            }]
        );
    }

    #[test]
    fn test_type_change_is_a_single_change() {
        let report = diff_trees(&json!({"a": {"b": 1}}), &json!({"a": [1]}));
        assert_eq!(
            report.changes,
            vec![Change::Changed {
                path: "a".to_string(),
                from: json!({"b": 1}),
                to: json!([1]),
            }]
        );
    }

    #[test]
    fn test_unchanged_is_the_documented_approximation() {
        // both leaves of "a" disappear into one type-change entry, so the
        // historical formula reports 1 where an exact count would say 0
        let original = json!({"a": {"x": 1, "y": 2}});
        let modified = json!({"a": 3});
        let report = diff_trees(&original, &modified);
        assert_eq!(report.summary.changed, 1);
        assert_eq!(report.summary.unchanged, 1);
    }

    #[test]
    fn test_wire_shape_of_changes() {
        let report = diff_trees(&json!({"a": 1}), &json!({"a": 2}));
        let wire = serde_json::to_value(&report.changes).unwrap();
        assert_eq!(
            wire,
            json!([{"type": "changed", "path": "a", "from": 1, "to": 2}])
        );
    }
}
