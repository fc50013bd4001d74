//! Deep-merge mechanics where the accumulator holds higher precedence.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{RawMapping, SourceKind};

/// Fold a lower-precedence `incoming` mapping beneath `acc`.
///
/// Behaviour:
/// - Keys missing from `acc` are copied in.
/// - When both sides hold objects, they merge recursively.
/// - Otherwise the accumulated value wins and the incoming one is discarded,
///   whatever its type. Sequences are never concatenated.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::merge::merge_lower;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}}).as_object().cloned().unwrap_or_default();
/// let lower = json!({"a": 2, "b": {"x": 2, "y": 2}, "c": [3]});
/// merge_lower(&mut acc, lower.as_object().cloned().unwrap_or_default());
/// assert_eq!(
///     serde_json::Value::Object(acc),
///     json!({"a": 1, "b": {"x": 1, "y": 2}, "c": [3]})
/// );
/// ```
pub fn merge_lower(acc: &mut RawMapping, incoming: RawMapping) {
    for (key, value) in incoming {
        match acc.get_mut(&key) {
            Some(Value::Object(existing)) => {
                if let Value::Object(lower) = value {
                    merge_lower(existing, lower);
                }
            }
            Some(_) => {}
            None => {
                acc.insert(key, value);
            }
        }
    }
}

/// Variant of [`merge_lower`] that records which source supplied each leaf.
///
/// `prefix` is the dotted path of `acc` within the merged tree.
pub(super) fn merge_lower_tracking(
    acc: &mut RawMapping,
    incoming: RawMapping,
    prefix: &str,
    kind: SourceKind,
    provenance: &mut BTreeMap<String, SourceKind>,
) {
    for (key, value) in incoming {
        let path = join_path(prefix, &key);
        match acc.get_mut(&key) {
            Some(Value::Object(existing)) => {
                if let Value::Object(lower) = value {
                    merge_lower_tracking(existing, lower, &path, kind, provenance);
                }
            }
            Some(_) => {}
            None => {
                record_leaves(&value, &path, kind, provenance);
                acc.insert(key, value);
            }
        }
    }
}

/// Walk a value tree and record every leaf path with its source.
fn record_leaves(
    value: &Value,
    prefix: &str,
    kind: SourceKind,
    provenance: &mut BTreeMap<String, SourceKind>,
) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                record_leaves(child, &join_path(prefix, key), kind, provenance);
            }
        }
        _ => {
            provenance.insert(prefix.to_owned(), kind);
        }
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
