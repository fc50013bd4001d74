//! Expansion of flat delimited keys into nested mappings.
//!
//! Flat sources (environment, `.env`, secrets) name nested fields with a
//! delimiter: `DATABASE__HOST` becomes `{"database": {"host": ...}}` once the
//! prefix has been stripped and each segment matched to its declared
//! spelling.

use serde_json::Value;

use crate::merge::{RawMapping, SourceKind};
use crate::{StrataError, StrataResult};

/// Expand `entries` into a nested mapping by splitting keys on `delimiter`.
///
/// With `delimiter` set to `None` keys are inserted verbatim.
///
/// # Errors
///
/// Returns [`StrataError::KeyCollision`] when one key needs a path as a
/// scalar while another needs it as an object, when two keys produce the same
/// full path, or when a key contains an empty segment.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata_config::SourceKind;
/// use strata_config::expand::expand;
///
/// let nested = expand(
///     [
///         ("database__host".to_owned(), json!("localhost")),
///         ("database__port".to_owned(), json!("5432")),
///     ],
///     Some("__"),
///     SourceKind::Environment,
/// )
/// .expect("no collisions");
/// assert_eq!(
///     serde_json::Value::Object(nested),
///     json!({"database": {"host": "localhost", "port": "5432"}})
/// );
/// ```
pub fn expand<I>(entries: I, delimiter: Option<&str>, kind: SourceKind) -> StrataResult<RawMapping>
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut root = RawMapping::new();
    for (key, value) in entries {
        let segments: Vec<&str> = match delimiter {
            Some(d) => key.split(d).collect(),
            None => vec![key.as_str()],
        };
        if segments.iter().any(|s| s.is_empty()) {
            return Err(collision(kind, key.clone()));
        }
        insert_path(&mut root, &segments, value, kind)?;
    }
    Ok(root)
}

fn insert_path(
    root: &mut RawMapping,
    segments: &[&str],
    value: Value,
    kind: SourceKind,
) -> StrataResult<()> {
    let Some((leaf, parents)) = segments.split_last() else {
        return Ok(());
    };
    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = node
            .entry((*segment).to_owned())
            .or_insert_with(|| Value::Object(RawMapping::new()));
        match slot {
            Value::Object(child) => node = child,
            _ => {
                let path: Vec<&str> = segments.iter().take(depth + 1).copied().collect();
                return Err(collision(kind, path.join(".")));
            }
        }
    }
    if node.contains_key(*leaf) {
        return Err(collision(kind, segments.join(".")));
    }
    node.insert((*leaf).to_owned(), value);
    Ok(())
}

const fn collision(kind: SourceKind, path: String) -> StrataError {
    StrataError::KeyCollision { kind, path }
}
