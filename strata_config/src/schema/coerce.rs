//! Coercion of raw values into declared field kinds.
//!
//! Flat sources only ever produce strings, so every scalar kind accepts a
//! string spelling of its value. Failures are recorded against the field
//! path and the raw value is passed through unchanged.

use serde_json::{Number, Value};

use super::construct::construct_object;
use super::types::FieldKind;
use crate::error::{FieldErrorKind, ValidationErrors};
use crate::merge::{RawMapping, join_path};

const TRUE_WORDS: [&str; 6] = ["true", "1", "yes", "on", "t", "y"];
const FALSE_WORDS: [&str; 6] = ["false", "0", "no", "off", "f", "n"];

pub(super) const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(kind: &FieldKind, value: Value, path: &str, errors: &mut ValidationErrors) -> Value {
    errors.push(
        path,
        FieldErrorKind::TypeMismatch {
            expected: kind.describe(),
            found: type_name(&value),
        },
    );
    value
}

/// Coerce `value` into `kind`, recording failures under `path`.
pub(super) fn coerce(kind: &FieldKind, value: Value, path: &str, errors: &mut ValidationErrors) -> Value {
    match kind {
        FieldKind::Any => value,
        FieldKind::Str => match value {
            Value::String(_) => value,
            other => mismatch(kind, other, path, errors),
        },
        FieldKind::Int { min, max } => coerce_int(kind, (*min, *max), value, path, errors),
        FieldKind::Float => coerce_float(kind, value, path, errors),
        FieldKind::Bool => coerce_bool(kind, value, path, errors),
        FieldKind::Optional(inner) => match value {
            Value::Null => Value::Null,
            other => coerce(inner, other, path, errors),
        },
        FieldKind::Nested(schema) => match object_from(value) {
            Ok(map) => {
                let nested = schema();
                Value::Object(construct_object(&nested, nested.nested_extra(), map, path, errors))
            }
            Err(other) => mismatch(kind, other, path, errors),
        },
        FieldKind::Mapping(inner) => match object_from(value) {
            Ok(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| {
                        let item_path = join_path(path, &key);
                        (key, coerce(inner, item, &item_path, errors))
                    })
                    .collect(),
            ),
            Err(other) => mismatch(kind, other, path, errors),
        },
        FieldKind::Sequence(inner) => match array_from(value) {
            Ok(items) => Value::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let item_path = join_path(path, &index.to_string());
                        coerce(inner, item, &item_path, errors)
                    })
                    .collect(),
            ),
            Err(other) => mismatch(kind, other, path, errors),
        },
    }
}

fn coerce_int(
    kind: &FieldKind,
    (min, max): (i128, i128),
    value: Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Value {
    let parsed = match &value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    let Some(number) = parsed else {
        return mismatch(kind, value, path, errors);
    };
    if number < min || number > max {
        errors.push(path, FieldErrorKind::OutOfRange { min, max });
        return value;
    }
    i64::try_from(number)
        .map(Value::from)
        .or_else(|_| u64::try_from(number).map(Value::from))
        .unwrap_or(value)
}

fn coerce_float(kind: &FieldKind, value: Value, path: &str, errors: &mut ValidationErrors) -> Value {
    let parsed = match &value {
        Value::Number(_) => return value,
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(Number::from_f64),
        _ => None,
    };
    match parsed {
        Some(number) => Value::Number(number),
        None => mismatch(kind, value, path, errors),
    }
}

fn coerce_bool(kind: &FieldKind, value: Value, path: &str, errors: &mut ValidationErrors) -> Value {
    let parsed = match &value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => {
            let word = s.trim().to_ascii_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Some(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };
    match parsed {
        Some(b) => Value::Bool(b),
        None => mismatch(kind, value, path, errors),
    }
}

/// Accept an object, or a string holding a JSON object.
fn object_from(value: Value) -> Result<RawMapping, Value> {
    let parsed = match &value {
        Value::String(s) if s.trim_start().starts_with('{') => serde_json::from_str::<Value>(s).ok(),
        _ => None,
    };
    match (value, parsed) {
        (Value::Object(map), _) | (_, Some(Value::Object(map))) => Ok(map),
        (other, _) => Err(other),
    }
}

/// Accept an array, a string holding a JSON array, or a comma-separated
/// string whose trimmed items become string elements.
fn array_from(value: Value) -> Result<Vec<Value>, Value> {
    let parsed = match &value {
        Value::String(s) if s.trim_start().starts_with('[') => {
            Some(serde_json::from_str::<Value>(s).ok())
        }
        _ => None,
    };
    match (value, parsed) {
        (Value::Array(items), _) | (_, Some(Some(Value::Array(items)))) => Ok(items),
        (Value::String(s), None) if s.trim().is_empty() => Ok(Vec::new()),
        (Value::String(s), None) => Ok(s
            .split(',')
            .map(|item| Value::String(item.trim().to_owned()))
            .collect()),
        (other, _) => Err(other),
    }
}
