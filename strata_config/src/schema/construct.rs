//! Validation of a merged mapping against a schema.

use serde_json::Value;
use tracing::debug;

use super::coerce::coerce;
use super::types::{ExtraPolicy, FieldKind, Schema};
use crate::error::{FieldErrorKind, ValidationErrors};
use crate::merge::{RawMapping, join_path, merge_lower};
use crate::{Settings, StrataResult, StrataResultExt};

/// Validate `merged` against `T::schema()` and deserialise it.
///
/// Every field failure across the tree is collected before returning, so one
/// error lists all missing, mistyped and extra keys.
///
/// # Errors
///
/// Returns [`StrataError::Validation`](crate::StrataError::Validation) when
/// any field fails, or when deserialisation rejects the coerced mapping.
pub fn construct<T: Settings>(merged: RawMapping) -> StrataResult<T> {
    let schema = T::schema();
    let mut errors = ValidationErrors::default();
    let value = construct_object(&schema, schema.extra(), merged, "", &mut errors);
    errors.into_result()?;
    debug!(settings = schema.type_name(), fields = value.len(), "constructing settings");
    serde_json::from_value(Value::Object(value)).into_strata()
}

/// Coerce every declared field of `schema` found in `map`, fill absent ones
/// from defaults and apply `policy` to the rest.
pub(super) fn construct_object(
    schema: &Schema,
    policy: ExtraPolicy,
    mut map: RawMapping,
    prefix: &str,
    errors: &mut ValidationErrors,
) -> RawMapping {
    let explicit_extra = schema.extra_field().and_then(|name| map.remove(name));
    let mut out = RawMapping::new();
    for field in schema.fields() {
        let name = field.name();
        if schema.extra_field() == Some(name) {
            continue;
        }
        let path = join_path(prefix, name);
        match map.remove(name) {
            Some(found) => {
                let value = match (field.default_value(), found) {
                    (Some(Value::Object(defaults)), Value::Object(mut object)) => {
                        merge_lower(&mut object, defaults);
                        Value::Object(object)
                    }
                    (_, other) => other,
                };
                out.insert(name.to_owned(), coerce(field.kind(), value, &path, errors));
            }
            None => {
                if let Some(default) = field.default_value() {
                    out.insert(name.to_owned(), coerce(field.kind(), default, &path, errors));
                } else if field.kind().is_optional() {
                    out.insert(name.to_owned(), Value::Null);
                } else if !field.has_serde_default() {
                    errors.push(path, FieldErrorKind::Missing);
                }
            }
        }
    }
    apply_extra_policy(schema, policy, map, explicit_extra, prefix, &mut out, errors);
    out
}

fn apply_extra_policy(
    schema: &Schema,
    policy: ExtraPolicy,
    extras: RawMapping,
    explicit: Option<Value>,
    prefix: &str,
    out: &mut RawMapping,
    errors: &mut ValidationErrors,
) {
    match policy {
        ExtraPolicy::Forbid => {
            for key in extras.keys() {
                errors.push(join_path(prefix, key), FieldErrorKind::Extra);
            }
        }
        ExtraPolicy::Ignore => {}
        ExtraPolicy::Allow => match schema.extra_field() {
            Some(name) => {
                let mut collected = match explicit {
                    Some(Value::Object(map)) => map,
                    _ => RawMapping::new(),
                };
                merge_lower(&mut collected, extras);
                let declared = schema.field(name).map(|f| f.kind());
                let path = join_path(prefix, name);
                let value = match declared {
                    Some(kind @ FieldKind::Mapping(_)) => {
                        coerce(kind, Value::Object(collected), &path, errors)
                    }
                    _ => Value::Object(collected),
                };
                out.insert(name.to_owned(), value);
            }
            None => out.extend(extras),
        },
    }
}
