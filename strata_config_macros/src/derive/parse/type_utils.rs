//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise wrapper types such as `Option<T>`, collections such as `Vec<T>`
//! and `BTreeMap<K, V>`, and the primitive scalars.

use syn::{GenericArgument, PathArguments, Type};

const INTEGERS: [&str; 12] = [
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Scalar shape of a type, judged by the final path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scalar {
    Str,
    Int,
    Float,
    Bool,
    Other,
}

/// Classify `ty` by its final path segment.
pub(crate) fn scalar(ty: &Type) -> Scalar {
    let Some(last) = last_ident(ty) else {
        return Scalar::Other;
    };
    match last.as_str() {
        "String" => Scalar::Str,
        "f32" | "f64" => Scalar::Float,
        "bool" => Scalar::Bool,
        name if INTEGERS.contains(&name) => Scalar::Int,
        _ => Scalar::Other,
    }
}

fn last_ident(ty: &Type) -> Option<String> {
    let Type::Path(p) = ty else {
        return None;
    };
    let last = p.path.segments.last()?;
    if !matches!(last.arguments, PathArguments::None) {
        return None;
    }
    Some(last.ident.to_string())
}

/// Returns the type arguments if the final segment of `ty` is `wrapper`.
///
/// The check is shallow and not recursive; fully-qualified forms such as
/// `std::option::Option<T>` match as well.
fn type_args<'a>(ty: &'a Type, wrapper: &str) -> Option<Vec<&'a Type>> {
    let Type::Path(p) = ty else {
        return None;
    };
    let last = p.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    Some(
        args.args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(inner) => Some(inner),
                _ => None,
            })
            .collect(),
    )
}

fn first_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    type_args(ty, wrapper)?.first().copied()
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    first_arg(ty, "Option")
}

/// Returns the element type if `ty` is `Vec<T>`, `HashSet<T>` or
/// `BTreeSet<T>`.
pub(crate) fn sequence_inner(ty: &Type) -> Option<&Type> {
    first_arg(ty, "Vec")
        .or_else(|| first_arg(ty, "HashSet"))
        .or_else(|| first_arg(ty, "BTreeSet"))
}

/// Returns the value type if `ty` is `HashMap<K, V>` or `BTreeMap<K, V>`.
pub(crate) fn map_value(ty: &Type) -> Option<&Type> {
    ["HashMap", "BTreeMap"]
        .into_iter()
        .find_map(|wrapper| type_args(ty, wrapper)?.get(1).copied())
}
