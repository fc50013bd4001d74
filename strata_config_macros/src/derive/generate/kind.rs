//! Mapping from Rust field types to schema field kinds.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

use super::super::parse::{Scalar, map_value, option_inner, scalar, sequence_inner};

/// Tokens constructing the `FieldKind` for `ty`.
///
/// `nested` marks the innermost type (behind any `Option`, sequence or map)
/// as a settings struct of its own.
pub(super) fn field_kind(ty: &Type, nested: bool, krate: &TokenStream) -> TokenStream {
    let kind = quote!(#krate::schema::FieldKind);
    if let Some(inner) = option_inner(ty) {
        let inner_kind = field_kind(inner, nested, krate);
        return quote!(#kind::Optional(::std::boxed::Box::new(#inner_kind)));
    }
    if let Some(inner) = sequence_inner(ty) {
        let inner_kind = field_kind(inner, nested, krate);
        return quote!(#kind::Sequence(::std::boxed::Box::new(#inner_kind)));
    }
    if let Some(value) = map_value(ty) {
        let value_kind = field_kind(value, nested, krate);
        return quote!(#kind::Mapping(::std::boxed::Box::new(#value_kind)));
    }
    if nested {
        return quote!(#kind::Nested(<#ty as #krate::Settings>::schema));
    }
    match scalar(ty) {
        Scalar::Str => quote!(#kind::Str),
        Scalar::Int => quote!(#kind::int::<#ty>()),
        Scalar::Float => quote!(#kind::Float),
        Scalar::Bool => quote!(#kind::Bool),
        Scalar::Other => quote!(#kind::Any),
    }
}
