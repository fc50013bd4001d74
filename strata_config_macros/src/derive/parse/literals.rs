//! Literal parsing helpers for derive attributes.

use syn::{Lit, LitStr, Token};

/// Parses a literal from an attribute using `extractor`, naming `expected`
/// in the error when the literal has the wrong type.
fn parse_lit<T, F>(
    meta: &syn::meta::ParseNestedMeta,
    key: &str,
    expected: &str,
    extractor: F,
) -> Result<T, syn::Error>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

/// Parses a string literal from an attribute.
pub(crate) fn lit_str(meta: &syn::meta::ParseNestedMeta, key: &str) -> Result<LitStr, syn::Error> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a boolean flag written either bare (`key`) or as `key = true`.
pub(crate) fn flag(meta: &syn::meta::ParseNestedMeta, key: &str) -> Result<bool, syn::Error> {
    if !meta.input.peek(Token![=]) {
        return Ok(true);
    }
    parse_lit(meta, key, "boolean", |lit| match lit {
        Lit::Bool(b) => Some(b.value),
        _ => None,
    })
}
