//! Serde attributes that change a field's key or make it optional.
//!
//! Schema keys must equal the keys serde reads, so a field's key honours
//! `#[serde(rename = "...")]` and the container's `rename_all` rule. A
//! `#[serde(default)]` on the field or container lets a field be absent.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Field, LitStr, Token};

use super::discard_unknown;

/// Case conversion applied to every field name by `rename_all`.
pub(crate) type RenameRule = fn(&str) -> String;

const RENAME_RULES: [(&str, RenameRule); 8] = [
    ("lowercase", str::to_ascii_lowercase),
    ("UPPERCASE", str::to_ascii_uppercase),
    ("PascalCase", <str as ToUpperCamelCase>::to_upper_camel_case),
    ("camelCase", <str as ToLowerCamelCase>::to_lower_camel_case),
    ("snake_case", <str as ToSnakeCase>::to_snake_case),
    ("SCREAMING_SNAKE_CASE", <str as ToShoutySnakeCase>::to_shouty_snake_case),
    ("kebab-case", <str as ToKebabCase>::to_kebab_case),
    ("SCREAMING-KEBAB-CASE", <str as ToShoutyKebabCase>::to_shouty_kebab_case),
];

fn rename_rule(label: &LitStr) -> syn::Result<RenameRule> {
    let value = label.value();
    RENAME_RULES
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, rule)| *rule)
        .ok_or_else(|| {
            syn::Error::new(
                label.span(),
                format!("unsupported serde rename_all value '{value}'"),
            )
        })
}

/// Walk every `#[serde(...)]` entry, handing each to `visit` first.
///
/// Entries `visit` does not claim are consumed and ignored; serde itself
/// validates them.
fn scan_serde<F>(attrs: &[Attribute], mut visit: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<bool>,
{
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if visit(&meta)? {
                Ok(())
            } else {
                discard_unknown(&meta)
            }
        })?;
    }
    Ok(())
}

/// Name used when deserialising: `key = "..."` or
/// `key(deserialize = "...")`. A serialise-only rename yields `None`.
fn deserialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return meta.value()?.parse::<LitStr>().map(Some);
    }
    let mut found = None;
    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("deserialize") {
                found = Some(inner.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                discard_unknown(&inner)
            }
        })?;
    }
    Ok(found)
}

/// The container's `rename_all` rule, if any.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut rule = None;
    scan_serde(attrs, |meta| {
        if !meta.path.is_ident("rename_all") {
            return Ok(false);
        }
        if let Some(label) = deserialize_name(meta)? {
            rule = Some(rename_rule(&label)?);
        }
        Ok(true)
    })?;
    Ok(rule)
}

/// Key serde reads `field` from: its own rename, else the container rule
/// applied to the identifier (raw identifiers lose their `r#`).
pub(crate) fn serde_field_key(field: &Field, rename_all: Option<RenameRule>) -> syn::Result<String> {
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
    };
    let mut renamed = None;
    scan_serde(&field.attrs, |meta| {
        if !meta.path.is_ident("rename") {
            return Ok(false);
        }
        if let Some(name) = deserialize_name(meta)? {
            renamed = Some(name.value());
        }
        Ok(true)
    })?;
    if let Some(key) = renamed {
        return Ok(key);
    }
    let raw = ident.to_string();
    let name = raw.strip_prefix("r#").unwrap_or(&raw);
    Ok(rename_all.map_or_else(|| name.to_owned(), |rule| rule(name)))
}

/// Whether `attrs` carry `#[serde(default)]` or `#[serde(default = "...")]`.
pub(crate) fn serde_has_default(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut has_default = false;
    scan_serde(attrs, |meta| {
        if !meta.path.is_ident("default") {
            return Ok(false);
        }
        has_default = true;
        if meta.input.peek(Token![=]) {
            meta.value()?.parse::<syn::Expr>()?;
        }
        Ok(true)
    })?;
    Ok(has_default)
}
