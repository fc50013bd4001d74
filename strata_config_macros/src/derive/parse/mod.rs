//! Parsing utilities for the `Settings` derive macro.
//!
//! Every `#[settings(...)]` key is validated here. Unknown keys, malformed
//! encoding labels, unknown extra-keys policies and source orders that are
//! not a permutation of the five sources all fail expansion with a spanned
//! error.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::parenthesized;
use syn::{Attribute, Expr, ExprArray, Lit, Token};

mod input;
mod literals;
mod serde_attrs;
mod type_utils;

pub(crate) use input::{ParsedField, ParsedInput, parse_input};
use literals::{flag, lit_str};
use serde_attrs::{serde_field_key, serde_has_default, serde_rename_all};
pub(crate) use type_utils::{Scalar, map_value, option_inner, scalar, sequence_inner};

/// Text encodings accepted for file-backed sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Encoding {
    Utf8,
    Latin1,
}

impl Encoding {
    fn parse(label: &str, span: Span) -> syn::Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            _ => Err(syn::Error::new(
                span,
                format!("unsupported encoding '{label}'; expected \"utf-8\" or \"latin-1\""),
            )),
        }
    }
}

/// Extra-keys policy named by `extra = "..."`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExtraPolicy {
    Forbid,
    Ignore,
    Allow,
}

impl ExtraPolicy {
    fn parse(value: &str, span: Span) -> syn::Result<Self> {
        match value {
            "forbid" => Ok(Self::Forbid),
            "ignore" => Ok(Self::Ignore),
            "allow" => Ok(Self::Allow),
            _ => Err(syn::Error::new(
                span,
                format!("unknown extra policy '{value}'; expected \"forbid\", \"ignore\" or \"allow\""),
            )),
        }
    }
}

/// Source named in `source_order = [...]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SourceName {
    Init,
    Env,
    DotEnv,
    Secrets,
    Yaml,
}

impl SourceName {
    const COUNT: usize = 5;

    fn parse(value: &str, span: Span) -> syn::Result<Self> {
        match value {
            "init" => Ok(Self::Init),
            "env" | "environment" => Ok(Self::Env),
            "dotenv" => Ok(Self::DotEnv),
            "secrets" => Ok(Self::Secrets),
            "yaml" => Ok(Self::Yaml),
            _ => Err(syn::Error::new(
                span,
                format!(
                    "unknown source '{value}'; expected \"init\", \"env\", \"dotenv\", \"secrets\" or \"yaml\""
                ),
            )),
        }
    }
}

/// Struct-level `#[settings(...)]` attributes.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    pub env_prefix: Option<String>,
    pub env_nested_delimiter: Option<String>,
    pub case_sensitive: bool,
    pub env_file: Option<String>,
    pub env_file_encoding: Option<Encoding>,
    pub secrets_dir: Option<String>,
    pub yaml_file: Option<String>,
    pub yaml_file_encoding: Option<Encoding>,
    pub extra: Option<ExtraPolicy>,
    pub source_order: Option<Vec<SourceName>>,
    pub post_resolve_hook: bool,
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
}

/// How a field attribute supplies a default.
#[derive(Clone)]
pub(crate) enum DefaultAttr {
    /// `default = <expr>`
    Expr(Expr),
    /// bare `default`, using the field type's `Default` impl
    Trait,
}

/// Field-level `#[settings(...)]` attributes.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub default: Option<DefaultAttr>,
    pub nested: bool,
    pub extra: bool,
}

/// Iterate all `#[settings(...)]` attributes once and apply a callback.
fn parse_settings<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("settings")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string);
    meta.error(format!("unknown settings attribute '{key}'"))
}

fn parse_encoding(meta: &ParseNestedMeta, key: &str) -> syn::Result<Encoding> {
    let s = lit_str(meta, key)?;
    Encoding::parse(&s.value(), s.span())
}

fn parse_source_order(meta: &ParseNestedMeta) -> syn::Result<Vec<SourceName>> {
    let array = meta.value()?.parse::<ExprArray>()?;
    let mut order = Vec::with_capacity(SourceName::COUNT);
    for elem in &array.elems {
        let Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) = elem
        else {
            return Err(syn::Error::new_spanned(elem, "source_order entries must be strings"));
        };
        let name = SourceName::parse(&s.value(), s.span())?;
        if order.contains(&name) {
            return Err(syn::Error::new(s.span(), "source listed more than once"));
        }
        order.push(name);
    }
    if order.len() != SourceName::COUNT {
        return Err(syn::Error::new_spanned(
            array,
            "source_order must list each of \"init\", \"env\", \"dotenv\", \"secrets\" and \"yaml\" exactly once",
        ));
    }
    Ok(order)
}

fn string_value(meta: &ParseNestedMeta, key: &str) -> syn::Result<Option<String>> {
    Ok(Some(lit_str(meta, key)?.value()))
}

/// Extracts `#[settings(...)]` metadata applied to a struct.
///
/// Unknown keys are rejected so a misspelt attribute never silently changes
/// where settings come from.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_settings(attrs, |meta| {
        let key = meta.path.get_ident().map(ToString::to_string);
        match key.as_deref() {
            Some("env_prefix") => out.env_prefix = string_value(meta, "env_prefix")?,
            Some("env_nested_delimiter") => {
                out.env_nested_delimiter = string_value(meta, "env_nested_delimiter")?;
            }
            Some("case_sensitive") => out.case_sensitive = flag(meta, "case_sensitive")?,
            Some("env_file") => out.env_file = string_value(meta, "env_file")?,
            Some("env_file_encoding") => {
                out.env_file_encoding = Some(parse_encoding(meta, "env_file_encoding")?);
            }
            Some("secrets_dir") => out.secrets_dir = string_value(meta, "secrets_dir")?,
            Some("yaml_file") => out.yaml_file = string_value(meta, "yaml_file")?,
            Some("yaml_file_encoding") => {
                out.yaml_file_encoding = Some(parse_encoding(meta, "yaml_file_encoding")?);
            }
            Some("extra") => {
                let s = lit_str(meta, "extra")?;
                out.extra = Some(ExtraPolicy::parse(&s.value(), s.span())?);
            }
            Some("source_order") => out.source_order = Some(parse_source_order(meta)?),
            Some("post_resolve_hook") => out.post_resolve_hook = flag(meta, "post_resolve_hook")?,
            Some("crate") => {
                let s = lit_str(meta, "crate")?;
                let path: syn::Path =
                    syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
                out.crate_path = Some(path);
            }
            _ => return Err(unknown_key(meta)),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Parses field-level `#[settings(...)]` attributes.
///
/// Recognised keys are `default` (bare or `= <expr>`), `nested` and
/// `extra`.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_settings(attrs, |meta| {
        let key = meta.path.get_ident().map(ToString::to_string);
        match key.as_deref() {
            Some("default") => {
                out.default = Some(if meta.input.peek(Token![=]) {
                    DefaultAttr::Expr(meta.value()?.parse()?)
                } else {
                    DefaultAttr::Trait
                });
            }
            Some("nested") => out.nested = flag(meta, "nested")?,
            Some("extra") => out.extra = flag(meta, "extra")?,
            _ => return Err(unknown_key(meta)),
        }
        Ok(())
    })?;
    Ok(out)
}
