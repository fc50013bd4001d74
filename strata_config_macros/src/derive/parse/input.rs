//! Input parsing for the `Settings` derive macro.
//!
//! This module gathers the struct identifier, fields, and relevant attribute
//! metadata in one pass so macro expansion can fail fast with useful errors.

use syn::{Data, DeriveInput, Fields};

use super::{
    ExtraPolicy, FieldAttrs, StructAttrs, parse_field_attrs, parse_struct_attrs, serde_field_key,
    serde_has_default, serde_rename_all,
};

/// One named field with its resolved key and attributes.
pub(crate) struct ParsedField {
    pub ty: syn::Type,
    /// Key serde deserialises the field from.
    pub key: String,
    pub attrs: FieldAttrs,
    /// Field or container carries `#[serde(default)]`.
    pub serde_default: bool,
}

/// Everything expansion needs from the derive input.
pub(crate) struct ParsedInput {
    pub struct_attrs: StructAttrs,
    pub fields: Vec<ParsedField>,
}

impl ParsedInput {
    /// Key of the field marked `#[settings(extra)]`, if any.
    pub(crate) fn extra_field(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.attrs.extra)
            .map(|f| f.key.as_str())
    }
}

/// Gathers information from the user-provided struct.
///
/// Only structs with named fields are accepted. At most one field may
/// collect extra keys, and only when the struct's policy allows them.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Settings requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Settings can only be derived for structs",
            ));
        }
    };

    let rename_all = serde_rename_all(&input.attrs)?;
    let container_default = serde_has_default(&input.attrs)?;
    let mut fields = Vec::with_capacity(named.len());
    let mut extra_seen = false;
    for field in named {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.extra {
            if extra_seen {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may collect extra keys",
                ));
            }
            if matches!(
                struct_attrs.extra,
                Some(ExtraPolicy::Forbid | ExtraPolicy::Ignore)
            ) {
                return Err(syn::Error::new_spanned(
                    field,
                    "an extra field requires `#[settings(extra = \"allow\")]`",
                ));
            }
            extra_seen = true;
        }
        fields.push(ParsedField {
            ty: field.ty.clone(),
            key: serde_field_key(field, rename_all)?,
            serde_default: container_default || serde_has_default(&field.attrs)?,
            attrs,
        });
    }
    Ok(ParsedInput {
        struct_attrs,
        fields,
    })
}
