//! Token generation for the `Settings` implementation.

mod kind;
#[cfg(test)]
mod tests;

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use super::parse::{
    DefaultAttr, Encoding, ExtraPolicy, ParsedField, ParsedInput, SourceName, StructAttrs,
};
use kind::field_kind;

/// Path through which generated code reaches the runtime crate.
fn crate_path(attrs: &StructAttrs) -> TokenStream {
    attrs
        .crate_path
        .as_ref()
        .map_or_else(|| quote!(::strata_config), |path| quote!(#path))
}

fn encoding_tokens(encoding: Encoding, krate: &TokenStream) -> TokenStream {
    match encoding {
        Encoding::Utf8 => quote!(#krate::FileEncoding::Utf8),
        Encoding::Latin1 => quote!(#krate::FileEncoding::Latin1),
    }
}

fn source_tokens(source: SourceName, krate: &TokenStream) -> TokenStream {
    match source {
        SourceName::Init => quote!(#krate::SourceKind::Init),
        SourceName::Env => quote!(#krate::SourceKind::Environment),
        SourceName::DotEnv => quote!(#krate::SourceKind::DotEnv),
        SourceName::Secrets => quote!(#krate::SourceKind::SecretFile),
        SourceName::Yaml => quote!(#krate::SourceKind::StructuredFile),
    }
}

/// Builder calls applied to `SettingsConfig::new()`.
fn config_calls(attrs: &StructAttrs, krate: &TokenStream) -> Vec<TokenStream> {
    let mut calls = Vec::new();
    if let Some(prefix) = &attrs.env_prefix {
        calls.push(quote!(.env_prefix(#prefix)));
    }
    if let Some(delimiter) = &attrs.env_nested_delimiter {
        calls.push(quote!(.env_nested_delimiter(#delimiter)));
    }
    if attrs.case_sensitive {
        calls.push(quote!(.case_sensitive(true)));
    }
    if let Some(path) = &attrs.env_file {
        calls.push(quote!(.env_file(#path)));
    }
    if let Some(encoding) = attrs.env_file_encoding {
        let tokens = encoding_tokens(encoding, krate);
        calls.push(quote!(.env_file_encoding(#tokens)));
    }
    if let Some(path) = &attrs.secrets_dir {
        calls.push(quote!(.secrets_dir(#path)));
    }
    if let Some(path) = &attrs.yaml_file {
        calls.push(quote!(.yaml_file(#path)));
    }
    if let Some(encoding) = attrs.yaml_file_encoding {
        let tokens = encoding_tokens(encoding, krate);
        calls.push(quote!(.yaml_file_encoding(#tokens)));
    }
    if let Some(order) = &attrs.source_order {
        let kinds = order.iter().map(|source| source_tokens(*source, krate));
        calls.push(quote!(
            .source_order(#krate::SourceOrder::unchecked(::std::vec![#(#kinds),*]))
        ));
    }
    calls
}

fn field_spec(field: &ParsedField, krate: &TokenStream) -> TokenStream {
    let key = &field.key;
    let ty = &field.ty;
    let kind = field_kind(ty, field.attrs.nested, krate);
    let default = field.attrs.default.as_ref().map(|default| {
        let expr = match default {
            DefaultAttr::Expr(expr) => quote!(#expr),
            DefaultAttr::Trait => quote!(<#ty as ::core::default::Default>::default()),
        };
        quote!(.with_default(|| #krate::schema::default_value(#expr)))
    });
    let serde_default = field.serde_default.then(|| quote!(.with_serde_default()));
    quote! {
        #krate::schema::FieldSpec::new(#key, #kind) #default #serde_default
    }
}

fn schema_tokens(input: &DeriveInput, parsed: &ParsedInput, krate: &TokenStream) -> TokenStream {
    let name = input.ident.to_string();
    let specs = parsed.fields.iter().map(|field| field_spec(field, krate));
    let policy = match parsed.struct_attrs.extra {
        Some(ExtraPolicy::Ignore) => Some(quote!(.with_extra(#krate::schema::ExtraPolicy::Ignore))),
        Some(ExtraPolicy::Allow) => Some(quote!(.with_extra(#krate::schema::ExtraPolicy::Allow))),
        Some(ExtraPolicy::Forbid) => Some(quote!(.with_extra(#krate::schema::ExtraPolicy::Forbid))),
        None => None,
    };
    let extra_field = parsed
        .extra_field()
        .map(|key| quote!(.with_extra_field(#key)));
    quote! {
        #krate::schema::Schema::new(#name, ::std::vec![#(#specs),*]) #policy #extra_field
    }
}

/// Emit `impl Settings for <input>`.
pub(crate) fn settings_impl(input: &DeriveInput, parsed: &ParsedInput) -> TokenStream {
    let attrs = &parsed.struct_attrs;
    let krate = crate_path(attrs);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let schema = schema_tokens(input, parsed, &krate);
    let calls = config_calls(attrs, &krate);
    let after_resolve = attrs.post_resolve_hook.then(|| {
        quote! {
            fn after_resolve(
                &mut self,
                ctx: &#krate::ResolveContext,
            ) -> #krate::StrataResult<()> {
                <Self as #krate::PostResolveHook>::post_resolve(self, ctx)
            }
        }
    });
    quote! {
        impl #impl_generics #krate::Settings for #ident #ty_generics #where_clause {
            fn schema() -> #krate::schema::Schema {
                #schema
            }

            fn settings_config() -> #krate::SettingsConfig {
                #krate::SettingsConfig::new() #(#calls)*
            }

            #after_resolve
        }
    }
}
