//! Tests for generated `Settings` implementations.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, Type, parse_quote};

use super::kind::field_kind;
use super::settings_impl;
use crate::derive::parse::parse_input;

fn normalise(tokens: &proc_macro2::TokenStream) -> String {
    tokens.to_string().replace(' ', "")
}

fn expand(input: &DeriveInput) -> Result<String> {
    let parsed = parse_input(input).map_err(|err| anyhow!(err))?;
    Ok(normalise(&settings_impl(input, &parsed)))
}

#[rstest]
#[case::string(parse_quote!(String), "FieldKind::Str")]
#[case::integer(parse_quote!(u16), "FieldKind::int::<u16>()")]
#[case::float(parse_quote!(f64), "FieldKind::Float")]
#[case::boolean(parse_quote!(bool), "FieldKind::Bool")]
#[case::optional(parse_quote!(Option<i32>), "FieldKind::Optional(::std::boxed::Box::new(::strata_config::schema::FieldKind::int::<i32>()))")]
#[case::sequence(parse_quote!(Vec<String>), "FieldKind::Sequence(::std::boxed::Box::new(::strata_config::schema::FieldKind::Str))")]
#[case::set(parse_quote!(std::collections::BTreeSet<bool>), "FieldKind::Sequence(")]
#[case::map(parse_quote!(HashMap<String, f32>), "FieldKind::Mapping(::std::boxed::Box::new(::strata_config::schema::FieldKind::Float))")]
#[case::other(parse_quote!(camino::Utf8PathBuf), "FieldKind::Any")]
fn maps_field_types(#[case] ty: Type, #[case] expected: &str) -> Result<()> {
    let tokens = normalise(&field_kind(&ty, false, &quote::quote!(::strata_config)));
    ensure!(tokens.contains(expected), "expected `{expected}` in `{tokens}`");
    Ok(())
}

#[test]
fn nested_fields_reference_the_inner_schema() -> Result<()> {
    let ty: Type = parse_quote!(Option<Database>);
    let tokens = normalise(&field_kind(&ty, true, &quote::quote!(::strata_config)));
    ensure!(
        tokens.contains("FieldKind::Nested(<Databaseas::strata_config::Settings>::schema)"),
        "unexpected tokens `{tokens}`"
    );
    Ok(())
}

#[test]
fn emits_schema_and_source_declaration() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[settings(
            env_prefix = "APP_",
            env_file = ".env",
            yaml_file = "config.yaml",
            yaml_file_encoding = "latin-1",
            source_order = ["init", "env", "secrets", "dotenv", "yaml"]
        )]
        struct AppSettings {
            app_name: String,
            #[settings(default = 8000)]
            port: u16,
            #[serde(default)]
            tags: Vec<String>,
        }
    };
    let tokens = expand(&input)?;
    for expected in [
        "impl::strata_config::SettingsforAppSettings",
        "Schema::new(\"AppSettings\"",
        "FieldSpec::new(\"app_name\",::strata_config::schema::FieldKind::Str)",
        ".with_default(||::strata_config::schema::default_value(8000))",
        ".with_serde_default()",
        ".env_prefix(\"APP_\")",
        ".env_file(\".env\")",
        ".yaml_file(\"config.yaml\")",
        ".yaml_file_encoding(::strata_config::FileEncoding::Latin1)",
        "SourceKind::SecretFile,::strata_config::SourceKind::DotEnv",
    ] {
        ensure!(tokens.contains(expected), "expected `{expected}` in `{tokens}`");
    }
    ensure!(!tokens.contains("after_resolve"), "no hook requested");
    Ok(())
}

#[test]
fn hook_and_crate_alias_are_honoured() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[settings(post_resolve_hook, crate = "cfg", extra = "allow")]
        struct Hooked {
            name: String,
            #[settings(extra)]
            rest: BTreeMap<String, String>,
        }
    };
    let tokens = expand(&input)?;
    ensure!(
        tokens.contains("<Selfascfg::PostResolveHook>::post_resolve(self,ctx)"),
        "expected hook forwarding in `{tokens}`"
    );
    ensure!(
        tokens.contains(".with_extra(cfg::schema::ExtraPolicy::Allow).with_extra_field(\"rest\")"),
        "expected extra policy in `{tokens}`"
    );
    ensure!(!tokens.contains("::strata_config"), "alias should replace the crate path");
    Ok(())
}

#[rstest]
#[case::declared_forbid(quote::quote!(#[settings(extra = "forbid")]), true)]
#[case::undeclared(quote::quote!(), false)]
fn only_a_declared_extra_policy_is_emitted(
    #[case] attrs: proc_macro2::TokenStream,
    #[case] emitted: bool,
) -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #attrs
        struct Section {
            host: String,
        }
    };
    let tokens = expand(&input)?;
    ensure!(
        tokens.contains(".with_extra(::strata_config::schema::ExtraPolicy::Forbid)") == emitted,
        "unexpected extra policy in `{tokens}`"
    );
    ensure!(!tokens.contains(".with_extra(") || emitted, "no policy expected in `{tokens}`");
    Ok(())
}
