//! Procedural macros for `strata_config`.
//!
//! `#[derive(Settings)]` emits, at compile time, the field table a settings
//! struct is validated against and the declaration of the sources it reads.
//! Attribute values that can be checked early (encoding labels, the
//! extra-keys policy, the source order) are rejected during expansion rather
//! than at resolution time.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `strata_config::Settings`.
///
/// Struct attributes, all under `#[settings(...)]`:
///
/// - `env_prefix = "APP_"`
/// - `env_nested_delimiter = "__"` (an empty string disables nesting)
/// - `case_sensitive` or `case_sensitive = true`
/// - `env_file = ".env"`, `env_file_encoding = "utf-8"`
/// - `secrets_dir = "/run/secrets"`
/// - `yaml_file = "config.yaml"`, `yaml_file_encoding = "latin-1"`
/// - `extra = "forbid" | "ignore" | "allow"`; when omitted, unknown keys
///   are rejected for the resolved type and ignored inside nested fields
/// - `source_order = ["init", "env", "dotenv", "secrets", "yaml"]`
/// - `post_resolve_hook`
/// - `crate = "path"` to reach the runtime crate through an alias
///
/// Field attributes: `default = <expr>`, bare `default`, `nested` and
/// `extra`.
#[proc_macro_derive(Settings, attributes(settings))]
pub fn derive_settings(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
