//! Post-resolve hook support for normalisation and custom validation.
//!
//! This module provides the [`PostResolveHook`] trait and the
//! [`ResolveContext`] passed to it once a settings value has been
//! constructed from the merged sources.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

use crate::StrataResult;
use crate::merge::SourceKind;

/// Hook invoked after settings construction succeeds.
///
/// Most settings types do not need one. Implement it when a value must be
/// normalised after every source has been applied, or when a rule spans
/// several fields or goes beyond what the declared types express. Opt in with
/// `#[settings(post_resolve_hook)]`.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use strata_config::{PostResolveHook, ResolveContext, Settings, StrataError, StrataResult};
///
/// #[derive(Debug, Deserialize, Settings)]
/// #[settings(env_prefix = "APP_", post_resolve_hook)]
/// struct ServerSettings {
///     app_name: String,
///     #[settings(default = 8000)]
///     port: u32,
/// }
///
/// impl PostResolveHook for ServerSettings {
///     fn post_resolve(&mut self, _ctx: &ResolveContext) -> StrataResult<()> {
///         self.app_name = self.app_name.trim().to_owned();
///         if self.app_name.is_empty() {
///             return Err(StrataError::validation("app_name", "App name cannot be empty"));
///         }
///         if !(1..=65_535).contains(&self.port) {
///             return Err(StrataError::validation("port", "Port must be between 1 and 65535"));
///         }
///         Ok(())
///     }
/// }
///
/// let settings = ServerSettings::resolve_with(serde_json::json!({"app_name": "  demo  "}))
///     .expect("valid settings");
/// assert_eq!(settings.app_name, "demo");
/// ```
pub trait PostResolveHook: Sized {
    /// Adjust or reject the constructed settings.
    ///
    /// # Errors
    ///
    /// Returns an error, usually [`crate::StrataError::Validation`], to abort
    /// resolution.
    fn post_resolve(&mut self, ctx: &ResolveContext) -> StrataResult<()>;
}

/// Context provided to post-resolve hooks.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8PathBuf;
/// use strata_config::{ResolveContext, SourceKind};
///
/// let mut ctx = ResolveContext::new("APP_");
/// ctx.with_file(Utf8PathBuf::from("config.yaml"))
///     .with_source("port", SourceKind::Environment);
///
/// assert_eq!(ctx.prefix(), "APP_");
/// assert_eq!(ctx.loaded_files().len(), 1);
/// assert_eq!(ctx.source_of("port"), Some(SourceKind::Environment));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    prefix: String,
    loaded_files: Vec<Utf8PathBuf>,
    provenance: BTreeMap<String, SourceKind>,
}

impl ResolveContext {
    /// Creates a new context with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            loaded_files: Vec::new(),
            provenance: BTreeMap::new(),
        }
    }

    pub(crate) fn from_parts(
        prefix: &str,
        loaded_files: Vec<Utf8PathBuf>,
        provenance: BTreeMap<String, SourceKind>,
    ) -> Self {
        Self {
            prefix: prefix.to_owned(),
            loaded_files,
            provenance,
        }
    }

    /// Adds a file or directory that contributed keys.
    pub fn with_file(&mut self, path: Utf8PathBuf) -> &mut Self {
        self.loaded_files.push(path);
        self
    }

    /// Records the source of the leaf at dotted `path`.
    pub fn with_source(&mut self, path: impl Into<String>, kind: SourceKind) -> &mut Self {
        self.provenance.insert(path.into(), kind);
        self
    }

    /// Returns the environment prefix of the settings type.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the files and directories that contributed keys, highest
    /// precedence first.
    #[must_use]
    pub fn loaded_files(&self) -> &[Utf8PathBuf] {
        &self.loaded_files
    }

    /// Whether `path` contributed keys.
    #[must_use]
    pub fn loaded(&self, path: &Utf8Path) -> bool {
        self.loaded_files.iter().any(|p| p == path)
    }

    /// Source that supplied the leaf at dotted `path`; `None` when the value
    /// came from a default.
    #[must_use]
    pub fn source_of(&self, path: &str) -> Option<SourceKind> {
        self.provenance.get(path).copied()
    }
}
