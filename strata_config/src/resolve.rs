//! Resolution pipeline: fetch every source, merge by precedence, construct.

use std::ffi::OsString;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::merge::{MergeComposer, SourceKind};
use crate::post_resolve::ResolveContext;
use crate::schema::{Schema, construct};
use crate::source::{
    DotEnvSource, EnvSource, InitSource, KeyRules, RawSource, SecretsSource, YamlSource,
};
use crate::{Settings, SettingsConfig, StrataResult};

/// Resolves a settings type from its declared sources.
///
/// A resolver holds no state between calls: every [`Resolver::resolve`]
/// re-reads the environment and every file, so identical inputs always
/// produce equal values.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use strata_config::{Resolver, Settings};
///
/// #[derive(Debug, Deserialize, Settings)]
/// #[settings(env_prefix = "DEMO_")]
/// struct Demo {
///     #[settings(default = "localhost")]
///     host: String,
///     #[settings(default = 8000)]
///     port: u16,
/// }
///
/// let demo: Demo = Resolver::new()
///     .with_env([("DEMO_PORT", "9999")])
///     .resolve()
///     .expect("valid settings");
/// assert_eq!((demo.host.as_str(), demo.port), ("localhost", 9999));
/// ```
#[derive(Debug)]
pub struct Resolver<T> {
    config: SettingsConfig,
    init: InitSource,
    vars: Option<Vec<(OsString, OsString)>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Settings> Default for Resolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Settings> Resolver<T> {
    /// Resolver using the sources declared by `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: T::settings_config(),
            init: InitSource::empty(),
            vars: None,
            _marker: PhantomData,
        }
    }

    /// Replace the declared sources with `config`.
    #[must_use]
    pub fn with_config(mut self, config: SettingsConfig) -> Self {
        self.config = config;
        self
    }

    /// Supply explicit values; they form the Init layer.
    #[must_use]
    pub fn with_init(mut self, values: Value) -> Self {
        self.init = InitSource::new(values);
        self
    }

    /// Supply explicit values from any serialisable type.
    ///
    /// # Errors
    ///
    /// Returns an error when `values` cannot be represented as JSON.
    pub fn with_init_from<S: Serialize>(mut self, values: &S) -> StrataResult<Self> {
        self.init = InitSource::from_serialize(values)?;
        Ok(self)
    }

    /// Read `vars` in place of the process environment.
    #[must_use]
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Declared sources for this resolution.
    #[must_use]
    pub const fn config(&self) -> &SettingsConfig {
        &self.config
    }

    /// Build the declared sources, highest precedence first. Sources with no
    /// declared input are omitted.
    fn sources(&self, schema: &Schema) -> Vec<Box<dyn RawSource>> {
        let fields: Vec<&'static str> = schema.field_names().collect();
        let rules = KeyRules::from_config(&self.config).with_schema(schema.clone());
        self.config
            .order()
            .iter()
            .filter_map(|kind| -> Option<Box<dyn RawSource>> {
                match kind {
                    SourceKind::Init => Some(Box::new(self.init.clone())),
                    SourceKind::Environment => {
                        let env = EnvSource::new(rules.clone()).restrict_to(fields.iter().copied());
                        Some(Box::new(match &self.vars {
                            Some(vars) => env.with_vars(vars.iter().cloned()),
                            None => env,
                        }))
                    }
                    SourceKind::DotEnv => self.config.env_file_path().map(|(path, encoding)| {
                        Box::new(DotEnvSource::new(path, encoding, rules.clone())) as Box<dyn RawSource>
                    }),
                    SourceKind::SecretFile => self.config.secrets_dir_path().map(|path| {
                        Box::new(
                            SecretsSource::new(path, rules.clone())
                                .restrict_to(fields.iter().copied()),
                        ) as Box<dyn RawSource>
                    }),
                    SourceKind::StructuredFile => {
                        self.config.yaml_file_path().map(|(path, encoding)| {
                            Box::new(YamlSource::new(path, encoding)) as Box<dyn RawSource>
                        })
                    }
                }
            })
            .collect()
    }

    /// Fetch every source in precedence order, merge, construct `T` and run
    /// its post-resolve step.
    ///
    /// # Errors
    ///
    /// Fails on the first error: an invalid source order, a malformed or
    /// unreadable source, colliding keys, or failed validation. No partially
    /// populated value is returned.
    pub fn resolve(&self) -> StrataResult<T> {
        self.config.order().validate()?;
        let schema = T::schema();
        let mut composer = MergeComposer::new(self.config.order().clone());
        for source in self.sources(&schema) {
            let layer = source.fetch()?;
            debug!(source = %layer.kind(), keys = layer.value().len(), "fetched source");
            composer.push_layer(layer);
        }
        let (value, provenance, files) = composer.compose().into_parts();
        debug!(
            settings = schema.type_name(),
            leaves = provenance.len(),
            "merged sources"
        );
        let mut settings = construct::<T>(value)?;
        let ctx = ResolveContext::from_parts(self.config.prefix(), files, provenance);
        settings.after_resolve(&ctx)?;
        Ok(settings)
    }
}
