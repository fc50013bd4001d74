//! Process environment source.

use std::borrow::Cow;
use std::ffi::OsString;

use tracing::debug;

use super::{KeyRules, RawSource};
use crate::StrataResult;
use crate::merge::{MergeLayer, SourceKind};

/// Source reading prefixed variables from the process environment.
///
/// The environment is shared by everything in the process, so only variables
/// whose first path segment names a declared field are collected; any other
/// prefixed variable is ignored rather than reported as an extra key.
#[derive(Clone, Debug)]
pub struct EnvSource {
    rules: KeyRules,
    fields: Option<Vec<String>>,
    vars: Option<Vec<(OsString, OsString)>>,
}

impl EnvSource {
    /// Read the live process environment with `rules`.
    #[must_use]
    pub const fn new(rules: KeyRules) -> Self {
        Self {
            rules,
            fields: None,
            vars: None,
        }
    }

    /// Keep only keys whose first segment names one of `fields`.
    #[must_use]
    pub fn restrict_to<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Read `vars` instead of the process environment.
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
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

    fn snapshot(&self) -> Vec<(OsString, OsString)> {
        self.vars
            .clone()
            .unwrap_or_else(|| std::env::vars_os().collect())
    }
}

impl RawSource for EnvSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Environment
    }

    fn fetch(&self) -> StrataResult<MergeLayer<'static>> {
        let entries = self
            .snapshot()
            .into_iter()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(k), Ok(v)) => Some((k, v)),
                (Ok(k), Err(_)) => {
                    debug!(key = %k, "skipping environment variable with a non-UTF-8 value");
                    None
                }
                (Err(_), _) => None,
            })
            .filter(|(key, _)| {
                self.rules.strip(key).is_some_and(|stripped| {
                    self.fields
                        .as_deref()
                        .is_none_or(|fields| self.rules.declares(fields, &stripped))
                })
            });
        let map = self.rules.collect(entries, SourceKind::Environment)?;
        debug!(keys = map.len(), "collected environment layer");
        Ok(MergeLayer::new(SourceKind::Environment, Cow::Owned(map)))
    }
}
