//! Secrets directory source.

use std::borrow::Cow;
use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::{debug, warn};

use super::{KeyRules, RawSource};
use crate::merge::{MergeLayer, SourceKind};
use crate::{IoResultExt, StrataError, StrataResult};

/// Source reading one secret per regular file in a directory.
///
/// The file name is the key and the trimmed file content is the value.
/// Like the environment, only keys naming declared fields are collected.
#[derive(Clone, Debug)]
pub struct SecretsSource {
    dir: Utf8PathBuf,
    rules: KeyRules,
    fields: Option<Vec<String>>,
}

impl SecretsSource {
    /// Read secrets from `dir`, matching file names with `rules`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>, rules: KeyRules) -> Self {
        Self {
            dir: dir.into(),
            rules,
            fields: None,
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

    fn read_secrets(&self) -> StrataResult<Vec<(String, String)>> {
        let path = self.dir.as_path();
        let dir = Dir::open_ambient_dir(path, ambient_authority()).with_path(path)?;
        let mut secrets = Vec::new();
        for item in dir.entries().with_path(path)? {
            let entry = item.with_path(path)?;
            if !entry.file_type().with_path(path)?.is_file() {
                continue;
            }
            let name = entry.file_name().with_path(path)?;
            let keep = self.rules.strip(&name).is_some_and(|key| {
                self.fields
                    .as_deref()
                    .is_none_or(|fields| self.rules.declares(fields, &key))
            });
            if !keep {
                continue;
            }
            let contents = dir.read_to_string(&name).with_path(&path.join(&name))?;
            secrets.push((name, contents.trim().to_owned()));
        }
        Ok(secrets)
    }
}

fn check_dir(path: &Utf8Path) -> StrataResult<bool> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(StrataError::invalid_data(path, "secrets path is not a directory")),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_path(path),
    }
}

impl RawSource for SecretsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::SecretFile
    }

    fn fetch(&self) -> StrataResult<MergeLayer<'static>> {
        if !check_dir(&self.dir)? {
            warn!(path = %self.dir, "secrets directory does not exist");
            return Ok(MergeLayer::empty(SourceKind::SecretFile));
        }
        let secrets = self.read_secrets()?;
        let map = self.rules.collect(secrets, SourceKind::SecretFile)?;
        debug!(path = %self.dir, keys = map.len(), "collected secrets layer");
        Ok(MergeLayer::new(SourceKind::SecretFile, Cow::Owned(map)).with_path(self.dir.clone()))
    }
}
