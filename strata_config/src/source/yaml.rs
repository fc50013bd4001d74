//! YAML structured-file source.

use std::borrow::Cow;

use camino::Utf8PathBuf;
use tracing::debug;

use super::RawSource;
use crate::file::load_yaml;
use crate::merge::{MergeLayer, SourceKind};
use crate::{FileEncoding, StrataResult};

/// Source reading a YAML file whose root is a mapping.
#[derive(Clone, Debug)]
pub struct YamlSource {
    path: Utf8PathBuf,
    encoding: FileEncoding,
}

impl YamlSource {
    /// Read `path` with `encoding`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, encoding: FileEncoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }
}

impl RawSource for YamlSource {
    fn kind(&self) -> SourceKind {
        SourceKind::StructuredFile
    }

    fn fetch(&self) -> StrataResult<MergeLayer<'static>> {
        let map = load_yaml(&self.path, self.encoding)?;
        debug!(path = %self.path, keys = map.len(), "collected yaml layer");
        Ok(MergeLayer::new(SourceKind::StructuredFile, Cow::Owned(map)).with_path(self.path.clone()))
    }
}
