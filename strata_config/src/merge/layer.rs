//! Layer metadata and transport values for merges.

use std::borrow::Cow;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use super::RawMapping;

/// Origin of a merge layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[non_exhaustive]
pub enum SourceKind {
    /// Values passed explicitly by the caller.
    Init,
    /// Values collected from process environment variables.
    Environment,
    /// Values read from a `.env` file.
    DotEnv,
    /// Values read from a secrets directory, one file per key.
    SecretFile,
    /// Values read from a structured (YAML) file.
    StructuredFile,
}

impl SourceKind {
    /// Every source kind, highest default precedence first.
    pub const ALL: [Self; 5] = [
        Self::Init,
        Self::Environment,
        Self::DotEnv,
        Self::SecretFile,
        Self::StructuredFile,
    ];

    /// Short lowercase label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Environment => "environment",
            Self::DotEnv => "dotenv",
            Self::SecretFile => "secrets",
            Self::StructuredFile => "yaml",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One source's contribution to a merge.
#[derive(Clone, Debug)]
pub struct MergeLayer<'a> {
    kind: SourceKind,
    value: Cow<'a, RawMapping>,
    path: Option<Utf8PathBuf>,
}

impl<'a> MergeLayer<'a> {
    /// Construct a layer from a mapping.
    #[must_use]
    pub const fn new(kind: SourceKind, value: Cow<'a, RawMapping>) -> Self {
        Self {
            kind,
            value,
            path: None,
        }
    }

    /// Construct an empty layer, used when a source has nothing to offer.
    #[must_use]
    pub fn empty(kind: SourceKind) -> Self {
        Self::new(kind, Cow::Owned(RawMapping::new()))
    }

    /// Construct a layer from a JSON value, returning `None` unless the value
    /// is an object.
    #[must_use]
    pub fn from_value(kind: SourceKind, value: Value) -> Option<MergeLayer<'static>> {
        match value {
            Value::Object(map) => Some(MergeLayer::new(kind, Cow::Owned(map))),
            _ => None,
        }
    }

    /// Attach the file or directory this layer was read from.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the source kind of the layer.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Returns the associated path if this layer was read from the
    /// filesystem.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Borrow the layer's mapping.
    #[must_use]
    pub fn value(&self) -> &RawMapping {
        &self.value
    }

    /// Whether the layer contributes no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns an owned mapping representing the layer.
    #[must_use]
    pub fn into_value(self) -> RawMapping {
        self.value.into_owned()
    }

    /// Convert this layer into a `'static` owned variant.
    #[must_use]
    pub fn into_owned(self) -> MergeLayer<'static> {
        MergeLayer {
            kind: self.kind,
            value: Cow::Owned(self.value.into_owned()),
            path: self.path,
        }
    }
}
