//! Layer composition: folding every source into one merged mapping.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use super::deep::merge_lower_tracking;
use super::{MergeLayer, RawMapping, SourceKind, SourceOrder};

/// Result of folding every layer in precedence order.
///
/// Alongside the merged tree, the mapping records which source supplied each
/// leaf and which files contributed keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedMapping {
    value: RawMapping,
    provenance: BTreeMap<String, SourceKind>,
    files: Vec<Utf8PathBuf>,
}

impl MergedMapping {
    /// Borrow the merged tree.
    #[must_use]
    pub const fn value(&self) -> &RawMapping {
        &self.value
    }

    /// Consume the mapping and return the merged tree.
    #[must_use]
    pub fn into_value(self) -> RawMapping {
        self.value
    }

    /// Source that supplied the leaf at dotted `path`.
    #[must_use]
    pub fn source_of(&self, path: &str) -> Option<SourceKind> {
        self.provenance.get(path).copied()
    }

    /// Every recorded leaf path with its source.
    #[must_use]
    pub const fn provenance(&self) -> &BTreeMap<String, SourceKind> {
        &self.provenance
    }

    /// Files and directories whose layers contributed at least one key.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Split the mapping into the merged tree, the provenance table and the
    /// contributing files.
    #[must_use]
    pub fn into_parts(self) -> (RawMapping, BTreeMap<String, SourceKind>, Vec<Utf8PathBuf>) {
        (self.value, self.provenance, self.files)
    }
}

/// Fold `layers`, ordered highest precedence first, into one mapping.
///
/// This is a pure function: callers supply the order explicitly and no
/// global state is consulted.
#[must_use]
pub fn compose<'a, I>(layers: I) -> MergedMapping
where
    I: IntoIterator<Item = MergeLayer<'a>>,
{
    let mut merged = MergedMapping::default();
    for layer in layers {
        let kind = layer.kind();
        if layer.is_empty() {
            continue;
        }
        if let Some(path) = layer.path().map(Utf8Path::to_path_buf) {
            merged.files.push(path);
        }
        let value = layer.into_value();
        debug!(source = %kind, keys = value.len(), "merging layer");
        merge_lower_tracking(&mut merged.value, value, "", kind, &mut merged.provenance);
    }
    merged
}

/// Builder that accumulates [`MergeLayer`] instances and folds them by
/// precedence.
///
/// Layers may be pushed in any order; [`MergeComposer::compose`] sorts them
/// by the composer's [`SourceOrder`] first, so the outcome never depends on
/// the order in which sources were fetched.
///
/// ```rust
/// use serde_json::json;
/// use strata_config::merge::{MergeComposer, MergeLayer, SourceKind};
///
/// let mut composer = MergeComposer::default();
/// composer.push_layer(
///     MergeLayer::from_value(SourceKind::StructuredFile, json!({"port": 8000}))
///         .expect("object"),
/// );
/// composer.push_layer(
///     MergeLayer::from_value(SourceKind::Environment, json!({"port": "9999"}))
///         .expect("object"),
/// );
/// let merged = composer.compose();
/// assert_eq!(merged.value().get("port"), Some(&json!("9999")));
/// assert_eq!(merged.source_of("port"), Some(SourceKind::Environment));
/// ```
#[derive(Debug, Default)]
pub struct MergeComposer {
    order: SourceOrder,
    layers: Vec<MergeLayer<'static>>,
}

impl MergeComposer {
    /// Create an empty composer using `order`.
    #[must_use]
    pub const fn new(order: SourceOrder) -> Self {
        Self {
            order,
            layers: Vec::new(),
        }
    }

    /// Push a layer.
    pub fn push_layer(&mut self, layer: MergeLayer<'static>) {
        self.layers.push(layer);
    }

    /// Consume the composer and return the accumulated layers sorted highest
    /// precedence first.
    #[must_use]
    pub fn layers(self) -> Vec<MergeLayer<'static>> {
        let Self { order, mut layers } = self;
        layers.sort_by_key(|layer| order.rank(layer.kind()));
        layers
    }

    /// Fold the accumulated layers into one mapping.
    #[must_use]
    pub fn compose(self) -> MergedMapping {
        compose(self.layers())
    }
}

impl IntoIterator for MergeComposer {
    type Item = MergeLayer<'static>;
    type IntoIter = std::vec::IntoIter<MergeLayer<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers().into_iter()
    }
}
