//! Precedence-ordered deep merging of source layers.
//!
//! Each source contributes one [`MergeLayer`]: a nested JSON object tagged
//! with the [`SourceKind`] that produced it. Layers are folded highest
//! precedence first, so a key already present in the accumulator is never
//! replaced by a lower layer, while keys the accumulator lacks are copied in.
//! Nested objects merge key by key, which keeps sibling keys contributed by
//! different sources side by side.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use strata_config::merge::{MergeLayer, SourceKind, compose};
//!
//! let env = json!({"database": {"port": "3306"}});
//! let file = json!({"database": {"host": "db.example.com", "port": 5432}});
//! let merged = compose([
//!     MergeLayer::from_value(SourceKind::Environment, env).expect("object"),
//!     MergeLayer::from_value(SourceKind::StructuredFile, file).expect("object"),
//! ]);
//! assert_eq!(
//!     serde_json::Value::Object(merged.into_value()),
//!     json!({"database": {"host": "db.example.com", "port": "3306"}})
//! );
//! ```

mod composer;
mod deep;
mod layer;
mod order;

pub use composer::{MergeComposer, MergedMapping, compose};
pub use deep::merge_lower;
pub(crate) use deep::join_path;
pub use layer::{MergeLayer, SourceKind};
pub use order::SourceOrder;

/// Nested key/value mapping produced by a source.
pub type RawMapping = serde_json::Map<String, serde_json::Value>;

#[cfg(test)]
mod tests;
