//! Primary error enum for settings resolution.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::ValidationErrors;
use crate::merge::SourceKind;

/// Errors that can occur while resolving settings.
///
/// Every variant is fatal: resolution stops at the first error and no
/// partially populated settings value is returned. A file-backed source whose
/// target does not exist is not an error; it contributes an empty layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// An existing configuration file or directory could not be read or
    /// decoded.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O or decoding error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A YAML file exists but could not be parsed.
    #[error("Failed to parse YAML in '{path}': {source}")]
    Yaml {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// Parser error, carried unchanged so its message and location
        /// survive.
        #[source]
        source: Box<serde_saphyr::Error>,
    },

    /// A source produced content that cannot be read as key/value pairs.
    #[error("Malformed {kind} source{origin}: {message}")]
    Malformed {
        /// Source that produced the content.
        kind: SourceKind,
        /// Location suffix such as ` in '.env' at line 3`; empty when the
        /// source has no location.
        origin: String,
        /// Explanation of the failure.
        message: String,
    },

    /// Two flat keys expand to conflicting shapes at the same path.
    #[error("Conflicting keys at '{path}' in {kind} source")]
    KeyCollision {
        /// Source whose keys collided.
        kind: SourceKind,
        /// Dotted path where the conflict was detected.
        path: String,
    },

    /// The merged mapping does not satisfy the schema.
    #[error("Settings validation failed:\n{0}")]
    Validation(#[from] ValidationErrors),

    /// A text encoding label is not supported.
    #[error("Unsupported text encoding '{label}'; expected 'utf-8' or 'latin-1'")]
    UnsupportedEncoding {
        /// Label as supplied by the caller.
        label: String,
    },

    /// The declared source order is not a permutation of every source kind.
    #[error("Invalid source order [{order}]: every source kind must appear exactly once")]
    InvalidSourceOrder {
        /// Comma-separated rendering of the rejected order.
        order: String,
    },
}
