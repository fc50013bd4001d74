//! Loading entrypoints for file-backed sources.

use std::io::ErrorKind;

use camino::Utf8Path;
use serde_json::Value;
use tracing::debug;

use super::yaml::{is_blank_document, parse_value};
use crate::merge::{RawMapping, SourceKind};
use crate::{FileEncoding, IoResultExt, StrataError, StrataResult};

/// Read and decode the whole of `path`.
///
/// The handle is dropped before this returns. Returns `Ok(None)` when the
/// file does not exist.
///
/// # Errors
///
/// Returns [`StrataError::File`] when the file exists but cannot be read, or
/// when its bytes are invalid in `encoding`.
pub fn read_text(path: &Utf8Path, encoding: FileEncoding) -> StrataResult<Option<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path, "file absent; contributing nothing");
            return Ok(None);
        }
        Err(err) => return Err(err).with_path(path),
    };
    encoding.decode(bytes, path).map(Some)
}

/// Load a YAML file into a mapping.
///
/// A missing file, an empty file, a file holding only comments and a
/// document whose root is `null` all yield an empty mapping.
///
/// # Examples
///
/// ```rust,no_run
/// use camino::Utf8Path;
/// use strata_config::FileEncoding;
/// use strata_config::file::load_yaml;
///
/// # fn run() -> strata_config::StrataResult<()> {
/// let mapping = load_yaml(Utf8Path::new("config.yaml"), FileEncoding::Utf8)?;
/// if let Some(port) = mapping.get("port") {
///     println!("port = {port}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`StrataError::File`] when the file exists but cannot be read or decoded.
/// - [`StrataError::Yaml`] when the contents are not valid YAML.
/// - [`StrataError::Malformed`] when the document root is a scalar or a
///   sequence.
pub fn load_yaml(path: &Utf8Path, encoding: FileEncoding) -> StrataResult<RawMapping> {
    let Some(contents) = read_text(path, encoding)? else {
        return Ok(RawMapping::new());
    };
    if is_blank_document(&contents) {
        return Ok(RawMapping::new());
    }
    let value = parse_value(&contents).map_err(|err| StrataError::Yaml {
        path: path.to_path_buf(),
        source: Box::new(err),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RawMapping::new()),
        _ => Err(StrataError::malformed(
            SourceKind::StructuredFile,
            Some(path),
            None,
            "top-level document must be a mapping",
        )),
    }
}
