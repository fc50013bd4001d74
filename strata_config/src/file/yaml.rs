//! YAML parsing backed by `serde-saphyr`.

use serde_json::Value;
use serde_saphyr::Options;

/// Whether `contents` holds no YAML nodes: only blank lines, comments and
/// document markers.
pub(super) fn is_blank_document(contents: &str) -> bool {
    contents.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Parse YAML contents using YAML 1.2 strict boolean semantics, so `yes` and
/// `on` stay strings.
pub(super) fn parse_value(contents: &str) -> Result<Value, serde_saphyr::Error> {
    serde_saphyr::from_str_with_options(
        contents,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
}
