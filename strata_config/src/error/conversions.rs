//! Trait-based conversions between external error types and `StrataError`.

use super::{StrataError, ValidationErrors};

/// Deserialisation failures surface as a validation error at the settings
/// root because `serde_json` does not report the failing field path.
impl From<serde_json::Error> for StrataError {
    fn from(e: serde_json::Error) -> Self {
        Self::Validation(ValidationErrors::single("", e.to_string()))
    }
}
