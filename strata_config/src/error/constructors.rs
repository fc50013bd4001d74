//! Constructors and inspection helpers for `StrataError`.

use std::error::Error;

use camino::Utf8Path;

use super::{StrataError, ValidationErrors};
use crate::merge::SourceKind;

impl StrataError {
    /// Construct a validation failure for a single key.
    ///
    /// Post-resolve hooks use this to reject values that deserialised but
    /// break an application rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::StrataError;
    ///
    /// let err = StrataError::validation("port", "Port must be between 1 and 65535");
    /// assert!(err.to_string().contains("port: Port must be between"));
    /// ```
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(key, message))
    }

    /// Construct a malformed-source error.
    ///
    /// `path` and `line` locate the offending content when known.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use strata_config::{SourceKind, StrataError};
    ///
    /// let err = StrataError::malformed(
    ///     SourceKind::DotEnv,
    ///     Some(Utf8Path::new(".env")),
    ///     Some(3),
    ///     "expected KEY=VALUE",
    /// );
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Malformed dotenv source in '.env' at line 3: expected KEY=VALUE"
    /// );
    /// ```
    #[must_use]
    pub fn malformed(
        kind: SourceKind,
        path: Option<&Utf8Path>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        let origin = match (path, line) {
            (Some(p), Some(l)) => format!(" in '{p}' at line {l}"),
            (Some(p), None) => format!(" in '{p}'"),
            (None, Some(l)) => format!(" at line {l}"),
            (None, None) => String::new(),
        };
        Self::Malformed {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Construct a file error for `path`.
    pub(crate) fn file(path: &Utf8Path, err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source: err.into(),
        }
    }

    /// Construct a file error describing undecodable or unexpected content.
    pub(crate) fn invalid_data(path: &Utf8Path, msg: impl Into<String>) -> Self {
        Self::file(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into()),
        )
    }

    /// Returns the per-field failures when this is a validation error.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the error reports unparsable source content.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Yaml { .. } | Self::Malformed { .. })
    }
}
