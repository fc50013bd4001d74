//! Extensions for mapping errors to `StrataResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| StrataError::…)` patterns
//! when converting external error types into the crate's
//! [`StrataResult`] alias.
//!
//! - Use [`StrataResultExt::into_strata`] for error types that implement
//!   `Into<StrataError>` (e.g., `serde_json::Error`).
//! - Use [`IoResultExt::with_path`] for I/O failures that should be reported
//!   against the file or directory being read.
//!
//! # Examples
//!
//! ```
//! use strata_config::{StrataResult, StrataResultExt};
//!
//! fn port() -> StrataResult<u16> {
//!     serde_json::from_value(serde_json::json!(8080)).into_strata()
//! }
//! assert_eq!(port().ok(), Some(8080));
//! ```

use camino::Utf8Path;

use crate::{StrataError, StrataResult};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<StrataError>` into a `StrataResult<T>`.
pub trait StrataResultExt<T, E> {
    /// Convert `Result<T, E>` into `StrataResult<T>` using `Into<StrataError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion.
    fn into_strata(self) -> StrataResult<T>;
}

impl<T, E> StrataResultExt<T, E> for Result<T, E>
where
    E: Into<StrataError>,
{
    fn into_strata(self) -> StrataResult<T> {
        self.map_err(Into::into)
    }
}

/// Extension attaching a path to I/O failures.
pub trait IoResultExt<T> {
    /// Convert an I/O failure into [`StrataError::File`] for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::File`] when the input is `Err`.
    fn with_path(self, path: &Utf8Path) -> StrataResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Utf8Path) -> StrataResult<T> {
        self.map_err(|e| StrataError::file(path, e))
    }
}
