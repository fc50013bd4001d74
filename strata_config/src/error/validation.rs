//! Structured per-field validation failures.

use std::{error::Error, fmt};

/// Reason a single field failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldErrorKind {
    /// No source supplied the field and it has no default.
    Missing,
    /// The raw value cannot be coerced into the declared type.
    TypeMismatch {
        /// Description of the declared type.
        expected: &'static str,
        /// Description of the value that was found.
        found: &'static str,
    },
    /// An integer lies outside the bounds of the declared type.
    OutOfRange {
        /// Smallest accepted value.
        min: i128,
        /// Largest accepted value.
        max: i128,
    },
    /// The key is not declared and the schema forbids extra keys.
    Extra,
    /// Failure reported by deserialisation or a post-resolve hook.
    Custom(String),
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("field required"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::OutOfRange { min, max } => {
                write!(f, "value must be between {min} and {max}")
            }
            Self::Extra => f.write_str("extra keys are not permitted"),
            Self::Custom(message) => f.write_str(message),
        }
    }
}

/// Validation failure attributed to one field path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    path: String,
    kind: FieldErrorKind,
}

impl FieldError {
    /// Create an error for the dotted field `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Dotted path of the offending field; empty for the settings root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reason the field failed.
    #[must_use]
    pub const fn kind(&self) -> &FieldErrorKind {
        &self.kind
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// Collection of [`FieldError`]s gathered while constructing one settings
/// value.
///
/// # Examples
///
/// ```
/// use strata_config::{FieldErrorKind, ValidationErrors};
///
/// let mut errors = ValidationErrors::default();
/// errors.push("port", FieldErrorKind::Missing);
/// errors.push("database.host", FieldErrorKind::Extra);
/// assert_eq!(errors.len(), 2);
/// assert!(errors.to_string().starts_with("1: port: field required"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Create a collection holding a single custom failure.
    #[must_use]
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(
            path,
            FieldErrorKind::Custom(message.into()),
        )])
    }

    /// Record a failure for `path`.
    pub fn push(&mut self, path: impl Into<String>, kind: FieldErrorKind) {
        self.0.push(FieldError::new(path, kind));
    }

    /// Append every failure from `other`.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Iterate over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Number of recorded failures.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no failure was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the first failure recorded for `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&FieldError> {
        self.0.iter().find(|err| err.path == path)
    }

    /// Return `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collection itself when it holds at least one failure.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
