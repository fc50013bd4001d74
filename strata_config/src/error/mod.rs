//! Error types produced while resolving settings.

mod constructors;
mod conversions;
mod types;
mod validation;

pub use types::StrataError;
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};

#[cfg(test)]
mod tests;
