//! Caller-supplied values.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use super::RawSource;
use crate::merge::{MergeLayer, RawMapping, SourceKind};
use crate::{StrataError, StrataResult, StrataResultExt};

/// Source wrapping values passed explicitly at construction time.
///
/// The values are already nested, so no key expansion takes place.
#[derive(Clone, Debug, Default)]
pub struct InitSource {
    values: Option<Value>,
}

impl InitSource {
    /// Wrap a JSON value; it must be an object when fetched.
    #[must_use]
    pub const fn new(values: Value) -> Self {
        Self {
            values: Some(values),
        }
    }

    /// A source contributing nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { values: None }
    }

    /// Serialise `values` into an init source.
    ///
    /// # Errors
    ///
    /// Returns an error when `values` cannot be represented as JSON.
    pub fn from_serialize<T: Serialize>(values: &T) -> StrataResult<Self> {
        serde_json::to_value(values).into_strata().map(Self::new)
    }
}

impl RawSource for InitSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Init
    }

    fn fetch(&self) -> StrataResult<MergeLayer<'static>> {
        let map = match &self.values {
            None | Some(Value::Null) => RawMapping::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(StrataError::malformed(
                    SourceKind::Init,
                    None,
                    None,
                    "init values must be an object",
                ));
            }
        };
        Ok(MergeLayer::new(SourceKind::Init, Cow::Owned(map)))
    }
}
