//! Schema tables.

use serde::Serialize;
use serde_json::Value;

/// Handling of keys that no declared field claims.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ExtraPolicy {
    /// Each undeclared key is a validation failure.
    #[default]
    Forbid,
    /// Undeclared keys are dropped.
    Ignore,
    /// Undeclared keys are kept, collected into the extra field when the
    /// schema names one.
    Allow,
}

/// Shape a field's raw value must coerce into.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum FieldKind {
    /// A string.
    Str,
    /// An integer within inclusive bounds.
    Int {
        /// Smallest accepted value.
        min: i128,
        /// Largest accepted value.
        max: i128,
    },
    /// A finite floating-point number.
    Float,
    /// A boolean.
    Bool,
    /// `null` or the inner kind.
    Optional(Box<FieldKind>),
    /// A nested settings struct.
    Nested(fn() -> Schema),
    /// A list whose elements share one kind.
    Sequence(Box<FieldKind>),
    /// A string-keyed map whose values share one kind.
    Mapping(Box<FieldKind>),
    /// Any value; passed to deserialisation untouched.
    Any,
}

impl FieldKind {
    /// Integer kind bounded by the range of `T`.
    ///
    /// ```
    /// use strata_config::schema::FieldKind;
    ///
    /// assert!(matches!(FieldKind::int::<u8>(), FieldKind::Int { min: 0, max: 255 }));
    /// ```
    #[must_use]
    pub fn int<T: IntBounds>() -> Self {
        let (min, max) = T::bounds();
        Self::Int { min, max }
    }

    /// Schema of the settings struct this kind holds, looking through
    /// `Optional`.
    #[must_use]
    pub fn nested_schema(&self) -> Option<Schema> {
        match self {
            Self::Nested(schema) => Some(schema()),
            Self::Optional(inner) => inner.nested_schema(),
            _ => None,
        }
    }

    /// Whether `null` is an acceptable value.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Human-readable name used in type-mismatch messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int { .. } => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
            Self::Optional(_) => "optional value",
            Self::Nested(_) | Self::Mapping(_) => "object",
            Self::Sequence(_) => "array",
            Self::Any => "any value",
        }
    }
}

/// Primitive integers whose range is expressed in `i128`.
pub trait IntBounds {
    /// Inclusive `(min, max)`, saturating at the bounds of `i128`.
    fn bounds() -> (i128, i128);
}

macro_rules! lossless_bounds {
    ($($ty:ty),*) => {$(
        impl IntBounds for $ty {
            fn bounds() -> (i128, i128) {
                (i128::from(<$ty>::MIN), i128::from(<$ty>::MAX))
            }
        }
    )*};
}

macro_rules! saturating_bounds {
    ($($ty:ty),*) => {$(
        impl IntBounds for $ty {
            fn bounds() -> (i128, i128) {
                (
                    i128::try_from(<$ty>::MIN).unwrap_or(i128::MIN),
                    i128::try_from(<$ty>::MAX).unwrap_or(i128::MAX),
                )
            }
        }
    )*};
}

lossless_bounds!(i8, i16, i32, i64, i128, u8, u16, u32, u64);
saturating_bounds!(isize, usize, u128);

/// One declared field.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    default: Option<fn() -> Value>,
    serde_default: bool,
}

impl FieldSpec {
    /// Declare a required field serialised under `name`.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            serde_default: false,
        }
    }

    /// Attach a default producer.
    #[must_use]
    pub const fn with_default(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the field as defaulted by `#[serde(default)]`.
    #[must_use]
    pub const fn with_serde_default(mut self) -> Self {
        self.serde_default = true;
        self
    }

    /// Serialised key of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Coercion kind of the field.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Produce the declared default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.default.map(|produce| produce())
    }

    /// Whether deserialisation supplies a value when the key is absent.
    #[must_use]
    pub const fn has_serde_default(&self) -> bool {
        self.serde_default
    }
}

/// Field table of one settings struct.
///
/// A schema without a declared extra-keys policy forbids unknown keys when
/// it describes the resolved type and ignores them when it describes a
/// nested field.
///
/// # Examples
///
/// ```
/// use strata_config::schema::{ExtraPolicy, FieldKind, FieldSpec, Schema, default_value};
///
/// let schema = Schema::new(
///     "AppSettings",
///     vec![
///         FieldSpec::new("app_name", FieldKind::Str),
///         FieldSpec::new("port", FieldKind::int::<u16>()).with_default(|| default_value(8000_u16)),
///     ],
/// )
/// .with_extra(ExtraPolicy::Ignore);
/// assert_eq!(schema.field_names().collect::<Vec<_>>(), ["app_name", "port"]);
/// assert!(schema.field("port").is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldSpec>,
    extra: Option<ExtraPolicy>,
    extra_field: Option<&'static str>,
}

impl Schema {
    /// Describe `type_name` with `fields` and no declared extra-keys policy.
    #[must_use]
    pub const fn new(type_name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            type_name,
            fields,
            extra: None,
            extra_field: None,
        }
    }

    /// Set the extra-keys policy.
    #[must_use]
    pub const fn with_extra(mut self, policy: ExtraPolicy) -> Self {
        self.extra = Some(policy);
        self
    }

    /// Name the field that collects extra keys; implies
    /// [`ExtraPolicy::Allow`].
    #[must_use]
    pub const fn with_extra_field(mut self, name: &'static str) -> Self {
        self.extra = Some(ExtraPolicy::Allow);
        self.extra_field = Some(name);
        self
    }

    /// Rust name of the described type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by serialised name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by serialised name, falling back to an ASCII
    /// case-insensitive match when no field is spelled exactly `name`.
    #[must_use]
    pub fn field_ignoring_case(&self, name: &str) -> Option<&FieldSpec> {
        self.field(name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    /// Serialised names of the declared fields.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Extra-keys policy applied when this schema describes the resolved
    /// type; [`ExtraPolicy::Forbid`] unless declared.
    #[must_use]
    pub const fn extra(&self) -> ExtraPolicy {
        match self.extra {
            Some(policy) => policy,
            None => ExtraPolicy::Forbid,
        }
    }

    /// Extra-keys policy applied when this schema describes a nested field;
    /// [`ExtraPolicy::Ignore`] unless declared.
    #[must_use]
    pub const fn nested_extra(&self) -> ExtraPolicy {
        match self.extra {
            Some(policy) => policy,
            None => ExtraPolicy::Ignore,
        }
    }

    /// Field collecting extra keys, if any.
    #[must_use]
    pub const fn extra_field(&self) -> Option<&'static str> {
        self.extra_field
    }
}

/// Serialise a default into a JSON value, yielding `null` when it cannot be
/// represented.
#[must_use]
pub fn default_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
