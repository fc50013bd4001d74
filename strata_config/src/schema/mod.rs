//! Static description of a settings type and construction against it.
//!
//! `#[derive(Settings)]` emits a [`Schema`] for each settings struct: its
//! fields in declaration order, how raw values coerce into each field, the
//! declared defaults and the policy for keys no field claims.
//! [`construct`] validates a merged mapping against that table and
//! deserialises the typed value.

mod coerce;
mod construct;
mod types;

pub use construct::construct;
pub use types::{ExtraPolicy, FieldKind, FieldSpec, IntBounds, Schema, default_value};

#[cfg(test)]
mod tests;
