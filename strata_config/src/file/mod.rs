//! Reading file-backed sources.
//!
//! [`load_yaml`] turns a YAML file into a [`RawMapping`](crate::merge::RawMapping),
//! treating an absent file as an empty mapping. [`read_text`] is the shared
//! primitive that reads and decodes a whole file before any parsing happens.

mod loader;
mod yaml;

pub use loader::{load_yaml, read_text};
