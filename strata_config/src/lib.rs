//! Layered, typed settings resolution.
//!
//! `strata_config` builds a typed settings value from up to five sources,
//! folded in a fixed precedence order (highest first):
//!
//! 1. values passed explicitly by the caller;
//! 2. the process environment;
//! 3. a `.env` file;
//! 4. a secrets directory holding one file per key;
//! 5. a YAML file.
//!
//! Nested fields merge key by key, so a YAML file can supply
//! `database.host` while the environment overrides `database.port`. Declared
//! defaults fill whatever no source supplied. The merged mapping is checked
//! against a schema table emitted by `#[derive(Settings)]`, which coerces the
//! string values flat sources produce and reports every failing field at
//! once.
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use strata_config::Settings;
//!
//! #[derive(Debug, Deserialize, Settings)]
//! #[settings(env_prefix = "APP_", env_file = ".env", yaml_file = "config.yaml")]
//! struct AppSettings {
//!     app_name: String,
//!     #[settings(default = 8000)]
//!     port: u16,
//!     #[settings(default = false)]
//!     debug: bool,
//! }
//!
//! # fn main() -> strata_config::StrataResult<()> {
//! let settings = AppSettings::resolve()?;
//! println!("{} listening on {}", settings.app_name, settings.port);
//! # Ok(())
//! # }
//! ```
//!
//! The library emits `tracing` events but installs no subscriber.

pub use strata_config_macros::Settings;

mod config;
mod error;
pub mod expand;
pub mod file;
pub mod merge;
mod post_resolve;
mod resolve;
mod result_ext;
pub mod schema;
pub mod source;

pub use config::{DEFAULT_NESTED_DELIMITER, FileEncoding, SettingsConfig};
pub use error::{FieldError, FieldErrorKind, StrataError, ValidationErrors};
pub use merge::{MergeLayer, MergedMapping, SourceKind, SourceOrder};
pub use post_resolve::{PostResolveHook, ResolveContext};
pub use resolve::Resolver;
pub use result_ext::{IoResultExt, StrataResultExt};

/// Result type used throughout the crate.
pub type StrataResult<T> = Result<T, StrataError>;

/// Trait implemented by typed settings structs, normally via
/// `#[derive(Settings)]`.
pub trait Settings: Sized + serde::de::DeserializeOwned {
    /// Field table used to validate merged sources.
    fn schema() -> schema::Schema;

    /// Sources this type reads and their precedence.
    #[must_use]
    fn settings_config() -> SettingsConfig {
        SettingsConfig::default()
    }

    /// Step run after construction; the derive forwards it to
    /// [`PostResolveHook::post_resolve`] when `post_resolve_hook` is set.
    ///
    /// # Errors
    ///
    /// Returns an error to abort resolution.
    fn after_resolve(&mut self, _ctx: &ResolveContext) -> StrataResult<()> {
        Ok(())
    }

    /// Resolve from the declared sources.
    ///
    /// # Errors
    ///
    /// Returns a [`StrataError`] when any source is malformed or unreadable,
    /// when flat keys collide, or when validation fails.
    fn resolve() -> StrataResult<Self> {
        Resolver::<Self>::new().resolve()
    }

    /// Resolve with explicit values taking precedence over every other
    /// source.
    ///
    /// # Errors
    ///
    /// As for [`Settings::resolve`]; a non-object `init` is also rejected.
    fn resolve_with(init: serde_json::Value) -> StrataResult<Self> {
        Resolver::<Self>::new().with_init(init).resolve()
    }
}

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
