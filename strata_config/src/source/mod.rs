//! Raw sources that each contribute one [`MergeLayer`].
//!
//! A source never fails because it has nothing to offer: an unset prefix, an
//! absent `.env` file or a missing YAML file all produce an empty layer. Only
//! malformed content or an unreadable existing file is an error.

mod dotenv;
mod env;
mod init;
mod keys;
mod secrets;
mod yaml;

pub use dotenv::{DotEnvSource, parse_dotenv};
pub use env::EnvSource;
pub use init::InitSource;
pub use keys::KeyRules;
pub use secrets::SecretsSource;
pub use yaml::YamlSource;

use crate::StrataResult;
use crate::merge::{MergeLayer, SourceKind};

/// A provider of one precedence layer.
pub trait RawSource {
    /// Kind recorded as the provenance of every key this source supplies.
    fn kind(&self) -> SourceKind;

    /// Produce this source's layer.
    ///
    /// Called once per resolution; each call reads its input afresh.
    ///
    /// # Errors
    ///
    /// Returns an error when existing input is malformed or unreadable, or
    /// when flat keys collide during expansion.
    fn fetch(&self) -> StrataResult<MergeLayer<'static>>;
}

#[cfg(test)]
mod tests;
