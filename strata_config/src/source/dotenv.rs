//! `.env` file source.

use std::borrow::Cow;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use super::{KeyRules, RawSource};
use crate::file::read_text;
use crate::merge::{MergeLayer, SourceKind};
use crate::{FileEncoding, StrataError, StrataResult};

/// Source reading `KEY=VALUE` lines from a `.env` file.
///
/// Values are captured literally: quotes, escapes and `$VAR` references are
/// kept as written. Every key carrying the prefix is contributed, declared or
/// not, so unknown keys meet the schema's extra-keys policy.
#[derive(Clone, Debug)]
pub struct DotEnvSource {
    path: Utf8PathBuf,
    encoding: FileEncoding,
    rules: KeyRules,
}

impl DotEnvSource {
    /// Read `path` with `encoding`, matching keys with `rules`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, encoding: FileEncoding, rules: KeyRules) -> Self {
        Self {
            path: path.into(),
            encoding,
            rules,
        }
    }
}

impl RawSource for DotEnvSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DotEnv
    }

    fn fetch(&self) -> StrataResult<MergeLayer<'static>> {
        let Some(contents) = read_text(&self.path, self.encoding)? else {
            return Ok(MergeLayer::empty(SourceKind::DotEnv));
        };
        let pairs = parse_dotenv(&contents, &self.path)?;
        let map = self.rules.collect(pairs, SourceKind::DotEnv)?;
        debug!(path = %self.path, keys = map.len(), "collected dotenv layer");
        Ok(MergeLayer::new(SourceKind::DotEnv, Cow::Owned(map)).with_path(self.path.clone()))
    }
}

/// Parse `.env` contents into key/value pairs in file order.
///
/// Blank lines and lines starting with `#` are skipped. Keys and values are
/// trimmed of surrounding whitespace; nothing else is interpreted.
///
/// # Errors
///
/// Returns [`StrataError::Malformed`] naming the 1-based line number when a
/// line lacks `=` or has an empty key.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use strata_config::source::parse_dotenv;
///
/// let pairs = parse_dotenv("# comment\nAPP_NAME = Demo\nTOKEN=\"a=b\"\n", Utf8Path::new(".env"))
///     .expect("well-formed");
/// assert_eq!(
///     pairs,
///     vec![
///         ("APP_NAME".to_owned(), "Demo".to_owned()),
///         ("TOKEN".to_owned(), "\"a=b\"".to_owned()),
///     ]
/// );
///
/// let err = parse_dotenv("GOOD=1\nbroken\n", Utf8Path::new(".env")).expect_err("no '='");
/// assert!(err.to_string().contains("at line 2"));
/// ```
pub fn parse_dotenv(contents: &str, path: &Utf8Path) -> StrataResult<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed =
            |message: &str| StrataError::malformed(SourceKind::DotEnv, Some(path), Some(index + 1), message);
        let Some((raw_key, value)) = line.split_once('=') else {
            return Err(malformed("expected KEY=VALUE"));
        };
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(malformed("empty key"));
        }
        pairs.push((key.to_owned(), value.trim().to_owned()));
    }
    Ok(pairs)
}
