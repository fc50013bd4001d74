//! Per-type declaration of where settings come from.
//!
//! A [`SettingsConfig`] is produced once per settings type, normally by
//! `#[derive(Settings)]` from its `#[settings(...)]` attributes. It names the
//! environment prefix, the optional `.env` file, secrets directory and YAML
//! file, and the precedence order between sources.

use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{SourceOrder, StrataError, StrataResult};

/// Delimiter splitting flat keys into nested paths unless overridden.
pub const DEFAULT_NESTED_DELIMITER: &str = "__";

/// Text encoding of a file-backed source.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum FileEncoding {
    /// UTF-8; a leading byte order mark is ignored.
    #[default]
    Utf8,
    /// ISO-8859-1, where every byte maps to the code point of equal value.
    Latin1,
}

impl FileEncoding {
    /// Parse an encoding label such as `utf-8` or `latin-1`.
    ///
    /// Labels are compared case-insensitively. Accepted aliases are `utf8`,
    /// `latin1` and `iso-8859-1`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnsupportedEncoding`] for any other label.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::FileEncoding;
    ///
    /// assert_eq!(FileEncoding::from_label("UTF-8").ok(), Some(FileEncoding::Utf8));
    /// assert_eq!(FileEncoding::from_label("iso-8859-1").ok(), Some(FileEncoding::Latin1));
    /// assert!(FileEncoding::from_label("utf-16").is_err());
    /// ```
    pub fn from_label(label: &str) -> StrataResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            _ => Err(StrataError::UnsupportedEncoding {
                label: label.to_owned(),
            }),
        }
    }

    /// Canonical label for this encoding.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::File`] with an `InvalidData` cause when the
    /// bytes are not valid UTF-8. Latin-1 decoding cannot fail.
    pub fn decode(self, bytes: Vec<u8>, path: &Utf8Path) -> StrataResult<String> {
        match self {
            Self::Utf8 => {
                let mut text = String::from_utf8(bytes).map_err(|e| {
                    StrataError::invalid_data(path, format!("file is not valid utf-8: {e}"))
                })?;
                if text.starts_with('\u{feff}') {
                    text.replace_range(..'\u{feff}'.len_utf8(), "");
                }
                Ok(text)
            }
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl FromStr for FileEncoding {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl fmt::Display for FileEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source declaration for one settings type.
///
/// # Examples
///
/// ```
/// use strata_config::{FileEncoding, SettingsConfig};
///
/// let config = SettingsConfig::new()
///     .env_prefix("APP_")
///     .env_file(".env")
///     .yaml_file("config.yaml")
///     .yaml_file_encoding(FileEncoding::Latin1);
/// assert_eq!(config.prefix(), "APP_");
/// assert_eq!(config.nested_delimiter(), Some("__"));
/// assert!(config.secrets_dir_path().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsConfig {
    env_prefix: String,
    env_nested_delimiter: Option<String>,
    case_sensitive: bool,
    env_file: Option<Utf8PathBuf>,
    env_file_encoding: FileEncoding,
    secrets_dir: Option<Utf8PathBuf>,
    yaml_file: Option<Utf8PathBuf>,
    yaml_file_encoding: FileEncoding,
    source_order: SourceOrder,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            env_prefix: String::new(),
            env_nested_delimiter: Some(DEFAULT_NESTED_DELIMITER.to_owned()),
            case_sensitive: false,
            env_file: None,
            env_file_encoding: FileEncoding::Utf8,
            secrets_dir: None,
            yaml_file: None,
            yaml_file_encoding: FileEncoding::Utf8,
            source_order: SourceOrder::default(),
        }
    }
}

impl SettingsConfig {
    /// Declaration with every default: no prefix, `__` delimiter,
    /// case-insensitive matching and no file-backed sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix that environment and `.env` keys must carry.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Delimiter splitting flat keys into nested paths. An empty delimiter
    /// disables expansion.
    #[must_use]
    pub fn env_nested_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let value = delimiter.into();
        self.env_nested_delimiter = (!value.is_empty()).then_some(value);
        self
    }

    /// Whether key matching respects case.
    #[must_use]
    pub const fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// `.env` file to read.
    #[must_use]
    pub fn env_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Encoding of the `.env` file.
    #[must_use]
    pub const fn env_file_encoding(mut self, encoding: FileEncoding) -> Self {
        self.env_file_encoding = encoding;
        self
    }

    /// Directory holding one file per secret.
    #[must_use]
    pub fn secrets_dir(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.secrets_dir = Some(path.into());
        self
    }

    /// YAML file to read.
    #[must_use]
    pub fn yaml_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.yaml_file = Some(path.into());
        self
    }

    /// Encoding of the YAML file.
    #[must_use]
    pub const fn yaml_file_encoding(mut self, encoding: FileEncoding) -> Self {
        self.yaml_file_encoding = encoding;
        self
    }

    /// Precedence order between sources.
    #[must_use]
    pub fn source_order(mut self, order: SourceOrder) -> Self {
        self.source_order = order;
        self
    }

    /// Declared environment prefix; empty when none.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Nested-key delimiter, or `None` when expansion is disabled.
    #[must_use]
    pub fn nested_delimiter(&self) -> Option<&str> {
        self.env_nested_delimiter.as_deref()
    }

    /// Whether key matching respects case.
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Declared `.env` file and its encoding.
    #[must_use]
    pub fn env_file_path(&self) -> Option<(&Utf8Path, FileEncoding)> {
        self.env_file
            .as_deref()
            .map(|p| (p, self.env_file_encoding))
    }

    /// Declared secrets directory.
    #[must_use]
    pub fn secrets_dir_path(&self) -> Option<&Utf8Path> {
        self.secrets_dir.as_deref()
    }

    /// Declared YAML file and its encoding.
    #[must_use]
    pub fn yaml_file_path(&self) -> Option<(&Utf8Path, FileEncoding)> {
        self.yaml_file
            .as_deref()
            .map(|p| (p, self.yaml_file_encoding))
    }

    /// Declared precedence order.
    #[must_use]
    pub const fn order(&self) -> &SourceOrder {
        &self.source_order
    }
}
