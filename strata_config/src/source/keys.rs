//! Key matching shared by the flat sources.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde_json::Value;
use tracing::warn;
use uncased::UncasedStr;

use crate::expand::expand;
use crate::merge::{RawMapping, SourceKind};
use crate::schema::Schema;
use crate::{SettingsConfig, StrataResult};

/// Prefix, delimiter and case rules applied to flat keys.
///
/// The prefix is stripped before the key is split on the delimiter, so a
/// delimiter embedded in the prefix never creates a nesting level.
///
/// When matching ignores case, each path segment takes the spelling of the
/// declared field it names, descending into nested settings structs. Segments
/// that name no declared field are lower-cased.
#[derive(Clone, Debug, Default)]
pub struct KeyRules {
    prefix: String,
    delimiter: Option<String>,
    case_sensitive: bool,
    schema: Option<Schema>,
}

/// One flat entry surviving prefix stripping, keyed by its matched path.
struct Candidate {
    raw: String,
    value: String,
    exact: bool,
}
impl KeyRules {
    /// Build rules from their parts; an empty delimiter disables nesting.
    #[must_use]
    pub fn new(prefix: impl Into<String>, delimiter: Option<&str>, case_sensitive: bool) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: delimiter.filter(|d| !d.is_empty()).map(str::to_owned),
            case_sensitive,
            schema: None,
        }
    }

    /// Match key segments against the fields declared by `schema`.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Rules declared by a settings type.
    #[must_use]
    pub fn from_config(config: &SettingsConfig) -> Self {
        Self::new(
            config.prefix(),
            config.nested_delimiter(),
            config.is_case_sensitive(),
        )
    }

    /// Strip the prefix from `raw` and normalise case.
    ///
    /// Returns `None` when `raw` lacks the prefix or nothing remains after
    /// stripping it.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::schema::{FieldKind, FieldSpec, Schema};
    /// use strata_config::source::KeyRules;
    ///
    /// let rules = KeyRules::new("APP_", Some("__"), false);
    /// assert_eq!(rules.strip("app_DATABASE__HOST").as_deref(), Some("database__host"));
    /// assert_eq!(rules.strip("OTHER_PORT"), None);
    ///
    /// let declared = rules.with_schema(Schema::new(
    ///     "Camel",
    ///     vec![FieldSpec::new("appName", FieldKind::Str)],
    /// ));
    /// assert_eq!(declared.strip("APP_APPNAME").as_deref(), Some("appName"));
    /// ```
    #[must_use]
    pub fn strip(&self, raw: &str) -> Option<String> {
        self.strip_prefix(raw).map(|rest| self.normalise(rest))
    }

    fn strip_prefix<'k>(&self, raw: &'k str) -> Option<&'k str> {
        let rest = if self.case_sensitive {
            raw.strip_prefix(self.prefix.as_str())?
        } else {
            if !UncasedStr::new(raw).starts_with(&self.prefix) {
                return None;
            }
            raw.get(self.prefix.len()..)?
        };
        (!rest.is_empty()).then_some(rest)
    }

    /// Give each segment of `rest` the spelling of the field it names.
    fn normalise(&self, rest: &str) -> String {
        if self.case_sensitive {
            return rest.to_owned();
        }
        let segments: Vec<&str> = match self.delimiter.as_deref() {
            Some(d) => rest.split(d).collect(),
            None => vec![rest],
        };
        let mut scope = self.schema.clone();
        let mut matched = Vec::with_capacity(segments.len());
        for segment in segments {
            let declared = scope
                .as_ref()
                .and_then(|schema| schema.field_ignoring_case(segment))
                .map(|field| (field.name(), field.kind().nested_schema()));
            match declared {
                Some((name, nested)) => {
                    matched.push(name.to_owned());
                    scope = nested;
                }
                None => {
                    matched.push(segment.to_lowercase());
                    scope = None;
                }
            }
        }
        matched.join(self.delimiter.as_deref().unwrap_or_default())
    }

    /// First path segment of a stripped key.
    #[must_use]
    pub fn head<'k>(&self, key: &'k str) -> &'k str {
        match self.delimiter.as_deref() {
            Some(d) => key.split(d).next().unwrap_or(key),
            None => key,
        }
    }

    /// Whether the head of `key` names one of `fields`.
    pub(crate) fn declares(&self, fields: &[String], key: &str) -> bool {
        let head = self.head(key);
        fields.iter().any(|field| {
            if self.case_sensitive {
                field == head
            } else {
                field.eq_ignore_ascii_case(head)
            }
        })
    }

    /// Strip every key and expand the survivors into a nested mapping.
    ///
    /// Keys that normalise to the same path keep one value: the entry spelled
    /// exactly like the path wins, otherwise the last entry in sorted order.
    pub(crate) fn collect<I>(&self, entries: I, kind: SourceKind) -> StrataResult<RawMapping>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut sorted: Vec<(String, String)> = entries.into_iter().collect();
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        let mut chosen: BTreeMap<String, Candidate> = BTreeMap::new();
        for (raw, value) in sorted {
            let Some(rest) = self.strip_prefix(&raw) else {
                continue;
            };
            let key = self.normalise(rest);
            let exact = rest == key;
            match chosen.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(Candidate { raw, value, exact });
                }
                Entry::Occupied(mut slot) => {
                    let replace = exact || !slot.get().exact;
                    let (kept, dropped) = if replace {
                        (raw.as_str(), slot.get().raw.as_str())
                    } else {
                        (slot.get().raw.as_str(), raw.as_str())
                    };
                    warn!(
                        source = %kind,
                        key = %slot.key(),
                        kept,
                        dropped,
                        "keys name the same setting; keeping one"
                    );
                    if replace {
                        slot.insert(Candidate { raw, value, exact });
                    }
                }
            }
        }
        let stripped = chosen
            .into_iter()
            .map(|(key, candidate)| (key, Value::String(candidate.value)));
        expand(stripped, self.delimiter.as_deref(), kind)
    }
}
