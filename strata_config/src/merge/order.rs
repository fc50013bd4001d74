//! Precedence ordering between source kinds.

use std::fmt;

use super::SourceKind;
use crate::{StrataError, StrataResult};

/// Total precedence order over every [`SourceKind`], highest first.
///
/// The default is `Init > Environment > DotEnv > SecretFile > StructuredFile`.
/// A custom order must name each kind exactly once, so no two sources ever
/// share a precedence.
///
/// # Examples
///
/// ```
/// use strata_config::{SourceKind, SourceOrder};
///
/// let order = SourceOrder::new([
///     SourceKind::Init,
///     SourceKind::Environment,
///     SourceKind::SecretFile,
///     SourceKind::DotEnv,
///     SourceKind::StructuredFile,
/// ])
/// .expect("permutation of every kind");
/// assert!(order.rank(SourceKind::SecretFile) < order.rank(SourceKind::DotEnv));
///
/// assert!(SourceOrder::new([SourceKind::Init, SourceKind::Init]).is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceOrder(Vec<SourceKind>);

impl SourceOrder {
    /// Validate and build an order.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidSourceOrder`] when `kinds` is not a
    /// permutation of [`SourceKind::ALL`].
    pub fn new(kinds: impl IntoIterator<Item = SourceKind>) -> StrataResult<Self> {
        let listed: Vec<SourceKind> = kinds.into_iter().collect();
        let mut sorted = listed.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != listed.len() || sorted.len() != SourceKind::ALL.len() {
            return Err(StrataError::InvalidSourceOrder {
                order: Self(listed).to_string(),
            });
        }
        Ok(Self(listed))
    }

    /// Build an order without validating it; [`SourceOrder::validate`] must
    /// accept it before use.
    #[must_use]
    pub const fn unchecked(kinds: Vec<SourceKind>) -> Self {
        Self(kinds)
    }

    /// Re-run the permutation check on this order.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidSourceOrder`] for an invalid order.
    pub fn validate(&self) -> StrataResult<()> {
        Self::new(self.0.iter().copied()).map(|_| ())
    }

    /// Position of `kind`; lower ranks win. Kinds missing from an unchecked
    /// order rank last.
    #[must_use]
    pub fn rank(&self, kind: SourceKind) -> usize {
        self.0
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(usize::MAX)
    }

    /// Iterate over the kinds, highest precedence first.
    pub fn iter(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SourceOrder {
    fn default() -> Self {
        Self(SourceKind::ALL.to_vec())
    }
}

impl fmt::Display for SourceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}
