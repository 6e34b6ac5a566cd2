//! Vocabulary entries as stored in the index.

use super::token::TextUnit;
use std::fmt;

/// Insertion-order identifier of a stored term.
///
/// Ids are dense and assigned in the order terms were inserted, which makes
/// them a stable tie-breaker between equally ranked matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TermId(pub usize);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vocabulary entry in its original (pre-normalization) form.
///
/// Several terms may normalize to the same trie path; each keeps its own
/// original tokens so all of them are reported separately.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Term<T> {
    id: TermId,
    original: Vec<T>,
}

impl<T> Term<T> {
    pub(crate) fn new(id: TermId, original: Vec<T>) -> Self {
        Self { id, original }
    }

    /// Insertion-order id of this term.
    #[inline]
    pub fn id(&self) -> TermId {
        self.id
    }

    /// Tokens as originally inserted.
    #[inline]
    pub fn tokens(&self) -> &[T] {
        &self.original
    }

    /// Number of tokens in the original form.
    #[inline]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// Check if the original form is empty (never true for stored terms).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

impl<T: TextUnit> Term<T> {
    /// Render the original form as a string.
    pub fn text(&self) -> String {
        <T as TextUnit>::to_string(&self.original)
    }
}

impl<T: TextUnit> fmt::Display for Term<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
