//! Search results.

use super::config::cost_key;
use super::path::EditPath;
use crate::dictionary::{Term, TextUnit};
use std::cmp::Ordering;
use std::fmt;

/// One search result: a vocabulary entry, its cost and the alignment that
/// produced it.
///
/// A match owns value copies of everything it reports and holds no reference
/// into the dictionary it came from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Match<T> {
    query: Vec<T>,
    term: Term<T>,
    cost: f64,
    path: EditPath<T>,
}

impl<T> Match<T> {
    pub(crate) fn new(query: Vec<T>, term: Term<T>, path: EditPath<T>) -> Self {
        Self {
            query,
            term,
            cost: path.total_cost(),
            path,
        }
    }

    /// The normalized query.
    #[inline]
    pub fn query(&self) -> &[T] {
        &self.query
    }

    /// The matched term in its original form.
    #[inline]
    pub fn term(&self) -> &Term<T> {
        &self.term
    }

    /// Total cost; always equal to `self.path().total_cost()`.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Alignment between the normalized query and the normalized term.
    #[inline]
    pub fn path(&self) -> &EditPath<T> {
        &self.path
    }

    /// Check if the query matched without any edit.
    pub fn is_exact(&self) -> bool {
        self.path.is_exact()
    }

    /// Result ordering: cost (within [`COST_EPSILON`](super::COST_EPSILON)),
    /// then term insertion order, then path step ranks at the leftmost
    /// divergence.
    pub(crate) fn rank(&self, other: &Self) -> Ordering {
        cost_key(self.cost)
            .cmp(&cost_key(other.cost))
            .then_with(|| self.term.id().cmp(&other.term.id()))
            .then_with(|| self.path.cmp_steps(&other.path))
    }
}

impl<T: TextUnit> Match<T> {
    /// Original term as text.
    pub fn text(&self) -> String {
        self.term.text()
    }

    /// Normalized query as text.
    pub fn query_text(&self) -> String {
        <T as TextUnit>::to_string(&self.query)
    }
}

impl<T: TextUnit + fmt::Display> fmt::Display for Match<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3}): {}", self.term, self.cost, self.path)
    }
}
