//! Per-query cost lookups.
//!
//! The DP recurrence consults delete and substitute costs once per cell. For a
//! fixed query those lookups only depend on the query position, so they are
//! resolved once up front: delete costs become a flat array and the
//! substitution table is narrowed to the row for each query token.

use super::CostModel;
use crate::dictionary::Token;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub(crate) struct QueryCosts<'a, T: Token> {
    model: &'a CostModel<T>,
    /// `delete[j]` is the cost of deleting query token `j`
    delete: SmallVec<[f64; 32]>,
    /// Substitution overrides whose source is query token `j`
    substitute: SmallVec<[Option<&'a FxHashMap<T, f64>>; 32]>,
}

impl<'a, T: Token> QueryCosts<'a, T> {
    pub(crate) fn new(model: &'a CostModel<T>, query: &[T]) -> Self {
        Self {
            model,
            delete: query.iter().map(|token| model.delete_cost(token)).collect(),
            substitute: query.iter().map(|token| model.substitute.get(token)).collect(),
        }
    }

    /// Cost of inserting term token `token`.
    #[inline]
    pub(crate) fn insert(&self, token: &T) -> f64 {
        self.model.insert_cost(token)
    }

    /// Cost of deleting the query token at position `j` (0-based).
    #[inline]
    pub(crate) fn delete(&self, j: usize) -> f64 {
        self.delete[j]
    }

    /// Cost of replacing the query token at position `j` with `token`.
    #[inline]
    pub(crate) fn substitute(&self, j: usize, token: &T) -> f64 {
        self.substitute[j]
            .and_then(|targets| targets.get(token))
            .copied()
            .unwrap_or(self.model.default_substitute)
    }
}
