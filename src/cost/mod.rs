//! Asymmetric, overridable edit costs.
//!
//! A [`CostModel`] assigns a non-negative weight to each edit operation:
//!
//! ```text
//! Insert(t):         t appears in the vocabulary term but not in the query
//! Delete(q):         q appears in the query but not in the vocabulary term
//! Substitute(q, t):  query token q is replaced by term token t
//! ```
//!
//! Every kind has a default (1.0 unless configured otherwise). Overrides are
//! registered per exact operand and always win over the default. Costs are not
//! symmetric: `Insert(x)` and `Delete(x)` are independent, as are
//! `Substitute(a, b)` and `Substitute(b, a)`.
//!
//! ## Example: cheap whitespace and hyphen edits
//!
//! ```rust
//! use fuzzytrie::cost::CostModel;
//!
//! let mut costs = CostModel::new();
//! costs
//!     .set_insert_cost(' ', 0.1)?
//!     .set_delete_cost(' ', 0.1)?
//!     .set_substitute_cost('-', ' ', 0.1)?
//!     .set_substitute_cost(' ', '-', 0.1)?;
//!
//! assert_eq!(costs.substitute_cost(&'-', &' '), 0.1);
//! assert_eq!(costs.substitute_cost(&'-', &'_'), 1.0);
//! # Ok::<(), fuzzytrie::Error>(())
//! ```
//!
//! ## Non-negativity
//!
//! Negative costs are rejected when registered. The matcher prunes a trie
//! subtree as soon as the cheapest cell of its DP row exceeds the threshold,
//! which is only sound if extending an alignment can never lower its cost.
//! `f64::INFINITY` is accepted and forbids the operation outright.

mod prepared;

pub(crate) use prepared::QueryCosts;

use crate::dictionary::Token;
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use std::fmt;

/// Default cost of every operation kind.
pub const DEFAULT_COST: f64 = 1.0;

/// Kind of an edit operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EditKind {
    /// A term token with no counterpart in the query
    Insert,
    /// A query token with no counterpart in the term
    Delete,
    /// A query token replaced by a different term token
    Substitute,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditKind::Insert => "insert",
            EditKind::Delete => "delete",
            EditKind::Substitute => "substitute",
        })
    }
}

/// An edit operation together with its operands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EditOp<T> {
    /// Insert term token
    Insert(T),
    /// Delete query token
    Delete(T),
    /// Replace query token `from` with term token `to`
    Substitute {
        /// Query token
        from: T,
        /// Term token
        to: T,
    },
}

impl<T> EditOp<T> {
    /// Kind of this operation.
    #[inline]
    pub fn kind(&self) -> EditKind {
        match self {
            EditOp::Insert(_) => EditKind::Insert,
            EditOp::Delete(_) => EditKind::Delete,
            EditOp::Substitute { .. } => EditKind::Substitute,
        }
    }
}

impl<T: fmt::Display> fmt::Display for EditOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Insert(token) => write!(f, "+{}", token),
            EditOp::Delete(token) => write!(f, "-{}", token),
            EditOp::Substitute { from, to } => write!(f, "{}>{}", from, to),
        }
    }
}

/// Cost table for insert, delete and substitute operations.
///
/// Built once before indexing and read-only afterwards; searches only take
/// shared references, so one model can serve concurrent searches.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CostModel<T: Token> {
    default_insert: f64,
    default_delete: f64,
    default_substitute: f64,
    insert: FxHashMap<T, f64>,
    delete: FxHashMap<T, f64>,
    /// Keyed by query token, then term token.
    substitute: FxHashMap<T, FxHashMap<T, f64>>,
}

impl<T: Token> CostModel<T> {
    /// Create a model where every operation costs [`DEFAULT_COST`].
    pub fn new() -> Self {
        Self {
            default_insert: DEFAULT_COST,
            default_delete: DEFAULT_COST,
            default_substitute: DEFAULT_COST,
            insert: FxHashMap::default(),
            delete: FxHashMap::default(),
            substitute: FxHashMap::default(),
        }
    }

    /// Create a model with custom per-kind defaults.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCost`] if any default is negative or NaN.
    pub fn with_defaults(insert: f64, delete: f64, substitute: f64) -> Result<Self> {
        Ok(Self {
            default_insert: validate(EditKind::Insert, insert)?,
            default_delete: validate(EditKind::Delete, delete)?,
            default_substitute: validate(EditKind::Substitute, substitute)?,
            ..Self::new()
        })
    }

    /// Set the cost of inserting `token`, replacing any earlier value.
    pub fn set_insert_cost(&mut self, token: T, cost: f64) -> Result<&mut Self> {
        self.insert.insert(token, validate(EditKind::Insert, cost)?);
        Ok(self)
    }

    /// Set the cost of deleting `token`, replacing any earlier value.
    pub fn set_delete_cost(&mut self, token: T, cost: f64) -> Result<&mut Self> {
        self.delete.insert(token, validate(EditKind::Delete, cost)?);
        Ok(self)
    }

    /// Set the cost of replacing query token `from` with term token `to`.
    ///
    /// Only this direction is affected. Overrides for `from == to` are stored
    /// but never consulted, because equal tokens always align for free.
    pub fn set_substitute_cost(&mut self, from: T, to: T, cost: f64) -> Result<&mut Self> {
        let cost = validate(EditKind::Substitute, cost)?;
        self.substitute.entry(from).or_default().insert(to, cost);
        Ok(self)
    }

    /// Cost of inserting `token`.
    #[inline]
    pub fn insert_cost(&self, token: &T) -> f64 {
        self.insert.get(token).copied().unwrap_or(self.default_insert)
    }

    /// Cost of deleting `token`.
    #[inline]
    pub fn delete_cost(&self, token: &T) -> f64 {
        self.delete.get(token).copied().unwrap_or(self.default_delete)
    }

    /// Cost of replacing `from` with `to`.
    #[inline]
    pub fn substitute_cost(&self, from: &T, to: &T) -> f64 {
        self.substitute
            .get(from)
            .and_then(|targets| targets.get(to))
            .copied()
            .unwrap_or(self.default_substitute)
    }

    /// Cost of an operation, dispatching on its kind.
    pub fn cost_of(&self, op: &EditOp<T>) -> f64 {
        match op {
            EditOp::Insert(token) => self.insert_cost(token),
            EditOp::Delete(token) => self.delete_cost(token),
            EditOp::Substitute { from, to } => self.substitute_cost(from, to),
        }
    }

    /// Default cost for `kind`.
    pub fn default_cost(&self, kind: EditKind) -> f64 {
        match kind {
            EditKind::Insert => self.default_insert,
            EditKind::Delete => self.default_delete,
            EditKind::Substitute => self.default_substitute,
        }
    }

    /// Number of registered overrides across all kinds.
    pub fn override_count(&self) -> usize {
        self.insert.len()
            + self.delete.len()
            + self.substitute.values().map(|targets| targets.len()).sum::<usize>()
    }

    /// Check if this model computes plain (unit-cost) Levenshtein distance.
    pub fn is_uniform(&self) -> bool {
        self.override_count() == 0
            && self.default_insert == DEFAULT_COST
            && self.default_delete == DEFAULT_COST
            && self.default_substitute == DEFAULT_COST
    }

    /// Resolve per-position lookups for one query.
    pub(crate) fn prepare<'a>(&'a self, query: &[T]) -> QueryCosts<'a, T> {
        QueryCosts::new(self, query)
    }
}

impl<T: Token> Default for CostModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(kind: EditKind, cost: f64) -> Result<f64> {
    if cost.is_nan() || cost < 0.0 {
        return Err(Error::InvalidCost { kind, cost });
    }
    Ok(cost)
}
