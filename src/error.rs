//! Error types for index construction, cost configuration and search.

use crate::cost::EditKind;
use thiserror::Error;

/// Errors raised by the matching engine.
///
/// Every error is reported synchronously by the call that caused it. A failed
/// call leaves the index and cost model untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A cost was negative or NaN.
    ///
    /// Negative costs would let a subtree become cheaper further down, which
    /// breaks the pruning bound used during search.
    #[error("Invalid {kind} cost {cost}: costs must be non-negative numbers")]
    InvalidCost {
        /// Operation the cost was registered for
        kind: EditKind,
        /// The rejected value
        cost: f64,
    },

    /// The term is empty, either as given or after normalization.
    #[error("Term is empty")]
    EmptyTerm,

    /// The search threshold was negative, NaN or infinite.
    #[error("Invalid threshold {0}: must be finite and non-negative")]
    InvalidThreshold(f64),

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The search visited more trie nodes than its step budget allows.
    #[error("Search aborted after exceeding its budget of {budget} visited nodes")]
    BudgetExhausted {
        /// The configured budget
        budget: usize,
    },
}

/// A specialized `Result` type for matching operations.
pub type Result<T> = std::result::Result<T, Error>;
