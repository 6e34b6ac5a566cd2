//! # fuzzytrie
//!
//! Weighted approximate sequence matching over a shared-prefix index.
//!
//! A vocabulary of terms is stored in a [`Trie`](dictionary::Trie). A query is
//! matched against it by extending one row of a weighted edit-distance matrix
//! per trie edge and abandoning every subtree whose cheapest cell already
//! exceeds the threshold. Each result carries its cost and the full alignment
//! (edit path) that produced it.
//!
//! - Tokens are generic: `char`, `u8`, or any `Clone + Eq + Hash` type
//!   (phonemes, word pieces, ...)
//! - Costs are asymmetric and overridable per token
//!   ([`CostModel`](cost::CostModel))
//! - A caller-supplied [`Normalizer`](dictionary::Normalizer) is applied to
//!   terms and queries alike
//! - Results are totally ordered: cost, then term insertion order, then
//!   alignment shape
//!
//! ## Example
//!
//! ```rust
//! use fuzzytrie::prelude::*;
//!
//! let mut costs = CostModel::new();
//! costs
//!     .set_insert_cost(' ', 0.1)?
//!     .set_delete_cost(' ', 0.1)?
//!     .set_substitute_cost('-', ' ', 0.1)?
//!     .set_substitute_cost(' ', '-', 0.1)?;
//!
//! let matcher = MatcherBuilder::<char>::new()
//!     .normalizer(|tokens: &[char]| -> Vec<char> {
//!         tokens.iter().flat_map(|c| c.to_lowercase()).collect()
//!     })
//!     .cost_model(costs)
//!     .terms_str(["hello", "bye", "goodbye", "point of sale", "pointing"])
//!     .build()?;
//!
//! let results = matcher.search_str("Poi ntof-sales", 2.5, 4)?;
//! assert_eq!(results[0].text(), "point of sale");
//! assert!((results[0].cost() - 1.3).abs() < 1e-9);
//!
//! for result in &results {
//!     println!("{:.1}  {}", result.cost(), result.path());
//! }
//! # Ok::<(), fuzzytrie::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cost;
pub mod dictionary;
pub mod distance;
pub mod error;
pub mod matcher;
pub mod sync;

pub use error::{Error, Result};

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::cost::{CostModel, EditKind, EditOp};
    pub use crate::dictionary::{Dictionary, Identity, Normalizer, Term, TermId, TextUnit, Token, Trie};
    pub use crate::distance::{alignments, weighted_distance};
    pub use crate::error::Error;
    pub use crate::matcher::{
        EditPath, Match, Matcher, MatcherBuilder, PathEntry, QueryBuilder, SearchConfig,
        ThresholdPolicy,
    };
    pub use crate::sync::SharedMatcher;
}
