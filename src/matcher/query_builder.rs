//! Fluent builder API for configuring a single search
//!
//! Every option starts from the matcher's [`SearchConfig`] and can be
//! overridden for one call without touching the matcher.

use super::{Match, Matcher, SearchOptions};
use crate::dictionary::{Dictionary, Normalizer};
use crate::error::Result;

/// Fluent builder for one search
///
/// # Examples
///
/// ```rust
/// use fuzzytrie::prelude::*;
///
/// let matcher = MatcherBuilder::new()
///     .terms_str(["test", "testing", "tested"])
///     .build()?;
///
/// let query: Vec<char> = "tset".chars().collect();
/// let results = matcher
///     .query(&query)
///     .threshold(2.0)
///     .max_results(5)
///     .best_alignment_only()
///     .execute()?;
///
/// assert_eq!(results[0].text(), "test");
/// assert_eq!(results[0].cost(), 2.0);
/// # Ok::<(), fuzzytrie::Error>(())
/// ```
pub struct QueryBuilder<'a, D: Dictionary, N> {
    matcher: &'a Matcher<D, N>,
    query: &'a [D::Token],
    options: SearchOptions,
}

impl<'a, D, N> QueryBuilder<'a, D, N>
where
    D: Dictionary,
    N: Normalizer<D::Token>,
{
    pub(crate) fn new(
        matcher: &'a Matcher<D, N>,
        query: &'a [D::Token],
        options: SearchOptions,
    ) -> Self {
        Self {
            matcher,
            query,
            options,
        }
    }

    /// Set an explicit threshold, overriding the configured policy
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.options.threshold = Some(threshold);
        self
    }

    /// Cap the number of results (`0` = unbounded)
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.options.max_results = max_results;
        self
    }

    /// Keep at most `limit` alignments for each matched term
    pub fn alignments_per_term(mut self, limit: usize) -> Self {
        self.options.alignments_per_term = Some(limit);
        self
    }

    /// Keep only the cheapest alignment of each matched term
    ///
    /// Equivalent to `.alignments_per_term(1)`.
    pub fn best_alignment_only(self) -> Self {
        self.alignments_per_term(1)
    }

    /// Report every alignment within the threshold for each matched term
    ///
    /// The count can grow combinatorially with the threshold and term
    /// length; pair it with a small threshold or a result cap.
    pub fn all_alignments(mut self) -> Self {
        self.options.alignments_per_term = None;
        self
    }

    /// Abort with [`Error::BudgetExhausted`](crate::Error::BudgetExhausted)
    /// after visiting more than `budget` trie nodes
    pub fn step_budget(mut self, budget: usize) -> Self {
        self.options.step_budget = Some(budget);
        self
    }

    /// Run the search
    ///
    /// # Errors
    ///
    /// Same as [`Matcher::search`], plus
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) for
    /// `alignments_per_term(0)`.
    pub fn execute(self) -> Result<Vec<Match<D::Token>>> {
        self.matcher.execute(self.query, &self.options)
    }
}
