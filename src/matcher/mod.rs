//! Weighted fuzzy search over a dictionary.
//!
//! The [`Matcher`] walks the dictionary depth-first while extending one row
//! of a weighted edit-distance matrix per trie edge. A subtree is abandoned as
//! soon as the cheapest cell of its row exceeds the threshold, so search cost
//! grows with the threshold and the branching factor rather than with the
//! vocabulary size.
//!
//! Every distinct alignment of a reached term within the threshold is a
//! separate result, enumerated best first along the term's path. Alignments
//! that differ only by zero-cost edits count as one. By default at most
//! [`SearchConfig::DEFAULT_ALIGNMENTS_PER_TERM`] are reported per term.
//! Results are ranked by:
//!
//! 1. cost, compared within [`COST_EPSILON`]
//! 2. term insertion order ([`TermId`](crate::dictionary::TermId))
//! 3. the first differing alignment step: keep < substitute < insert < delete
//!
//! # Example
//!
//! ```rust
//! use fuzzytrie::prelude::*;
//!
//! let lowercase = |tokens: &[char]| -> Vec<char> {
//!     tokens.iter().flat_map(|c| c.to_lowercase()).collect()
//! };
//!
//! let matcher = MatcherBuilder::<char>::new()
//!     .normalizer(lowercase)
//!     .terms_str(["hello", "bye", "goodbye", "point of sale", "pointing"])
//!     .build()?;
//!
//! let results = matcher.search_str("Poimt of sales", 3.0, 10)?;
//! assert_eq!(results[0].text(), "point of sale");
//! assert_eq!(results[0].cost(), 2.0);
//! # Ok::<(), fuzzytrie::Error>(())
//! ```

mod alignment;
mod builder;
mod config;
mod matches;
mod path;
mod query_builder;
mod row;
mod traversal;

pub use builder::MatcherBuilder;
pub use config::{SearchConfig, ThresholdPolicy, COST_EPSILON};
pub use matches::Match;
pub use path::{EditPath, PathEntry};
pub use query_builder::QueryBuilder;

pub(crate) use alignment::{enumerate, Limits, Target};
pub(crate) use config::validate_threshold;
pub(crate) use row::CostMatrix;

use crate::cost::CostModel;
use crate::dictionary::{Dictionary, Identity, Normalizer, TextUnit};
use crate::error::{Error, Result};
use std::fmt;
use tracing::debug;

/// Per-call search parameters, resolved against [`SearchConfig`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchOptions {
    /// `None` resolves through the configured [`ThresholdPolicy`]
    pub(crate) threshold: Option<f64>,
    pub(crate) max_results: usize,
    pub(crate) alignments_per_term: Option<usize>,
    pub(crate) step_budget: Option<usize>,
}

impl SearchOptions {
    fn from_config(config: &SearchConfig) -> Self {
        Self {
            threshold: None,
            max_results: config.max_results,
            alignments_per_term: config.alignments_per_term,
            step_budget: config.step_budget,
        }
    }
}

/// Fuzzy matcher over a dictionary, a cost model and a normalizer.
///
/// The matcher is immutable once built. All search methods take `&self`, so
/// one matcher (typically behind an `Arc`) can serve any number of threads.
///
/// The dictionary's terms must have been inserted with the same normalizer
/// the matcher applies to queries; [`MatcherBuilder`] takes care of that.
#[derive(Clone)]
pub struct Matcher<D: Dictionary, N = Identity> {
    dictionary: D,
    costs: CostModel<D::Token>,
    normalizer: N,
    config: SearchConfig,
}

impl<D: Dictionary> Matcher<D, Identity> {
    /// Create a matcher comparing raw, unnormalized sequences.
    pub fn new(dictionary: D, costs: CostModel<D::Token>) -> Self {
        Self::with_normalizer(dictionary, costs, Identity)
    }
}

impl<D, N> Matcher<D, N>
where
    D: Dictionary,
    N: Normalizer<D::Token>,
{
    /// Create a matcher that normalizes every query with `normalizer`.
    pub fn with_normalizer(dictionary: D, costs: CostModel<D::Token>, normalizer: N) -> Self {
        Self {
            dictionary,
            costs,
            normalizer,
            config: SearchConfig::default(),
        }
    }

    /// Replace the search defaults.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if the configuration is rejected by
    /// [`SearchConfig::validate`].
    pub fn with_config(mut self, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Search with an explicit threshold and result cap (`0` = unbounded).
    ///
    /// Returns the alignments of every stored term whose cost is within
    /// `threshold`, up to the configured number per term, ranked and
    /// truncated to `max_results`. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreshold`] if `threshold` is negative, NaN or infinite
    /// - [`Error::BudgetExhausted`] if a configured step budget runs out
    pub fn search(
        &self,
        query: &[D::Token],
        threshold: f64,
        max_results: usize,
    ) -> Result<Vec<Match<D::Token>>> {
        let options = SearchOptions {
            threshold: Some(threshold),
            max_results,
            ..SearchOptions::from_config(&self.config)
        };
        self.execute(query, &options)
    }

    /// Search using the configured threshold policy and result cap.
    pub fn search_default(&self, query: &[D::Token]) -> Result<Vec<Match<D::Token>>> {
        self.execute(query, &SearchOptions::from_config(&self.config))
    }

    /// Start a fluent query starting from the configured defaults.
    pub fn query<'a>(&'a self, query: &'a [D::Token]) -> QueryBuilder<'a, D, N> {
        QueryBuilder::new(self, query, SearchOptions::from_config(&self.config))
    }

    /// Check if `query` normalizes to a stored term.
    pub fn contains(&self, query: &[D::Token]) -> bool {
        let normalized = self.normalizer.normalize(query);
        self.dictionary.contains(&normalized)
    }

    /// Get a reference to the underlying dictionary.
    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    /// Get a reference to the cost model.
    pub fn cost_model(&self) -> &CostModel<D::Token> {
        &self.costs
    }

    /// Get the search defaults.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get a reference to the normalizer.
    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Consume the matcher, returning its dictionary and cost model.
    pub fn into_inner(self) -> (D, CostModel<D::Token>) {
        (self.dictionary, self.costs)
    }

    pub(crate) fn execute(
        &self,
        query: &[D::Token],
        options: &SearchOptions,
    ) -> Result<Vec<Match<D::Token>>> {
        if let Some(threshold) = options.threshold {
            validate_threshold(threshold)?;
        }
        if options.alignments_per_term == Some(0) {
            return Err(Error::InvalidConfig(
                "alignments_per_term must be at least 1".to_string(),
            ));
        }

        let query = self.normalizer.normalize(query);
        let threshold = match options.threshold {
            Some(threshold) => threshold,
            None => self.config.threshold.resolve(query.len()),
        };

        let costs = self.costs.prepare(&query);
        let traversal = traversal::traverse(
            &self.dictionary,
            &query,
            &costs,
            threshold,
            options.step_budget,
        )?;
        let (visited, pruned) = (traversal.visited, traversal.pruned);

        let (nodes, matrices): (Vec<_>, Vec<_>) = traversal
            .hits
            .into_iter()
            .map(|hit| (hit.node, hit.matrix))
            .unzip();

        // One target per stored term, so homonyms are ranked independently
        let mut targets = Vec::new();
        let mut owners = Vec::new();
        for (source, &node) in nodes.iter().enumerate() {
            for term in self.dictionary.terms(node) {
                targets.push(Target {
                    source,
                    term: term.id(),
                });
                owners.push(term);
            }
        }

        let limits = Limits {
            threshold,
            max_results: options.max_results,
            per_target: options.alignments_per_term,
        };
        let alignments = enumerate(&matrices, &targets, &query, &costs, limits);

        let mut results: Vec<_> = alignments
            .into_iter()
            .map(|alignment| {
                Match::new(
                    query.to_vec(),
                    owners[alignment.target].clone(),
                    alignment.path,
                )
            })
            .collect();
        // Already in rank order up to float rounding of the heap keys
        results.sort_by(Match::rank);

        debug!(
            target: "fuzzytrie::matcher",
            query_len = query.len(),
            threshold,
            max_results = options.max_results,
            visited,
            pruned,
            hits = nodes.len(),
            targets = targets.len(),
            results = results.len(),
            "search complete"
        );

        Ok(results)
    }
}

impl<D, N> Matcher<D, N>
where
    D: Dictionary,
    D::Token: TextUnit,
    N: Normalizer<D::Token>,
{
    /// [`search`](Self::search) with a string query.
    pub fn search_str(
        &self,
        query: &str,
        threshold: f64,
        max_results: usize,
    ) -> Result<Vec<Match<D::Token>>> {
        self.search(&<D::Token as TextUnit>::from_str(query), threshold, max_results)
    }

    /// [`contains`](Self::contains) with a string query.
    pub fn contains_str(&self, query: &str) -> bool {
        self.contains(&<D::Token as TextUnit>::from_str(query))
    }
}

impl<D, N> fmt::Debug for Matcher<D, N>
where
    D: Dictionary + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("dictionary", &self.dictionary)
            .field("costs", &self.costs)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::EditOp;
    use crate::dictionary::Trie;

    fn lowercase(tokens: &[char]) -> Vec<char> {
        tokens.iter().flat_map(|c| c.to_lowercase()).collect()
    }

    fn vocabulary() -> Trie<char> {
        Trie::from_terms_with(
            ["hello", "bye", "goodbye", "point of sale", "pointing"],
            &lowercase,
        )
        .unwrap()
    }

    #[test]
    fn test_exact_match() {
        let matcher = Matcher::with_normalizer(vocabulary(), CostModel::new(), lowercase);
        let results = matcher.search_str("point of sale", 0.0, 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text(), "point of sale");
        assert_eq!(results[0].cost(), 0.0);
        assert!(results[0].is_exact());
    }

    #[test]
    fn test_case_folded_typo() {
        let matcher = Matcher::with_normalizer(vocabulary(), CostModel::new(), lowercase);
        let results = matcher.search_str("Poimt of sales", 3.0, 10).unwrap();
        let best = &results[0];
        assert_eq!(best.text(), "point of sale");
        assert_eq!(best.cost(), 2.0);
        assert_eq!(best.query_text(), "poimt of sales");

        let edits: Vec<_> = best.path().edits().map(|(op, _)| op.clone()).collect();
        assert_eq!(
            edits,
            vec![
                EditOp::Substitute { from: 'm', to: 'n' },
                EditOp::Delete('s'),
            ]
        );
    }

    #[test]
    fn test_default_threshold_filters_far_queries() {
        let matcher = Matcher::with_normalizer(vocabulary(), CostModel::new(), lowercase);
        assert!(matcher.search_default(&['p', 'u', 'n', 't', 'o']).unwrap().is_empty());
    }

    #[test]
    fn test_results_sorted_and_capped() {
        let matcher = Matcher::new(
            Trie::<char>::from_terms(["cat", "cot", "coat", "cart", "dog"]).unwrap(),
            CostModel::new(),
        );
        let results = matcher.search_str("cat", 2.0, 0).unwrap();
        assert!(results.windows(2).all(|w| w[0].cost() <= w[1].cost() + COST_EPSILON));
        assert!(results.iter().all(|m| m.cost() <= 2.0 + COST_EPSILON));

        let capped = matcher.search_str("cat", 2.0, 3).unwrap();
        assert_eq!(capped.len(), 3);
        assert_eq!(capped[..], results[..3]);
    }

    #[test]
    fn test_zero_cost_edits_keep_exact_match_unique() {
        let mut costs = CostModel::new();
        costs
            .set_insert_cost(' ', 0.0)
            .unwrap()
            .set_delete_cost(' ', 0.0)
            .unwrap();
        let matcher = Matcher::new(Trie::<char>::from_terms(["a b"]).unwrap(), costs);

        let results = matcher.search_str("a b", 0.0, 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cost(), 0.0);
        assert!(results[0].is_exact());
    }

    #[test]
    fn test_alignments_per_term_bounded_by_default() {
        let matcher = Matcher::new(
            Trie::<char>::from_terms(["abcdefghijkl"]).unwrap(),
            CostModel::new(),
        );
        let results = matcher.search_str("abcdefghijkl", 8.0, 0).unwrap();
        assert_eq!(results.len(), SearchConfig::DEFAULT_ALIGNMENTS_PER_TERM);
        assert!(results[0].is_exact());
        assert!(results[1..].iter().all(|m| m.cost() == 2.0));

        let query: Vec<char> = "abcdefghijkl".chars().collect();
        let all = matcher
            .query(&query)
            .threshold(2.0)
            .max_results(0)
            .all_alignments()
            .execute()
            .unwrap();
        assert!(all.len() > SearchConfig::DEFAULT_ALIGNMENTS_PER_TERM);
        assert_eq!(all[..SearchConfig::DEFAULT_ALIGNMENTS_PER_TERM], results[..]);
    }

    #[test]
    fn test_invalid_threshold() {
        let matcher = Matcher::new(Trie::<char>::from_terms(["a"]).unwrap(), CostModel::new());
        assert_eq!(
            matcher.search_str("a", -1.0, 0).unwrap_err(),
            Error::InvalidThreshold(-1.0)
        );
        assert!(matcher.search_str("a", f64::NAN, 0).is_err());
    }

    #[test]
    fn test_empty_query() {
        let matcher = Matcher::new(Trie::<char>::from_terms(["a", "b"]).unwrap(), CostModel::new());
        assert!(matcher.search(&[], 10.0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_homonyms_reported_separately() {
        let mut trie: Trie<char> = Trie::new();
        trie.insert_str_with("Paris", &lowercase).unwrap();
        trie.insert_str_with("paris", &lowercase).unwrap();
        let matcher = Matcher::with_normalizer(trie, CostModel::new(), lowercase);

        let results = matcher.search_str("PARIS", 0.0, 0).unwrap();
        let texts: Vec<String> = results.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["Paris", "paris"]);
    }

    #[test]
    fn test_contains_normalizes() {
        let matcher = Matcher::with_normalizer(vocabulary(), CostModel::new(), lowercase);
        assert!(matcher.contains_str("HELLO"));
        assert!(!matcher.contains_str("hell"));
    }

    #[test]
    fn test_with_config_validates() {
        let matcher = Matcher::new(Trie::<char>::new(), CostModel::new());
        let config = SearchConfig {
            alignments_per_term: Some(0),
            ..SearchConfig::default()
        };
        assert!(matches!(
            matcher.with_config(config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
