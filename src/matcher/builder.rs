//! Builder pattern for creating Matcher instances.
//!
//! The `MatcherBuilder` collects the vocabulary, the cost model, the
//! normalizer and the search defaults, then builds a [`Matcher`] over a
//! [`Trie`] with every term normalized by the same function as the queries.

use super::{Matcher, SearchConfig};
use crate::cost::CostModel;
use crate::dictionary::{Identity, Normalizer, TextUnit, Token, Trie};
use crate::error::Result;

/// Builder for constructing a `Matcher` with a fluent API.
///
/// Terms are buffered and only inserted by [`build`](Self::build), after the
/// normalizer is known, so the call order of the setters does not matter.
///
/// # Example
///
/// ```rust
/// use fuzzytrie::prelude::*;
///
/// let mut costs = CostModel::new();
/// costs.set_insert_cost('s', 0.25)?;
///
/// let matcher = MatcherBuilder::new()
///     .terms_str(["cat", "cats", "dog"])
///     .cost_model(costs)
///     .build()?;
///
/// let results = matcher.search_str("cat", 0.5, 0)?;
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[1].text(), "cats");
/// assert_eq!(results[1].cost(), 0.25);
/// # Ok::<(), fuzzytrie::Error>(())
/// ```
pub struct MatcherBuilder<T: Token, N = Identity> {
    dictionary: Trie<T>,
    terms: Vec<Vec<T>>,
    costs: CostModel<T>,
    normalizer: N,
    config: SearchConfig,
}

impl<T: Token> MatcherBuilder<T, Identity> {
    /// Create a builder with an empty vocabulary, default costs and no
    /// normalization.
    pub fn new() -> Self {
        MatcherBuilder {
            dictionary: Trie::new(),
            terms: Vec::new(),
            costs: CostModel::new(),
            normalizer: Identity,
            config: SearchConfig::default(),
        }
    }
}

impl<T: Token, N: Normalizer<T>> MatcherBuilder<T, N> {
    /// Start from an existing trie.
    ///
    /// Its terms must already be normalized with the normalizer this builder
    /// ends up using; buffered terms are added on top of it.
    pub fn dictionary(mut self, dictionary: Trie<T>) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Set the cost model (default: every operation costs 1.0).
    pub fn cost_model(mut self, costs: CostModel<T>) -> Self {
        self.costs = costs;
        self
    }

    /// Set the normalizer applied to every term and every query.
    pub fn normalizer<M: Normalizer<T>>(self, normalizer: M) -> MatcherBuilder<T, M> {
        MatcherBuilder {
            dictionary: self.dictionary,
            terms: self.terms,
            costs: self.costs,
            normalizer,
            config: self.config,
        }
    }

    /// Set the search defaults.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Add one term.
    pub fn term(mut self, term: impl AsRef<[T]>) -> Self {
        self.terms.push(term.as_ref().to_vec());
        self
    }

    /// Add several terms.
    pub fn terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[T]>,
    {
        self.terms
            .extend(terms.into_iter().map(|term| term.as_ref().to_vec()));
        self
    }

    /// Build the `Matcher`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyTerm`](crate::Error::EmptyTerm) if a term is empty before or after normalization
    /// - [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the search defaults are rejected
    pub fn build(self) -> Result<Matcher<Trie<T>, N>> {
        self.config.validate()?;

        let mut dictionary = self.dictionary;
        for term in &self.terms {
            dictionary.insert_with(term, &self.normalizer)?;
        }

        Matcher::with_normalizer(dictionary, self.costs, self.normalizer).with_config(self.config)
    }
}

impl<T: TextUnit, N: Normalizer<T>> MatcherBuilder<T, N> {
    /// Add one term given as text.
    pub fn term_str(self, term: &str) -> Self {
        self.term(<T as TextUnit>::from_str(term))
    }

    /// Add several terms given as text.
    pub fn terms_str<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.terms(
            terms
                .into_iter()
                .map(|term| <T as TextUnit>::from_str(term.as_ref())),
        )
    }
}

impl<T: Token> Default for MatcherBuilder<T, Identity> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::error::Error;

    #[test]
    fn test_builder_complete() {
        let matcher = MatcherBuilder::<char>::new()
            .terms_str(["test", "testing"])
            .term_str("tested")
            .build()
            .unwrap();

        assert_eq!(matcher.dictionary().len(), 3);
        assert!(matcher.cost_model().is_uniform());
        assert_eq!(matcher.config(), &SearchConfig::default());
    }

    #[test]
    fn test_builder_applies_normalizer_to_terms() {
        let lowercase = |tokens: &[char]| -> Vec<char> {
            tokens.iter().flat_map(|c| c.to_lowercase()).collect()
        };
        // Terms are added before the normalizer is set
        let matcher = MatcherBuilder::<char>::new()
            .term_str("HeLLo")
            .normalizer(lowercase)
            .build()
            .unwrap();

        assert!(matcher.dictionary().contains(&['h', 'e', 'l', 'l', 'o']));
        let results = matcher.search_str("hello", 0.0, 0).unwrap();
        assert_eq!(results[0].text(), "HeLLo");
    }

    #[test]
    fn test_builder_generic_tokens() {
        let matcher = MatcherBuilder::<&str>::new()
            .term(["k", "ae", "t"])
            .term(vec!["d", "o", "g"])
            .build()
            .unwrap();

        let results = matcher.search(&["k", "a", "t"], 1.0, 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term().tokens(), &["k", "ae", "t"]);
    }

    #[test]
    fn test_builder_rejects_empty_term() {
        let result = MatcherBuilder::<char>::new().term_str("").build();
        assert!(matches!(result.err(), Some(Error::EmptyTerm)));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = SearchConfig {
            max_results: 5,
            alignments_per_term: Some(0),
            ..SearchConfig::default()
        };
        let result = MatcherBuilder::<char>::new().config(config).build();
        assert!(matches!(result.err(), Some(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_extends_existing_trie() {
        let trie = Trie::<char>::from_terms(["alpha"]).unwrap();
        let matcher = MatcherBuilder::new()
            .dictionary(trie)
            .term_str("beta")
            .build()
            .unwrap();
        assert!(matcher.contains_str("alpha"));
        assert!(matcher.contains_str("beta"));
    }
}
