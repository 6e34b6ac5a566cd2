//! Swapping a matcher while searches are in flight.
//!
//! A [`Matcher`] is immutable, so sharing one between threads only needs an
//! `Arc`. [`SharedMatcher`] adds the one thing an `Arc` cannot do: replace the
//! index with a rebuilt one without stopping readers.
//!
//! # Thread Safety
//!
//! The lock guards only the pointer to the current matcher. Searches clone
//! the `Arc` under a short read lock and run without holding it; a rebuild
//! happens outside the lock and only the final swap takes the write lock.
//! Searches that started before a swap finish against the old matcher.

use crate::dictionary::{Dictionary, Identity, Normalizer};
use crate::error::Result;
use crate::matcher::{Match, Matcher};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Handle to a replaceable, shared [`Matcher`].
///
/// Clones share the same slot: a [`replace`](Self::replace) through one clone
/// is seen by all of them.
///
/// # Example
///
/// ```rust
/// use fuzzytrie::prelude::*;
///
/// let shared = SharedMatcher::new(MatcherBuilder::<char>::new().terms_str(["alpha"]).build()?);
/// assert!(shared.search_str("beta", 0.0, 0)?.is_empty());
///
/// shared.rebuild(|current| {
///     MatcherBuilder::new()
///         .dictionary(current.dictionary().clone())
///         .term_str("beta")
///         .build()
/// })?;
/// assert_eq!(shared.search_str("beta", 0.0, 0)?.len(), 1);
/// # Ok::<(), fuzzytrie::Error>(())
/// ```
pub struct SharedMatcher<D: Dictionary, N = Identity> {
    current: Arc<RwLock<Arc<Matcher<D, N>>>>,
}

impl<D, N> SharedMatcher<D, N>
where
    D: Dictionary,
    N: Normalizer<D::Token>,
{
    /// Wrap `matcher` for shared use.
    pub fn new(matcher: Matcher<D, N>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(matcher))),
        }
    }

    /// The matcher current at the time of the call.
    ///
    /// The snapshot stays valid, and unchanged, after later replacements.
    pub fn snapshot(&self) -> Arc<Matcher<D, N>> {
        Arc::clone(&self.current.read())
    }

    /// [`Matcher::search`] against the current matcher.
    pub fn search(
        &self,
        query: &[D::Token],
        threshold: f64,
        max_results: usize,
    ) -> Result<Vec<Match<D::Token>>> {
        self.snapshot().search(query, threshold, max_results)
    }

    /// [`Matcher::search_default`] against the current matcher.
    pub fn search_default(&self, query: &[D::Token]) -> Result<Vec<Match<D::Token>>> {
        self.snapshot().search_default(query)
    }

    /// Install `matcher`, returning the one it replaces.
    pub fn replace(&self, matcher: Matcher<D, N>) -> Arc<Matcher<D, N>> {
        let replacement = Arc::new(matcher);
        let previous = std::mem::replace(&mut *self.current.write(), replacement);
        debug!(
            target: "fuzzytrie::sync",
            terms = previous.dictionary().len(),
            "matcher replaced"
        );
        previous
    }

    /// Build a new matcher from the current one and install it.
    ///
    /// `build` runs without holding the lock, so searches continue against
    /// the current matcher meanwhile. If `build` fails nothing is replaced.
    /// Concurrent rebuilds are not merged: the last swap wins.
    pub fn rebuild<F>(&self, build: F) -> Result<()>
    where
        F: FnOnce(&Matcher<D, N>) -> Result<Matcher<D, N>>,
    {
        let current = self.snapshot();
        let rebuilt = build(&current)?;
        self.replace(rebuilt);
        Ok(())
    }
}

impl<D, N> SharedMatcher<D, N>
where
    D: Dictionary,
    D::Token: crate::dictionary::TextUnit,
    N: Normalizer<D::Token>,
{
    /// [`Matcher::search_str`] against the current matcher.
    pub fn search_str(
        &self,
        query: &str,
        threshold: f64,
        max_results: usize,
    ) -> Result<Vec<Match<D::Token>>> {
        self.snapshot().search_str(query, threshold, max_results)
    }
}

impl<D: Dictionary, N> Clone for SharedMatcher<D, N> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<D: Dictionary, N> From<Matcher<D, N>> for SharedMatcher<D, N>
where
    N: Normalizer<D::Token>,
{
    fn from(matcher: Matcher<D, N>) -> Self {
        Self::new(matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostModel;
    use crate::dictionary::Trie;
    use crate::error::Error;

    fn matcher(terms: &[&str]) -> Matcher<Trie<char>> {
        Matcher::new(Trie::from_terms(terms.iter().copied()).unwrap(), CostModel::new())
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let shared = SharedMatcher::new(matcher(&["old"]));
        let before = shared.snapshot();

        let previous = shared.replace(matcher(&["new"]));
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.search_str("old", 0.0, 0).unwrap().len(), 1);
        assert!(shared.search_str("old", 0.0, 0).unwrap().is_empty());
        assert_eq!(shared.search_str("new", 0.0, 0).unwrap().len(), 1);
    }

    #[test]
    fn test_clones_share_slot() {
        let shared = SharedMatcher::new(matcher(&["a"]));
        let other = shared.clone();
        shared.replace(matcher(&["b"]));
        assert_eq!(other.search_str("b", 0.0, 0).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_rebuild_keeps_current() {
        let shared = SharedMatcher::from(matcher(&["keep"]));
        let result = shared.rebuild(|_| Err(Error::EmptyTerm));
        assert_eq!(result, Err(Error::EmptyTerm));
        assert_eq!(shared.search_str("keep", 0.0, 0).unwrap().len(), 1);
    }
}
