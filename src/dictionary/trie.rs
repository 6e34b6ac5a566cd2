//! Arena-backed shared-prefix trie over arbitrary tokens.
//!
//! Nodes live in a single `Vec` and refer to their children by [`NodeId`], so
//! the structure is a plain ownership tree with no reference counting and no
//! per-node allocation beyond the child table.
//!
//! Child tables use a hybrid representation:
//! - **Small fan-out (≤8 edges)**: inline `SmallVec` with linear scan
//! - **Large fan-out (>8 edges)**: `FxHashMap` lookup
//!
//! Most trie nodes below the first few levels have one or two children, where
//! a linear scan over inline storage beats hashing.

use super::normalize::{Identity, Normalizer};
use super::term::{Term, TermId};
use super::token::{TextUnit, Token};
use super::{Dictionary, NodeId};
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

/// Child table of a trie node.
#[derive(Clone, Debug)]
enum Children<T> {
    /// Linear-scan storage for small fan-outs.
    Small(SmallVec<[(T, NodeId); 4]>),

    /// Hash lookup for wide nodes (typically near the root).
    Large(FxHashMap<T, NodeId>),
}

impl<T: Token> Children<T> {
    /// Upgrade from `Small` to `Large` once a node exceeds this many edges.
    const SMALL_FANOUT_LIMIT: usize = 8;

    fn new() -> Self {
        Children::Small(SmallVec::new())
    }

    #[inline]
    fn get(&self, label: &T) -> Option<NodeId> {
        match self {
            Children::Small(edges) => edges
                .iter()
                .find(|(edge, _)| edge == label)
                .map(|(_, child)| *child),
            Children::Large(edges) => edges.get(label).copied(),
        }
    }

    /// Add an edge. The caller guarantees `label` is not present yet.
    fn insert(&mut self, label: T, child: NodeId) {
        match self {
            Children::Small(edges) if edges.len() < Self::SMALL_FANOUT_LIMIT => {
                edges.push((label, child));
            }
            Children::Small(edges) => {
                let mut map: FxHashMap<T, NodeId> = edges.drain(..).collect();
                map.insert(label, child);
                *self = Children::Large(map);
            }
            Children::Large(edges) => {
                edges.insert(label, child);
            }
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&T, NodeId)> + '_> {
        match self {
            Children::Small(edges) => Box::new(edges.iter().map(|(label, child)| (label, *child))),
            Children::Large(edges) => Box::new(edges.iter().map(|(label, child)| (label, *child))),
        }
    }

    fn len(&self) -> usize {
        match self {
            Children::Small(edges) => edges.len(),
            Children::Large(edges) => edges.len(),
        }
    }
}

#[derive(Clone, Debug)]
struct TrieNode<T> {
    children: Children<T>,
    /// Original terms whose normalized form ends here.
    terms: Vec<Term<T>>,
}

impl<T: Token> TrieNode<T> {
    fn new() -> Self {
        Self {
            children: Children::new(),
            terms: Vec::new(),
        }
    }
}

/// Vocabulary index: a trie over normalized token sequences.
///
/// Each terminal node stores every original term that normalized to its path,
/// so entries differing only in ways the normalizer erases (e.g. letter case)
/// remain separately retrievable.
///
/// # Example
///
/// ```rust
/// use fuzzytrie::dictionary::{Dictionary, Trie};
///
/// let lowercase = |tokens: &[char]| -> Vec<char> {
///     tokens.iter().flat_map(|c| c.to_lowercase()).collect()
/// };
///
/// let mut trie = Trie::new();
/// trie.insert_with(&['C', 'a', 't'], &lowercase).unwrap();
/// trie.insert_with(&['c', 'a', 't'], &lowercase).unwrap();
///
/// let node = trie.find(&['c', 'a', 't']).unwrap();
/// assert_eq!(trie.terms(node).len(), 2);
/// assert_eq!(trie.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Trie<T> {
    nodes: Vec<TrieNode<T>>,
    term_count: usize,
}

impl<T: Token> Trie<T> {
    /// Create an empty trie containing only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            term_count: 0,
        }
    }

    /// Insert a term compared as-is.
    pub fn insert(&mut self, term: &[T]) -> Result<TermId> {
        self.insert_with(term, &Identity)
    }

    /// Insert a term, normalizing it first.
    ///
    /// The normalized tokens define the trie path; the original tokens are
    /// appended to the terminal node's term list. Inserting an original term
    /// that is already stored returns its existing id without growing the list.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTerm`] if `term` is empty or normalizes to nothing.
    pub fn insert_with<N: Normalizer<T>>(&mut self, term: &[T], normalizer: &N) -> Result<TermId> {
        if term.is_empty() {
            return Err(Error::EmptyTerm);
        }
        let normalized = normalizer.normalize(term);
        if normalized.is_empty() {
            return Err(Error::EmptyTerm);
        }

        let mut node = NodeId::ROOT;
        for token in normalized.iter() {
            node = match self.nodes[node.index()].children.get(token) {
                Some(child) => child,
                None => {
                    let child = NodeId::new(self.nodes.len());
                    self.nodes.push(TrieNode::new());
                    self.nodes[node.index()].children.insert(token.clone(), child);
                    child
                }
            };
        }

        let terms = &mut self.nodes[node.index()].terms;
        if let Some(existing) = terms.iter().find(|stored| stored.tokens() == term) {
            return Ok(existing.id());
        }

        let id = TermId(self.term_count);
        if terms.is_empty() {
            debug!(target: "fuzzytrie::trie", term_id = id.0, depth = normalized.len(), "New terminal node");
        } else {
            debug!(target: "fuzzytrie::trie", term_id = id.0, homonyms = terms.len() + 1, "Term shares an existing terminal node");
        }
        terms.push(Term::new(id, term.to_vec()));
        self.term_count += 1;
        Ok(id)
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of outgoing edges of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not produced by this trie.
    pub fn edge_count(&self, node: NodeId) -> usize {
        self.nodes[node.index()].children.len()
    }

    /// Iterate over all stored terms in arena order.
    pub fn terms_iter(&self) -> impl Iterator<Item = &Term<T>> + '_ {
        self.nodes.iter().flat_map(|node| node.terms.iter())
    }

    /// Original terms stored for a normalized sequence, if any.
    pub fn get(&self, normalized: &[T]) -> &[Term<T>] {
        match self.find(normalized) {
            Some(node) => &self.nodes[node.index()].terms,
            None => &[],
        }
    }
}

impl<T: TextUnit> Trie<T> {
    /// Build a trie from string terms compared as-is.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTerm`] if any term is empty.
    pub fn from_terms<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_terms_with(terms, &Identity)
    }

    /// Build a trie from string terms, normalizing each one.
    pub fn from_terms_with<I, S, N>(terms: I, normalizer: &N) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        N: Normalizer<T>,
    {
        let mut trie = Self::new();
        for term in terms {
            trie.insert_str_with(term.as_ref(), normalizer)?;
        }
        Ok(trie)
    }

    /// Insert a string term compared as-is.
    pub fn insert_str(&mut self, term: &str) -> Result<TermId> {
        self.insert_with(&T::from_str(term), &Identity)
    }

    /// Insert a string term, normalizing it first.
    pub fn insert_str_with<N: Normalizer<T>>(&mut self, term: &str, normalizer: &N) -> Result<TermId> {
        self.insert_with(&T::from_str(term), normalizer)
    }
}

impl<T: Token> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Node lookups index the arena directly and panic on a `NodeId` that this
/// trie did not produce.
impl<T: Token> Dictionary for Trie<T> {
    type Token = T;

    #[inline]
    fn transition(&self, node: NodeId, label: &T) -> Option<NodeId> {
        self.nodes[node.index()].children.get(label)
    }

    #[inline]
    fn edges(&self, node: NodeId) -> Box<dyn Iterator<Item = (&T, NodeId)> + '_> {
        self.nodes[node.index()].children.iter()
    }

    #[inline]
    fn terms(&self, node: NodeId) -> &[Term<T>] {
        &self.nodes[node.index()].terms
    }

    fn len(&self) -> usize {
        self.term_count
    }
}
