//! Vocabulary abstractions for the matcher.
//!
//! This module provides the [`Dictionary`] trait, the traversal seam between
//! a vocabulary store and the [`Matcher`](crate::matcher::Matcher), together
//! with the arena-backed [`Trie`] that implements it.

pub mod normalize;
pub mod term;
pub mod token;
pub mod trie;

pub use normalize::{Identity, Normalizer};
pub use term::{Term, TermId};
pub use token::{TextUnit, Token};
pub use trie::Trie;

use std::fmt;

/// Handle to a node inside a dictionary's node store.
///
/// Node ids are only meaningful for the dictionary that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every dictionary.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Position of the node in the dictionary's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Core dictionary abstraction for approximate matching.
///
/// A dictionary is a shared-prefix tree whose edges are labeled with tokens.
/// The path of labels from the root to a node is unique, and nodes that end
/// one or more vocabulary entries expose those entries through [`terms`](Self::terms).
///
/// Dictionaries are read-only during search; implementors must not rely on
/// interior mutability so that concurrent searches stay safe.
///
/// # Panics
///
/// Methods taking a [`NodeId`] may panic if the id was not produced by the
/// same dictionary.
pub trait Dictionary {
    /// Edge label type
    type Token: Token;

    /// Get the root node
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Follow the edge labeled `label` out of `node`
    ///
    /// Returns `None` if no such edge exists
    fn transition(&self, node: NodeId, label: &Self::Token) -> Option<NodeId>;

    /// Iterate over all outgoing edges of `node` as (label, child) pairs
    fn edges(&self, node: NodeId) -> Box<dyn Iterator<Item = (&Self::Token, NodeId)> + '_>;

    /// Original terms stored at `node` (empty for non-terminal nodes)
    fn terms(&self, node: NodeId) -> &[Term<Self::Token>];

    /// Check if `node` ends at least one stored term
    fn is_final(&self, node: NodeId) -> bool {
        !self.terms(node).is_empty()
    }

    /// Total number of stored terms
    fn len(&self) -> usize;

    /// Check if the dictionary holds no terms
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the path spelled by `tokens` from the root
    fn find(&self, tokens: &[Self::Token]) -> Option<NodeId> {
        tokens
            .iter()
            .try_fold(self.root(), |node, token| self.transition(node, token))
    }

    /// Check if an already-normalized sequence is stored as a term
    fn contains(&self, tokens: &[Self::Token]) -> bool {
        self.find(tokens)
            .map(|node| self.is_final(node))
            .unwrap_or(false)
    }
}
