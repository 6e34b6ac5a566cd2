//! Bounded depth-first traversal of a dictionary.
//!
//! The traversal keeps one [`CostMatrix`] for the whole walk. Entering a node
//! truncates the matrix to the parent's depth and pushes the node's row, so no
//! row is ever copied while descending. Only terminal nodes within threshold
//! snapshot the matrix for alignment enumeration.

use super::config::within;
use super::row::CostMatrix;
use crate::cost::QueryCosts;
use crate::dictionary::{Dictionary, NodeId};
use crate::error::{Error, Result};
use tracing::trace;

/// A terminal node reached within threshold.
pub(crate) struct Hit<T> {
    pub(crate) node: NodeId,
    pub(crate) matrix: CostMatrix<T>,
}

/// Outcome of one traversal.
pub(crate) struct Traversal<T> {
    pub(crate) hits: Vec<Hit<T>>,
    /// Nodes whose row was computed (the root included)
    pub(crate) visited: usize,
    /// Subtrees discarded by the row-minimum bound
    pub(crate) pruned: usize,
}

/// Pending node on the explicit stack.
struct Frame<T> {
    node: NodeId,
    /// Depth of `node`; the row for `label` becomes row `depth`
    depth: usize,
    label: T,
}

/// Walk `dictionary`, collecting every terminal node whose full-query cost is
/// within `threshold`.
///
/// A subtree is skipped as soon as the minimum of its root row exceeds the
/// threshold: every completion only adds non-negative cost. `budget` caps the
/// number of visited nodes. An empty query never leaves the root.
pub(crate) fn traverse<D: Dictionary>(
    dictionary: &D,
    query: &[D::Token],
    costs: &QueryCosts<'_, D::Token>,
    threshold: f64,
    budget: Option<usize>,
) -> Result<Traversal<D::Token>> {
    let mut matrix = CostMatrix::new(costs, query.len());
    let mut outcome = Traversal {
        hits: Vec::new(),
        visited: 1,
        pruned: 0,
    };

    let root = dictionary.root();
    if dictionary.is_final(root) && within(matrix.total(), threshold) {
        outcome.hits.push(Hit {
            node: root,
            matrix: matrix.clone(),
        });
    }

    // An empty query only matches terms stored at the root
    let mut stack: Vec<Frame<D::Token>> = Vec::new();
    if !query.is_empty() {
        push_children(dictionary, root, 1, &mut stack);
    }

    while let Some(frame) = stack.pop() {
        outcome.visited += 1;
        if let Some(budget) = budget {
            if outcome.visited > budget {
                return Err(Error::BudgetExhausted { budget });
            }
        }

        matrix.truncate(frame.depth - 1);
        let row_min = matrix.push_row(&frame.label, query, costs);

        if !within(row_min, threshold) {
            outcome.pruned += 1;
            trace!(
                target: "fuzzytrie::matcher",
                node = %frame.node,
                depth = frame.depth,
                row_min,
                threshold,
                "pruned subtree"
            );
            continue;
        }

        if dictionary.is_final(frame.node) && within(matrix.total(), threshold) {
            outcome.hits.push(Hit {
                node: frame.node,
                matrix: matrix.clone(),
            });
        }

        push_children(dictionary, frame.node, frame.depth + 1, &mut stack);
    }

    Ok(outcome)
}

fn push_children<D: Dictionary>(
    dictionary: &D,
    node: NodeId,
    depth: usize,
    stack: &mut Vec<Frame<D::Token>>,
) {
    stack.extend(dictionary.edges(node).map(|(label, child)| Frame {
        node: child,
        depth,
        label: label.clone(),
    }));
}
