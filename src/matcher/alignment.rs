//! Best-first enumeration of alignments along matched paths.
//!
//! For every matched path a table of remaining costs is computed from the
//! final cell backwards: `R[i][j]` is the exact cheapest cost of turning the
//! rest of the query (from token `j`) into the rest of the term (from token
//! `i`). A partial alignment that has consumed `(i, j)` for a prefix cost `g`
//! can therefore be completed for exactly `g + R[i][j]`, and no less. That
//! bound discards branches that cannot stay within the threshold and is the
//! primary priority of a single min-heap shared by every target.
//!
//! Alignments are built forwards, one step per expansion, so the heap can
//! order equal bounds by term id and then by the ranks of the steps taken so
//! far. Extending a partial never moves it earlier in that order, which makes
//! complete alignments leave the heap in exactly the order results are
//! ranked. Caps are then a plain stop: nothing past the last kept result is
//! expanded.
//!
//! Two alignments that differ only in where or whether zero-cost edits occur
//! describe the same correction. Each partial carries the interned sequence
//! of its positive-cost edits; a partial reaching a cell with a sequence that
//! an earlier (better ranked) partial already reached there is dropped, since
//! both have the same futures at the same cost.

use super::config::{cost_key, within};
use super::path::{EditPath, PathEntry};
use super::row::CostMatrix;
use crate::cost::{EditOp, QueryCosts};
use crate::dictionary::{TermId, Token};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// One enumerated alignment.
#[derive(Clone, Debug)]
pub(crate) struct Alignment<T> {
    /// Index into the targets passed to [`enumerate`]
    pub(crate) target: usize,
    /// In-order sum of the path's incremental costs
    pub(crate) cost: f64,
    pub(crate) path: EditPath<T>,
}

/// A term to align against, and the matrix of the path it is stored at.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Target {
    pub(crate) source: usize,
    pub(crate) term: TermId,
}

/// Limits applied while enumerating.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Limits {
    pub(crate) threshold: f64,
    /// Stop once this many alignments are collected (0 = unbounded).
    pub(crate) max_results: usize,
    /// Alignments kept per target (`None` = all).
    pub(crate) per_target: Option<usize>,
}

/// Exact cost of completing an alignment from each cell.
struct Remaining {
    width: usize,
    cells: Vec<f64>,
}

impl Remaining {
    fn new<T: Token>(matrix: &CostMatrix<T>, query: &[T], costs: &QueryCosts<'_, T>) -> Self {
        let labels = matrix.labels();
        let (depth, width) = (labels.len(), query.len() + 1);
        let mut cells = vec![f64::INFINITY; (depth + 1) * width];
        cells[depth * width + query.len()] = 0.0;

        for i in (0..=depth).rev() {
            let insert = labels.get(i).map(|label| costs.insert(label));
            for j in (0..width).rev() {
                let mut best = cells[i * width + j];
                if let Some(insert) = insert {
                    best = best.min(cells[(i + 1) * width + j] + insert);
                }
                if j < query.len() {
                    best = best.min(cells[i * width + j + 1] + costs.delete(j));
                    if let Some(label) = labels.get(i) {
                        let step = if &query[j] == label {
                            0.0
                        } else {
                            costs.substitute(j, label)
                        };
                        best = best.min(cells[(i + 1) * width + j + 1] + step);
                    }
                }
                cells[i * width + j] = best;
            }
        }

        Self { width, cells }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.width + j]
    }
}

/// Identity of a positive-cost edit within one alignment grid.
///
/// Deletes are identified by the query token they drop and inserts by the
/// term token they add, so moving a zero-cost edit around them does not
/// change the identity of the edits that are actually paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum StepId {
    Substitute { term: usize, query: usize },
    Insert(usize),
    Delete(usize),
}

/// Interned sequences of positive-cost edits. Id 0 is the empty sequence.
#[derive(Default)]
struct Signatures {
    ids: FxHashMap<(usize, StepId), usize>,
}

impl Signatures {
    fn extend(&mut self, parent: usize, step: StepId) -> usize {
        let next = self.ids.len() + 1;
        *self.ids.entry((parent, step)).or_insert(next)
    }
}

/// Singly linked steps, latest step at the head.
///
/// Forward expansion appends steps, so partial alignments that share a
/// prefix share its links instead of copying them.
struct Link<T> {
    entry: PathEntry<T>,
    prev: Option<Rc<Link<T>>>,
}

struct Partial<T> {
    key: i64,
    term: TermId,
    /// Step ranks so far; a finished alignment ends with the `End` rank
    ranks: Vec<u8>,
    seq: u64,
    target: usize,
    i: usize,
    j: usize,
    /// In-order sum of the steps taken so far
    cost: f64,
    signature: usize,
    steps: Option<Rc<Link<T>>>,
}

impl<T> PartialEq for Partial<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Partial<T> {}

impl<T> PartialOrd for Partial<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Partial<T> {
    // Reversed so BinaryHeap pops the best ranked first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.term.cmp(&self.term))
            .then_with(|| other.ranks.cmp(&self.ranks))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Enumerate alignments of `query` against each target, best ranked first.
///
/// Alignments come back ordered by cost, then target term id, then step rank
/// at their leftmost divergence. At most `limits.per_target` are returned per
/// target and at most `limits.max_results` in total; enumeration stops as
/// soon as the total cap is reached.
pub(crate) fn enumerate<T: Token>(
    matrices: &[CostMatrix<T>],
    targets: &[Target],
    query: &[T],
    costs: &QueryCosts<'_, T>,
    limits: Limits,
) -> Vec<Alignment<T>> {
    let remaining: Vec<Remaining> = matrices
        .iter()
        .map(|matrix| Remaining::new(matrix, query, costs))
        .collect();
    let end_rank = PathEntry::<T>::End.rank();

    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    for (index, target) in targets.iter().enumerate() {
        let bound = remaining[target.source].get(0, 0);
        if !within(bound, limits.threshold) {
            continue;
        }
        let finished = matrices[target.source].depth() == 0 && query.is_empty();
        heap.push(Partial {
            key: cost_key(bound),
            term: target.term,
            ranks: if finished { vec![end_rank] } else { Vec::new() },
            seq,
            target: index,
            i: 0,
            j: 0,
            cost: 0.0,
            signature: 0,
            steps: None,
        });
        seq += 1;
    }

    let mut found: Vec<Alignment<T>> = Vec::new();
    let mut per_target = vec![0usize; targets.len()];
    let mut seen: FxHashSet<(usize, usize, usize, usize)> = FxHashSet::default();
    let mut signatures = Signatures::default();

    while let Some(partial) = heap.pop() {
        if limits
            .per_target
            .is_some_and(|quota| per_target[partial.target] >= quota)
        {
            continue;
        }
        if !seen.insert((partial.target, partial.i, partial.j, partial.signature)) {
            continue;
        }

        let source = targets[partial.target].source;
        let matrix = &matrices[source];
        if partial.i == matrix.depth() && partial.j == query.len() {
            let path = materialize(&partial.steps);
            per_target[partial.target] += 1;
            found.push(Alignment {
                target: partial.target,
                cost: path.total_cost(),
                path,
            });
            if limits.max_results > 0 && found.len() >= limits.max_results {
                break;
            }
            continue;
        }

        for (i, j, entry, step, id) in successors(matrix, query, costs, partial.i, partial.j) {
            let cost = partial.cost + step;
            let bound = cost + remaining[source].get(i, j);
            if !within(bound, limits.threshold) {
                continue;
            }
            let signature = if step > 0.0 {
                signatures.extend(partial.signature, id)
            } else {
                partial.signature
            };
            let mut ranks = Vec::with_capacity(partial.ranks.len() + 2);
            ranks.extend_from_slice(&partial.ranks);
            ranks.push(entry.rank());
            if i == matrix.depth() && j == query.len() {
                ranks.push(end_rank);
            }
            heap.push(Partial {
                key: cost_key(bound),
                term: partial.term,
                ranks,
                seq,
                target: partial.target,
                i,
                j,
                cost,
                signature,
                steps: Some(Rc::new(Link {
                    entry,
                    prev: partial.steps.clone(),
                })),
            });
            seq += 1;
        }
    }

    found
}

/// Cells reachable from `(i, j)` in one step, with the step taken, its cost
/// and its identity. Forbidden (infinite-cost) steps are skipped.
fn successors<T: Token>(
    matrix: &CostMatrix<T>,
    query: &[T],
    costs: &QueryCosts<'_, T>,
    i: usize,
    j: usize,
) -> impl Iterator<Item = (usize, usize, PathEntry<T>, f64, StepId)> {
    let labels = matrix.labels();
    let mut steps = Vec::with_capacity(3);

    if i < labels.len() && j < query.len() {
        let (from, to) = (&query[j], &labels[i]);
        let id = StepId::Substitute { term: i, query: j };
        if from == to {
            steps.push((i + 1, j + 1, PathEntry::Keep(to.clone()), 0.0, id));
        } else {
            let cost = costs.substitute(j, to);
            let op = EditOp::Substitute {
                from: from.clone(),
                to: to.clone(),
            };
            steps.push((i + 1, j + 1, PathEntry::Edit { op, cost }, cost, id));
        }
    }
    if i < labels.len() {
        let token = &labels[i];
        let cost = costs.insert(token);
        let op = EditOp::Insert(token.clone());
        steps.push((i + 1, j, PathEntry::Edit { op, cost }, cost, StepId::Insert(i)));
    }
    if j < query.len() {
        let cost = costs.delete(j);
        let op = EditOp::Delete(query[j].clone());
        steps.push((i, j + 1, PathEntry::Edit { op, cost }, cost, StepId::Delete(j)));
    }

    steps.into_iter().filter(|(_, _, _, cost, _)| cost.is_finite())
}

fn materialize<T: Clone>(head: &Option<Rc<Link<T>>>) -> EditPath<T> {
    let mut steps = Vec::new();
    let mut cursor = head.as_deref();
    while let Some(link) = cursor {
        steps.push(link.entry.clone());
        cursor = link.prev.as_deref();
    }
    steps.reverse();
    EditPath::from_steps(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostModel;

    fn run(query: &str, term: &str, model: &CostModel<char>, limits: Limits) -> Vec<Alignment<char>> {
        let query: Vec<char> = query.chars().collect();
        let costs = model.prepare(&query);
        let mut matrix = CostMatrix::new(&costs, query.len());
        for label in term.chars() {
            matrix.push_row(&label, &query, &costs);
        }
        let targets = [Target {
            source: 0,
            term: TermId(0),
        }];
        enumerate(&[matrix], &targets, &query, &costs, limits)
    }

    fn unbounded(threshold: f64) -> Limits {
        Limits {
            threshold,
            max_results: 0,
            per_target: None,
        }
    }

    fn free_spaces() -> CostModel<char> {
        let mut model = CostModel::new();
        model
            .set_insert_cost(' ', 0.0)
            .unwrap()
            .set_delete_cost(' ', 0.0)
            .unwrap();
        model
    }

    #[test]
    fn test_exact_alignment_is_unique_at_zero() {
        let found = run("abc", "abc", &CostModel::new(), unbounded(0.0));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cost, 0.0);
        assert!(found[0].path.is_exact());
        assert_eq!(found[0].path.entries().len(), 4);
    }

    #[test]
    fn test_alternatives_in_ascending_cost() {
        // "ab" -> "b": delete 'a' (1), or substitute a>b then delete b (2),
        // or delete both and insert b (3), ...
        let found = run("ab", "b", &CostModel::new(), unbounded(2.0));
        let costs: Vec<f64> = found.iter().map(|a| a.cost).collect();
        assert_eq!(costs[0], 1.0);
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        assert!(costs.iter().all(|&c| c <= 2.0));
        assert!(found.len() > 1);
    }

    #[test]
    fn test_equal_costs_ordered_by_leftmost_step() {
        let found = run("ab", "ba", &CostModel::new(), unbounded(2.0));
        assert!(found.len() >= 3);
        assert!(found
            .windows(2)
            .all(|w| w[0].path.cmp_steps(&w[1].path) == Ordering::Less));
        // Two substitutions outrank any insert/delete pair
        assert!(found[0].path.steps().iter().all(|step| step.rank() == 1));
    }

    #[test]
    fn test_every_path_cost_matches_its_steps() {
        let found = run("kitten", "sitting", &CostModel::new(), unbounded(5.0));
        assert_eq!(found[0].cost, 3.0);
        for alignment in &found {
            assert_eq!(alignment.cost, alignment.path.total_cost());
            assert_eq!(alignment.path.entries().last(), Some(&PathEntry::End));
        }
    }

    #[test]
    fn test_per_target_quota_keeps_best() {
        let limits = Limits {
            threshold: 4.0,
            max_results: 0,
            per_target: Some(1),
        };
        let found = run("kitten", "sitting", &CostModel::new(), limits);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cost, 3.0);
        assert_eq!(found[0].path.edit_count(), 3);
    }

    #[test]
    fn test_max_results_stops_at_cap() {
        // Deleting either 'a' of "aa" costs 1; a cap of 1 keeps the one
        // that keeps first
        let limits = Limits {
            threshold: 3.0,
            max_results: 1,
            per_target: None,
        };
        let found = run("aa", "a", &CostModel::new(), limits);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cost, 1.0);
        assert!(matches!(found[0].path.entries()[0], PathEntry::Keep('a')));
    }

    #[test]
    fn test_forbidden_steps_skipped() {
        let mut model = CostModel::new();
        model.set_substitute_cost('a', 'b', f64::INFINITY).unwrap();
        let found = run("a", "b", &model, unbounded(2.0));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|a| a.cost == 2.0));
        assert!(found.iter().all(|a| a.path.edit_count() == 2));
    }

    #[test]
    fn test_zero_cost_edits_do_not_split_alignments() {
        let found = run("a b", "a b", &free_spaces(), unbounded(0.0));
        assert_eq!(found.len(), 1);
        assert!(found[0].path.is_exact());
    }

    #[test]
    fn test_zero_cost_edit_placement_is_one_alignment() {
        // Deleting 'x' before or after inserting a free space is the same
        // correction
        let found = run("x", " ", &free_spaces(), unbounded(1.0));
        let costs: Vec<f64> = found.iter().map(|a| a.cost).collect();
        assert_eq!(costs, vec![1.0, 1.0]);
        assert_eq!(found[0].path.edit_count(), 1);
        assert_eq!(found[1].path.edit_count(), 2);
    }

    #[test]
    fn test_positive_edit_order_still_distinguishes() {
        let mut model = CostModel::new();
        model
            .set_insert_cost(' ', 0.1)
            .unwrap()
            .set_delete_cost('-', 0.1)
            .unwrap();
        let found = run("-", " ", &model, unbounded(0.2));
        // insert then delete, delete then insert
        assert_eq!(found.len(), 2);
        assert_ne!(found[0].path, found[1].path);
    }

    #[test]
    fn test_long_run_of_free_edits_is_bounded() {
        let term = format!("a{}b", " ".repeat(12));
        let found = run(&term, &term, &free_spaces(), unbounded(0.0));
        assert_eq!(found.len(), 1);
        assert!(found[0].path.is_exact());
    }
}
