//! Edit paths: the alignment trace behind a match.

use crate::cost::{EditKind, EditOp};
use std::cmp::Ordering;
use std::fmt;

/// One alignment step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum PathEntry<T> {
    /// Query and term token are equal; no cost
    Keep(T),
    /// An edit operation and the cost it added
    Edit {
        /// The operation performed
        op: EditOp<T>,
        /// Incremental cost of this step
        cost: f64,
    },
    /// Alignment completed at a vocabulary entry
    End,
}

impl<T> PathEntry<T> {
    /// Incremental cost of this step (zero for `Keep` and `End`).
    #[inline]
    pub fn cost(&self) -> f64 {
        match self {
            PathEntry::Edit { cost, .. } => *cost,
            PathEntry::Keep(_) | PathEntry::End => 0.0,
        }
    }

    /// Check if this step is an edit operation.
    #[inline]
    pub fn is_edit(&self) -> bool {
        matches!(self, PathEntry::Edit { .. })
    }

    /// Rank used to order alternative alignments at the first step where
    /// they diverge: keep < substitute < insert < delete < end.
    #[inline]
    pub(crate) fn rank(&self) -> u8 {
        match self {
            PathEntry::Keep(_) => 0,
            PathEntry::Edit { op, .. } => match op.kind() {
                EditKind::Substitute => 1,
                EditKind::Insert => 2,
                EditKind::Delete => 3,
            },
            PathEntry::End => 4,
        }
    }
}

impl<T: fmt::Display> fmt::Display for PathEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathEntry::Keep(token) => write!(f, "={}", token),
            PathEntry::Edit { op, .. } => write!(f, "{}", op),
            PathEntry::End => f.write_str("$"),
        }
    }
}

/// A fully materialized alignment between a query and a matched term.
///
/// Entries run oldest first, one per alignment step, and the last entry is
/// always [`PathEntry::End`]. Every match owns its own path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EditPath<T> {
    entries: Vec<PathEntry<T>>,
}

impl<T> EditPath<T> {
    /// Build a path from alignment steps, appending the terminal marker.
    pub(crate) fn from_steps(mut steps: Vec<PathEntry<T>>) -> Self {
        steps.push(PathEntry::End);
        Self { entries: steps }
    }

    /// All entries, ending with [`PathEntry::End`].
    #[inline]
    pub fn entries(&self) -> &[PathEntry<T>] {
        &self.entries
    }

    /// Alignment steps without the terminal marker.
    #[inline]
    pub fn steps(&self) -> &[PathEntry<T>] {
        &self.entries[..self.entries.len() - 1]
    }

    /// Edit operations in order, skipping no-op steps.
    pub fn edits(&self) -> impl Iterator<Item = (&EditOp<T>, f64)> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            PathEntry::Edit { op, cost } => Some((op, *cost)),
            _ => None,
        })
    }

    /// Number of edit operations.
    pub fn edit_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_edit()).count()
    }

    /// Sum of incremental costs, accumulated in path order.
    pub fn total_cost(&self) -> f64 {
        self.entries
            .iter()
            .filter(|entry| entry.is_edit())
            .fold(0.0, |total, entry| total + entry.cost())
    }

    /// Check if every step is a no-op.
    pub fn is_exact(&self) -> bool {
        self.edit_count() == 0
    }

    /// Compare two paths by step rank at their leftmost divergence.
    pub(crate) fn cmp_steps(&self, other: &Self) -> Ordering {
        self.entries
            .iter()
            .map(PathEntry::rank)
            .cmp(other.entries.iter().map(PathEntry::rank))
    }
}

impl<T: fmt::Display> fmt::Display for EditPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EditPath<char> {
        EditPath::from_steps(vec![
            PathEntry::Keep('p'),
            PathEntry::Edit {
                op: EditOp::Substitute { from: 'm', to: 'n' },
                cost: 1.0,
            },
            PathEntry::Edit {
                op: EditOp::Delete('s'),
                cost: 0.5,
            },
        ])
    }

    #[test]
    fn test_terminal_marker_appended() {
        let path = sample();
        assert_eq!(path.entries().len(), 4);
        assert_eq!(path.entries().last(), Some(&PathEntry::End));
        assert_eq!(path.steps().len(), 3);
    }

    #[test]
    fn test_total_cost_sums_edits() {
        let path = sample();
        assert_eq!(path.total_cost(), 1.5);
        assert_eq!(path.edit_count(), 2);
        assert!(!path.is_exact());
        assert!(EditPath::from_steps(vec![PathEntry::Keep('a')]).is_exact());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "=p m>n -s $");
    }

    #[test]
    fn test_step_ordering() {
        let substitute = sample();
        let insert_first = EditPath::from_steps(vec![
            PathEntry::Keep('p'),
            PathEntry::Edit {
                op: EditOp::Insert('n'),
                cost: 1.0,
            },
            PathEntry::Edit {
                op: EditOp::Delete('m'),
                cost: 1.0,
            },
        ]);
        assert_eq!(substitute.cmp_steps(&insert_first), Ordering::Less);
        assert_eq!(substitute.cmp_steps(&substitute), Ordering::Equal);
    }
}
