//! Pairwise distance between two sequences.
//!
//! These functions compare one query against one term without building a
//! trie. They share the matcher's DP recurrence and alignment enumeration, so
//! for any term stored in a matcher:
//!
//! ```text
//! weighted_distance(query, term, costs) == cost of the best match for term
//! ```
//!
//! which makes them handy for checking individual results or scoring a
//! candidate list produced elsewhere.

use crate::cost::CostModel;
use crate::dictionary::{TermId, Token};
use crate::error::Result;
use crate::matcher::{enumerate, validate_threshold, CostMatrix, EditPath, Limits, Target};
use smallvec::SmallVec;

/// Cheapest weighted cost of turning `query` into `term`.
///
/// Insertions are charged for tokens of `term`, deletions for tokens of
/// `query`, substitutions as `(query token, term token)`.
///
/// # Example
///
/// ```rust
/// use fuzzytrie::cost::CostModel;
/// use fuzzytrie::distance::weighted_distance;
///
/// let mut costs = CostModel::new();
/// costs.set_delete_cost('-', 0.25)?;
///
/// let query: Vec<char> = "e-mail".chars().collect();
/// let term: Vec<char> = "email".chars().collect();
/// assert_eq!(weighted_distance(&query, &term, &costs), 0.25);
/// assert_eq!(weighted_distance(&term, &query, &costs), 1.0);
/// # Ok::<(), fuzzytrie::Error>(())
/// ```
pub fn weighted_distance<T: Token>(query: &[T], term: &[T], costs: &CostModel<T>) -> f64 {
    matrix(query, term, costs).total()
}

/// Alignments of `query` with `term` costing at most `threshold`, cheapest
/// first, at most `limit` of them (`0` = all).
///
/// Equal-cost alignments are ordered by their first differing step:
/// keep < substitute < insert < delete. Alignments that differ only by
/// zero-cost edits are reported once.
///
/// # Errors
///
/// [`Error::InvalidThreshold`](crate::Error::InvalidThreshold) if `threshold`
/// is negative, NaN or infinite.
pub fn alignments<T: Token>(
    query: &[T],
    term: &[T],
    costs: &CostModel<T>,
    threshold: f64,
    limit: usize,
) -> Result<Vec<EditPath<T>>> {
    validate_threshold(threshold)?;

    let prepared = costs.prepare(query);
    let matrix = matrix(query, term, costs);
    let limits = Limits {
        threshold,
        max_results: limit,
        per_target: None,
    };
    let target = Target {
        source: 0,
        term: TermId(0),
    };

    let found = enumerate(&[matrix], &[target], query, &prepared, limits);
    Ok(found.into_iter().map(|alignment| alignment.path).collect())
}

/// Unit-cost Levenshtein distance between two strings, counted in chars.
///
/// # Example
///
/// ```rust
/// use fuzzytrie::distance::standard_distance;
///
/// assert_eq!(standard_distance("kitten", "sitting"), 3);
/// assert_eq!(standard_distance("test", "test"), 0);
/// ```
pub fn standard_distance(source: &str, target: &str) -> usize {
    let source_chars: SmallVec<[char; 32]> = source.chars().collect();
    let target_chars: SmallVec<[char; 32]> = target.chars().collect();

    let m = source_chars.len();
    let n = target_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0; n + 1];

    for i in 1..=m {
        curr_row[0] = i;

        for j in 1..=n {
            let cost = usize::from(source_chars[i - 1] != target_chars[j - 1]);

            curr_row[j] = (prev_row[j] + 1) // deletion
                .min(curr_row[j - 1] + 1) // insertion
                .min(prev_row[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

fn matrix<T: Token>(query: &[T], term: &[T], costs: &CostModel<T>) -> CostMatrix<T> {
    let prepared = costs.prepare(query);
    let mut matrix = CostMatrix::new(&prepared, query.len());
    for token in term {
        matrix.push_row(token, query, &prepared);
    }
    matrix
}
