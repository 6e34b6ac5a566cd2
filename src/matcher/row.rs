//! Weighted edit-distance rows stacked along a trie path.
//!
//! Row `i` holds `D[i][j]`: the cheapest cost of turning the first `j` query
//! tokens into the first `i` tokens of the current trie path.
//!
//! ```text
//! D[0][0] = 0
//! D[0][j] = D[0][j-1] + delete(q[j-1])
//! D[i][0] = D[i-1][0] + insert(t[i-1])
//! D[i][j] = min( D[i-1][j]   + insert(t[i-1]),
//!                D[i][j-1]   + delete(q[j-1]),
//!                D[i-1][j-1] + (0 if q[j-1] == t[i-1] else substitute(q[j-1], t[i-1])) )
//! ```
//!
//! Rows are pushed and truncated as the traversal descends and backtracks, so
//! the matrix always describes exactly the path from the root to the current
//! node. Alignment enumeration works from the labels of a completed matrix.

use crate::cost::QueryCosts;
use crate::dictionary::Token;

#[derive(Clone, Debug)]
pub(crate) struct CostMatrix<T> {
    /// Row length: query length + 1
    width: usize,
    /// Row-major cells, one row per path depth including the root row
    cells: Vec<f64>,
    /// Edge labels from the root, i.e. the normalized term spelled so far
    labels: Vec<T>,
}

impl<T: Token> CostMatrix<T> {
    /// Matrix holding only the root row (cumulative delete costs).
    pub(crate) fn new(costs: &QueryCosts<'_, T>, query_len: usize) -> Self {
        let width = query_len + 1;
        let mut cells = Vec::with_capacity(width * 16);
        cells.push(0.0);
        for j in 1..width {
            let previous = cells[j - 1];
            cells.push(previous + costs.delete(j - 1));
        }
        Self {
            width,
            cells,
            labels: Vec::new(),
        }
    }

    /// Number of rows below the root row.
    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub(crate) fn labels(&self) -> &[T] {
        &self.labels
    }

    #[inline]
    pub(crate) fn cell(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.width + j]
    }

    /// Cost of aligning the whole query with the whole path.
    #[inline]
    pub(crate) fn total(&self) -> f64 {
        self.cell(self.depth(), self.width - 1)
    }

    /// Drop rows deeper than `depth`.
    #[inline]
    pub(crate) fn truncate(&mut self, depth: usize) {
        self.cells.truncate((depth + 1) * self.width);
        self.labels.truncate(depth);
    }

    /// Extend the path by `label` and return the minimum of the new row.
    ///
    /// No completion of the extended path can cost less than that minimum,
    /// since every further step adds a non-negative cost.
    pub(crate) fn push_row(&mut self, label: &T, query: &[T], costs: &QueryCosts<'_, T>) -> f64 {
        let above = self.cells.len() - self.width;
        let insert = costs.insert(label);

        let first = self.cells[above] + insert;
        self.cells.push(first);
        let mut row_min = first;

        for j in 1..self.width {
            let step = if query[j - 1] == *label {
                0.0
            } else {
                costs.substitute(j - 1, label)
            };
            let diagonal = self.cells[above + j - 1] + step;
            let vertical = self.cells[above + j] + insert;
            let horizontal = self.cells[above + self.width + j - 1] + costs.delete(j - 1);

            let value = diagonal.min(vertical).min(horizontal);
            self.cells.push(value);
            row_min = row_min.min(value);
        }

        self.labels.push(label.clone());
        row_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostModel;

    fn matrix_for(query: &str, term: &str, model: &CostModel<char>) -> CostMatrix<char> {
        let query: Vec<char> = query.chars().collect();
        let costs = model.prepare(&query);
        let mut matrix = CostMatrix::new(&costs, query.len());
        for label in term.chars() {
            matrix.push_row(&label, &query, &costs);
        }
        matrix
    }

    #[test]
    fn test_root_row_is_cumulative_delete() {
        let mut model = CostModel::new();
        model.set_delete_cost('b', 0.5).unwrap();
        let matrix = matrix_for("abc", "", &model);
        assert_eq!(matrix.depth(), 0);
        assert_eq!(matrix.cell(0, 0), 0.0);
        assert_eq!(matrix.cell(0, 1), 1.0);
        assert_eq!(matrix.cell(0, 2), 1.5);
        assert_eq!(matrix.cell(0, 3), 2.5);
    }

    #[test]
    fn test_unit_costs_match_levenshtein() {
        let model = CostModel::new();
        assert_eq!(matrix_for("kitten", "sitting", &model).total(), 3.0);
        assert_eq!(matrix_for("tset", "test", &model).total(), 2.0);
        assert_eq!(matrix_for("same", "same", &model).total(), 0.0);
        assert_eq!(matrix_for("ab", "", &model).total(), 2.0);
    }

    #[test]
    fn test_row_min_is_lower_bound() {
        let model = CostModel::new();
        let query: Vec<char> = "abc".chars().collect();
        let costs = model.prepare(&query);
        let mut matrix = CostMatrix::new(&costs, query.len());
        let min_x = matrix.push_row(&'x', &query, &costs);
        assert_eq!(min_x, 1.0);
        let min_y = matrix.push_row(&'y', &query, &costs);
        assert_eq!(min_y, 2.0);
    }

    #[test]
    fn test_truncate_restores_parent() {
        let model = CostModel::new();
        let query: Vec<char> = "ab".chars().collect();
        let costs = model.prepare(&query);
        let mut matrix = CostMatrix::new(&costs, query.len());
        matrix.push_row(&'a', &query, &costs);
        matrix.push_row(&'x', &query, &costs);
        matrix.truncate(1);
        matrix.push_row(&'b', &query, &costs);
        assert_eq!(matrix.labels(), &['a', 'b']);
        assert_eq!(matrix.total(), 0.0);
    }

    #[test]
    fn test_asymmetric_costs() {
        let mut model = CostModel::new();
        model.set_insert_cost('s', 0.25).unwrap();
        // Term has the extra 's': one insertion
        assert_eq!(matrix_for("cat", "cats", &model).total(), 0.25);
        // Query has the extra 's': one deletion at default cost
        assert_eq!(matrix_for("cats", "cat", &model).total(), 1.0);
    }
}
