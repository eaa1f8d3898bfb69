/**
 * AlsMath
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use tracing::debug;

use crate::types::{self, Id, SparseRow, SparseRows};

/// Sparse matrix R of observed association strengths, indexed both by row and by column.
///
/// Every stored entry is present in both views with the same value, and a row or column only
/// has an entry in its view while it holds at least one value. The matrix does no locking:
/// concurrent mutation must be synchronized by the caller.
#[derive(Clone, Debug, Default)]
pub struct AssociationMatrix {
    by_row: SparseRows,
    by_column: SparseRows,
}

impl AssociationMatrix {

    pub fn new() -> Self {
        AssociationMatrix::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AssociationMatrix {
            by_row: types::new_sparse_rows(capacity),
            by_column: types::new_sparse_rows(capacity),
        }
    }

    /// Builds a matrix by incrementing every `(row, column, value)` triple in turn
    pub fn from_triples<I>(triples: I) -> Self
        where I: IntoIterator<Item=(Id, Id, f32)> {

        let mut matrix = AssociationMatrix::new();
        for (row, column, value) in triples {
            matrix.increment(row, column, value);
        }
        matrix
    }

    /// Adds `value` to the entry at `(row, column)`, creating it if absent.
    pub fn increment(&mut self, row: Id, column: Id, value: f32) {
        increment(row, column, value, &mut self.by_row, &mut self.by_column);
    }

    /// Removes the entry at `(row, column)`; does nothing if there is none.
    pub fn remove(&mut self, row: Id, column: Id) {
        remove(row, column, &mut self.by_row, &mut self.by_column);
    }

    pub fn get(&self, row: Id, column: Id) -> Option<f32> {
        self.by_row.get(&row).and_then(|the_row| the_row.get(&column)).cloned()
    }

    pub fn row(&self, row: Id) -> Option<&SparseRow> {
        self.by_row.get(&row)
    }

    pub fn column(&self, column: Id) -> Option<&SparseRow> {
        self.by_column.get(&column)
    }

    pub fn by_row(&self) -> &SparseRows {
        &self.by_row
    }

    pub fn by_column(&self) -> &SparseRows {
        &self.by_column
    }

    pub fn num_rows(&self) -> usize {
        self.by_row.len()
    }

    pub fn num_columns(&self) -> usize {
        self.by_column.len()
    }

    pub fn num_entries(&self) -> usize {
        self.by_row.values().map(|the_row| the_row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_row.is_empty()
    }

    /// Checks that both views hold exactly the same entries and contain no empty rows/columns
    pub fn check_consistency(&self) -> bool {
        mirrors(&self.by_row, &self.by_column) && mirrors(&self.by_column, &self.by_row)
    }
}

/// Increments an entry in two parallel sparse views of the same matrix.
pub fn increment(
    row: Id,
    column: Id,
    value: f32,
    by_row: &mut SparseRows,
    by_column: &mut SparseRows,
) {
    increment_by_row(row, column, value, by_row);
    increment_by_row(column, row, value, by_column);
}

/// Removes an entry from two parallel sparse views of the same matrix, dropping rows and
/// columns which become empty.
pub fn remove(row: Id, column: Id, by_row: &mut SparseRows, by_column: &mut SparseRows) {
    let removed = remove_by_row(row, column, by_row);
    remove_by_row(column, row, by_column);

    if !removed {
        debug!("No entry at ({}, {}) to remove", row, column);
    }
}

fn increment_by_row(row: Id, column: Id, value: f32, by_row: &mut SparseRows) {
    *by_row.entry(row)
        .or_insert_with(|| types::new_sparse_row(1))
        .entry(column)
        .or_insert(0.0) += value;
}

fn remove_by_row(row: Id, column: Id, by_row: &mut SparseRows) -> bool {
    let mut removed = false;
    let mut now_empty = false;

    if let Some(the_row) = by_row.get_mut(&row) {
        removed = the_row.remove(&column).is_some();
        now_empty = the_row.is_empty();
    }

    if now_empty {
        by_row.remove(&row);
    }

    removed
}

/// Whether every entry of `view` is mirrored in `transposed`, with no empty inner maps
fn mirrors(view: &SparseRows, transposed: &SparseRows) -> bool {
    view.iter().all(|(row, the_row)| {
        !the_row.is_empty() && the_row.iter().all(|(column, value)| {
            transposed.get(column)
                .and_then(|the_column| the_column.get(row))
                .map_or(false, |mirrored| mirrored.to_bits() == value.to_bits())
        })
    })
}


#[cfg(test)]
mod tests {

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::sparse::{self, AssociationMatrix};
    use crate::types;

    #[test]
    fn increments_accumulate_in_both_views() {
        let mut matrix = AssociationMatrix::new();

        matrix.increment(1, 2, 1.5);
        matrix.increment(1, 2, 2.0);

        assert_eq!(matrix.get(1, 2), Some(3.5));
        assert_eq!(matrix.by_row()[&1][&2], 3.5);
        assert_eq!(matrix.by_column()[&2][&1], 3.5);
        assert_eq!(matrix.num_entries(), 1);
        assert!(matrix.check_consistency());
    }

    #[test]
    fn removing_last_entry_drops_row_and_column() {
        let mut matrix = AssociationMatrix::new();

        matrix.increment(1, 2, 1.0);
        matrix.increment(1, 3, 1.0);
        matrix.remove(1, 2);

        assert_eq!(matrix.get(1, 2), None);
        assert!(matrix.column(2).is_none());
        assert_eq!(matrix.row(1).map(|row| row.len()), Some(1));

        matrix.remove(1, 3);

        assert!(matrix.is_empty());
        assert!(matrix.by_row().get(&1).is_none());
        assert!(matrix.by_column().is_empty());
        assert!(matrix.check_consistency());
    }

    #[test]
    fn removing_absent_entry_is_a_noop() {
        let mut matrix = AssociationMatrix::from_triples(vec![(4, 5, 1.0)]);

        matrix.remove(4, 6);
        matrix.remove(7, 5);

        assert_eq!(matrix.get(4, 5), Some(1.0));
        assert_eq!(matrix.num_rows(), 1);
        assert_eq!(matrix.num_columns(), 1);
        assert!(matrix.check_consistency());
    }

    #[test]
    fn stored_zero_is_kept() {
        let mut matrix = AssociationMatrix::new();

        matrix.increment(1, 1, 2.0);
        matrix.increment(1, 1, -2.0);

        assert_eq!(matrix.get(1, 1), Some(0.0));
        assert_eq!(matrix.num_entries(), 1);
    }

    #[test]
    fn free_functions_on_caller_owned_views() {
        let mut by_row = types::new_sparse_rows(0);
        let mut by_column = types::new_sparse_rows(0);

        sparse::increment(10, 20, 0.5, &mut by_row, &mut by_column);
        assert_eq!(by_column[&20][&10], 0.5);

        sparse::remove(10, 20, &mut by_row, &mut by_column);
        assert!(by_row.is_empty());
        assert!(by_column.is_empty());
    }

    #[test]
    fn invariant_holds_after_random_mutations() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut matrix = AssociationMatrix::new();
        let mut expected = std::collections::HashMap::new();

        for _ in 0..2_000 {
            let row = rng.gen_range(0..20u64);
            let column = rng.gen_range(0..20u64);

            if rng.gen_bool(0.3) {
                matrix.remove(row, column);
                expected.remove(&(row, column));
            } else {
                let value = rng.gen_range(-1..=3) as f32;
                matrix.increment(row, column, value);
                *expected.entry((row, column)).or_insert(0.0) += value;
            }

            assert!(matrix.check_consistency());
        }

        assert_eq!(matrix.num_entries(), expected.len());
        for (&(row, column), &value) in expected.iter() {
            assert_eq!(matrix.get(row, column), Some(value));
            assert_eq!(matrix.column(column).and_then(|c| c.get(&row)).cloned(), Some(value));
        }
    }
}
