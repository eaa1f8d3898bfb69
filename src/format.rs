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

use std::fmt::Write;

use crate::sparse::AssociationMatrix;
use crate::types::{Id, SparseRows};

const PRINT_COLUMN_WIDTH: usize = 12;

/// Print-friendly rendering of a sparse matrix, meant for debugging. Row and column ids are
/// listed in ascending order, entries which were never stored are left blank.
///
/// The table has a column for every distinct column id, so this is not useful for wide matrices.
pub fn render(matrix: &AssociationMatrix) -> String {
    render_rows(matrix.by_row())
}

pub fn render_rows(rows: &SparseRows) -> String {

    let column_ids = union_column_ids_in_order(rows);
    let mut result = String::with_capacity((rows.len() + 1) * (column_ids.len() + 1) * 13);

    append_with_pad_or_truncate("", &mut result);
    for column_id in column_ids.iter() {
        result.push('\t');
        append_with_pad_or_truncate(&column_id.to_string(), &mut result);
    }
    result.push_str("\n\n");

    for row_id in ids_in_order(rows.keys()) {
        append_with_pad_or_truncate(&row_id.to_string(), &mut result);

        let row = &rows[&row_id];
        for column_id in column_ids.iter() {
            result.push('\t');
            match row.get(column_id) {
                Some(value) => append_with_pad_or_truncate(&format_value(*value), &mut result),
                None => append_with_pad_or_truncate("", &mut result),
            }
        }
        result.push('\n');
    }
    result.push('\n');

    result
}

fn ids_in_order<'a, I: Iterator<Item=&'a Id>>(ids: I) -> Vec<Id> {
    let mut ids: Vec<Id> = ids.cloned().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn union_column_ids_in_order(rows: &SparseRows) -> Vec<Id> {
    ids_in_order(rows.values().flat_map(|row| row.keys()))
}

/// Non-negative values get a leading space so that they line up with negative ones
fn format_value(value: f32) -> String {
    let mut formatted = String::with_capacity(PRINT_COLUMN_WIDTH);
    if value >= 0.0 {
        formatted.push(' ');
    }
    // Debug keeps the decimal point of whole numbers, e.g. "1.0"
    let _ = write!(formatted, "{:?}", value);
    formatted
}

fn append_with_pad_or_truncate(value: &str, to: &mut String) {
    let length = value.chars().count();
    if length >= PRINT_COLUMN_WIDTH {
        to.extend(value.chars().take(PRINT_COLUMN_WIDTH));
    } else {
        to.extend(std::iter::repeat(' ').take(PRINT_COLUMN_WIDTH - length));
        to.push_str(value);
    }
}
