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

use std::fs::File;
use std::io::Read;

use serde_derive::Deserialize;

use crate::error::Result;
use crate::sparse::AssociationMatrix;
use crate::types::Id;

/// One line of input: a row id, a column id and an optional association strength
#[derive(Deserialize, Debug)]
struct Association {
    row: Id,
    column: Id,
    #[serde(default)]
    value: Option<f32>,
}

/// Reads a CSV input file. We expect NO headers, and a row-column pair per line, optionally
/// followed by a value, with tab separation.
pub fn csv_reader(file: &str) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .from_path(file)?;

    Ok(reader)
}

/// Accumulates all associations read from `reader`. Lines without a value count as 1.0.
pub fn read_associations<R: Read>(reader: &mut csv::Reader<R>) -> Result<AssociationMatrix> {
    let mut matrix = AssociationMatrix::new();

    for record in reader.deserialize() {
        let association: Association = record?;
        matrix.increment(association.row, association.column, association.value.unwrap_or(1.0));
    }

    Ok(matrix)
}

/// Removes every row-column pair read from `reader` from `matrix`, returns the number of lines
pub fn remove_associations<R: Read>(
    reader: &mut csv::Reader<R>,
    matrix: &mut AssociationMatrix,
) -> Result<usize> {
    let mut num_lines = 0;

    for record in reader.deserialize() {
        let association: Association = record?;
        matrix.remove(association.row, association.column);
        num_lines += 1;
    }

    Ok(num_lines)
}
