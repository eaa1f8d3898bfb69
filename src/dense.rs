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

use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// A matrix of doubles that can be read and updated entry by entry. Implementations that keep
/// their entries in a single row-major buffer expose it via `row_major`, which the kernels in
/// this crate require.
pub trait RealMatrix {

    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    fn entry(&self, row: usize, col: usize) -> f64;

    fn set_entry(&mut self, row: usize, col: usize, value: f64);

    fn add_to_entry(&mut self, row: usize, col: usize, increment: f64) {
        let value = self.entry(row, col);
        self.set_entry(row, col, value + increment);
    }

    /// The live row-major buffer backing this matrix, if there is one
    fn row_major(&self) -> Option<&[f64]> {
        None
    }

    fn row_major_mut(&mut self) -> Option<&mut [f64]> {
        None
    }
}

/// Dense row-major matrix, usually small (k x k for k latent factors)
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {

    pub fn zeros(rows: usize, cols: usize) -> Self {
        DenseMatrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    pub fn identity(dimension: usize) -> Self {
        let mut matrix = DenseMatrix::zeros(dimension, dimension);
        for i in 0..dimension {
            matrix[(i, i)] = 1.0;
        }
        matrix
    }

    /// Builds a matrix from its rows, which must all have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let num_cols = rows.first().map_or(0, |row| row.len());
        let mut data = Vec::with_capacity(rows.len() * num_cols);

        for row in rows {
            if row.len() != num_cols {
                return Err(Error::dimension_mismatch(num_cols, row.len()));
            }
            data.extend_from_slice(row);
        }

        Ok(DenseMatrix { rows: rows.len(), cols: num_cols, data })
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(|row| row.to_vec()).collect()
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl RealMatrix for DenseMatrix {

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn set_entry(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }

    fn add_to_entry(&mut self, row: usize, col: usize, increment: f64) {
        self[(row, col)] += increment;
    }

    fn row_major(&self) -> Option<&[f64]> {
        Some(&self.data)
    }

    fn row_major_mut(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.data)
    }
}

/// Returns the buffer backing `matrix`, not a copy. Matrices without row-major storage are
/// rejected rather than copied, as the kernels rely on this access on their hot paths.
pub fn access_matrix_data_directly<M: RealMatrix + ?Sized>(matrix: &M) -> Result<&[f64]> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    match matrix.row_major() {
        Some(data) if data.len() == rows * cols => Ok(data),
        _ => Err(Error::IncompatibleStorage { rows, cols }),
    }
}

pub fn access_matrix_data_directly_mut<M: RealMatrix + ?Sized>(
    matrix: &mut M,
) -> Result<&mut [f64]> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    match matrix.row_major_mut() {
        Some(data) if data.len() == rows * cols => Ok(data),
        _ => Err(Error::IncompatibleStorage { rows, cols }),
    }
}


#[cfg(test)]
pub(crate) mod tests {

    use crate::dense::{self, DenseMatrix, RealMatrix};
    use crate::error::Error;

    /// Diagonal matrix which only stores its diagonal, so it has no row-major buffer
    pub struct Diagonal(pub Vec<f64>);

    impl RealMatrix for Diagonal {
        fn rows(&self) -> usize { self.0.len() }
        fn cols(&self) -> usize { self.0.len() }

        fn entry(&self, row: usize, col: usize) -> f64 {
            if row == col { self.0[row] } else { 0.0 }
        }

        fn set_entry(&mut self, row: usize, col: usize, value: f64) {
            assert_eq!(row, col);
            self.0[row] = value;
        }
    }

    #[test]
    fn direct_access_is_live() {
        let mut matrix = DenseMatrix::zeros(2, 3);

        dense::access_matrix_data_directly_mut(&mut matrix).unwrap()[4] = 7.0;
        assert_eq!(matrix.entry(1, 1), 7.0);

        matrix.add_to_entry(0, 2, 1.5);
        let data = dense::access_matrix_data_directly(&matrix).unwrap();
        assert_eq!(data, &[0.0, 0.0, 1.5, 0.0, 7.0, 0.0][..]);
    }

    #[test]
    fn direct_access_rejects_other_representations() {
        let mut diagonal = Diagonal(vec![1.0, 2.0]);

        match dense::access_matrix_data_directly(&diagonal) {
            Err(Error::IncompatibleStorage { rows: 2, cols: 2 }) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(dense::access_matrix_data_directly_mut(&mut diagonal).is_err());

        // entry-wise access still works through the default implementation
        diagonal.add_to_entry(1, 1, 0.5);
        assert_eq!(diagonal.entry(1, 1), 2.5);
    }

    #[test]
    fn from_rows() {
        let matrix = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        assert!(matrix.is_square());
        assert_eq!(matrix.row(1), &[3.0, 4.0][..]);
        assert_eq!(matrix[(0, 1)], 2.0);
        assert_eq!(matrix.clone().into_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        assert!(DenseMatrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert_eq!(DenseMatrix::identity(2).data(), &[1.0, 0.0, 0.0, 1.0][..]);
    }
}
