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

use tracing::warn;

use crate::dense::RealMatrix;
use crate::error::{Error, Result};
use crate::solver::{self, Backend, LinearSystemSolver, Solver, SINGULARITY_THRESHOLD};

/// Solves linear systems via LU decomposition with partial pivoting, without any native code
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableSolver;

impl LinearSystemSolver for PortableSolver {

    fn backend(&self) -> Backend {
        Backend::Portable
    }

    fn is_non_singular(&self, matrix: &dyn RealMatrix) -> Result<bool> {
        if matrix.rows() != matrix.cols() {
            return Ok(false);
        }
        let (data, dimension) = solver::square_data(matrix)?;
        Ok(has_full_rank(data, dimension))
    }

    fn get_solver(&self, matrix: &dyn RealMatrix) -> Result<Box<dyn Solver>> {
        let (data, dimension) = solver::square_data(matrix)?;

        match LuDecomposition::compute(data, dimension) {
            Some(lu) => Ok(Box::new(lu)),
            None => {
                warn!("Refusing to factorize singular {}x{} matrix", dimension, dimension);
                Err(Error::SingularMatrix { dimension })
            }
        }
    }
}

/// Rank test of every backend: the row-major `n x n` matrix is non-singular if partial pivoting
/// finds no pivot at or below `SINGULARITY_THRESHOLD` times its largest absolute entry.
pub(super) fn has_full_rank(data: &[f64], n: usize) -> bool {
    LuDecomposition::compute(data, n).is_some()
}

/// `PA = LU`, with unit lower triangular `L` and `U` packed into one row-major buffer
struct LuDecomposition {
    lu: Vec<f64>,
    permutation: Vec<usize>,
    dimension: usize,
}

impl LuDecomposition {

    /// Returns `None` for a singular matrix, i.e. as soon as a pivot is not clearly above zero
    /// relative to the largest entry of the matrix.
    fn compute(data: &[f64], n: usize) -> Option<Self> {

        let scale = data.iter().fold(0.0_f64, |max, value| max.max(value.abs()));
        if !(scale > 0.0) {
            return None;
        }
        let threshold = SINGULARITY_THRESHOLD * scale;

        let mut lu = data.to_vec();
        let mut permutation: Vec<usize> = (0..n).collect();

        for col in 0..n {

            let mut pivot_row = col;
            let mut max_value = lu[col * n + col].abs();
            for row in (col + 1)..n {
                let value = lu[row * n + col].abs();
                if value > max_value {
                    max_value = value;
                    pivot_row = row;
                }
            }

            if pivot_row != col {
                for j in 0..n {
                    lu.swap(col * n + j, pivot_row * n + j);
                }
                permutation.swap(col, pivot_row);
            }

            let pivot = lu[col * n + col];
            if pivot.abs() <= threshold {
                return None;
            }

            for row in (col + 1)..n {
                let multiplier = lu[row * n + col] / pivot;
                lu[row * n + col] = multiplier;
                for j in (col + 1)..n {
                    lu[row * n + j] -= multiplier * lu[col * n + j];
                }
            }
        }

        Some(LuDecomposition { lu, permutation, dimension: n })
    }
}

impl Solver for LuDecomposition {

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.dimension;
        solver::check_rhs(n, b)?;

        let mut x: Vec<f64> = self.permutation.iter().map(|&row| b[row]).collect();

        // forward substitution with L, which has an implicit unit diagonal
        for row in 1..n {
            let mut total = x[row];
            for col in 0..row {
                total -= self.lu[row * n + col] * x[col];
            }
            x[row] = total;
        }

        // back substitution with U
        for row in (0..n).rev() {
            let mut total = x[row];
            for col in (row + 1)..n {
                total -= self.lu[row * n + col] * x[col];
            }
            x[row] = total / self.lu[row * n + row];
        }

        Ok(x)
    }
}
