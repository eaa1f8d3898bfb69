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

use faer::linalg::solvers::{PartialPivLu, Solve};
use faer::{MatMut, MatRef};
use tracing::warn;

use crate::dense::RealMatrix;
use crate::error::{Error, Result};
use crate::solver::portable;
use crate::solver::{self, Backend, LinearSystemSolver, Solver};

/// Solves linear systems with the LU decomposition of the faer crate. Singularity is judged with
/// the same pivot test as `PortableSolver`, so both backends accept the same matrices.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeSolver;

impl LinearSystemSolver for NativeSolver {

    fn backend(&self) -> Backend {
        Backend::Native
    }

    fn is_non_singular(&self, matrix: &dyn RealMatrix) -> Result<bool> {
        if matrix.rows() != matrix.cols() {
            return Ok(false);
        }
        let (data, dimension) = solver::square_data(matrix)?;
        Ok(portable::has_full_rank(data, dimension))
    }

    fn get_solver(&self, matrix: &dyn RealMatrix) -> Result<Box<dyn Solver>> {
        let (data, dimension) = solver::square_data(matrix)?;
        if !portable::has_full_rank(data, dimension) {
            warn!("Refusing to factorize singular {}x{} matrix", dimension, dimension);
            return Err(Error::SingularMatrix { dimension });
        }

        let matrix = MatRef::from_row_major_slice(data, dimension, dimension);
        Ok(Box::new(FaerLuSolver { lu: matrix.partial_piv_lu(), dimension }))
    }
}

struct FaerLuSolver {
    lu: PartialPivLu<f64>,
    dimension: usize,
}

impl Solver for FaerLuSolver {

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        solver::check_rhs(self.dimension, b)?;

        let mut x = b.to_vec();
        let mut x_mat = MatMut::from_column_major_slice_mut(&mut x, self.dimension, 1);
        self.lu.solve_in_place(x_mat.as_mut());

        Ok(x)
    }
}
