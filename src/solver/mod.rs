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

use tracing::info;

use crate::config::SolverConfig;
use crate::dense::{self, RealMatrix};
use crate::error::{Error, Result};

mod portable;
#[cfg(feature = "native-math")]
mod native;

pub use self::portable::PortableSolver;
#[cfg(feature = "native-math")]
pub use self::native::NativeSolver;

/// Relative size below which a pivot or singular value is treated as zero
pub const SINGULARITY_THRESHOLD: f64 = 1.0e-5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Pure Rust LU decomposition, always available
    Portable,
    /// Decompositions from the faer crate, requires the `native-math` feature
    Native,
}

/// A factorization of a square matrix `A`, which solves `Ax = b` for any number of `b`
pub trait Solver {

    fn dimension(&self) -> usize;

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>>;

    fn solve_f32(&self, b: &[f32]) -> Result<Vec<f32>> {
        let b: Vec<f64> = b.iter().map(|&value| value as f64).collect();
        let x = self.solve(&b)?;
        Ok(x.into_iter().map(|value| value as f32).collect())
    }
}

/// Interchangeable dense linear system solver. A backend is picked once from `SolverConfig`
/// and handed to whoever needs to solve the normal equations.
pub trait LinearSystemSolver: Send + Sync {

    fn backend(&self) -> Backend;

    /// Whether `Ax = b` has a unique solution. Non-square matrices never do.
    fn is_non_singular(&self, matrix: &dyn RealMatrix) -> Result<bool>;

    /// Factorizes `matrix` once for repeated solves. Fails with `Error::SingularMatrix` instead
    /// of producing garbage if the matrix is singular.
    fn get_solver(&self, matrix: &dyn RealMatrix) -> Result<Box<dyn Solver>>;
}

/// Creates the solver backend selected by `config`.
pub fn from_config(config: &SolverConfig) -> Result<Box<dyn LinearSystemSolver>> {
    let solver = for_backend(config.backend())?;
    info!("Using {:?} linear system solver", solver.backend());
    Ok(solver)
}

pub fn for_backend(backend: Backend) -> Result<Box<dyn LinearSystemSolver>> {
    match backend {
        Backend::Portable => Ok(Box::new(PortableSolver)),
        Backend::Native => native_solver(),
    }
}

#[cfg(feature = "native-math")]
fn native_solver() -> Result<Box<dyn LinearSystemSolver>> {
    Ok(Box::new(NativeSolver))
}

#[cfg(not(feature = "native-math"))]
fn native_solver() -> Result<Box<dyn LinearSystemSolver>> {
    Err(Error::BackendUnavailable(Backend::Native))
}

/// Row-major data and dimension of a square matrix
fn square_data(matrix: &dyn RealMatrix) -> Result<(&[f64], usize)> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    Ok((dense::access_matrix_data_directly(matrix)?, rows))
}

fn check_rhs(dimension: usize, b: &[f64]) -> Result<()> {
    if b.len() != dimension {
        return Err(Error::dimension_mismatch(dimension, b.len()));
    }
    Ok(())
}
