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

use thiserror::Error;

use crate::solver::Backend;

/// Result type alias using alsmath's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a matrix operation
#[derive(Error, Debug)]
pub enum Error {
    /// Factorization was requested for a matrix without a unique solution
    #[error("Matrix of dimension {dimension} is singular")]
    SingularMatrix {
        /// Number of rows (and columns) of the matrix
        dimension: usize,
    },

    /// Linear systems can only be built from square matrices
    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare {
        rows: usize,
        cols: usize,
    },

    /// The dense matrix does not expose a row-major buffer
    #[error("Matrix {rows}x{cols} has no directly accessible row-major storage")]
    IncompatibleStorage {
        rows: usize,
        cols: usize,
    },

    /// Vector length does not match the matrix it is used with
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// The configured solver backend is not compiled into this build
    #[error("Solver backend {0:?} is not available in this build")]
    BackendUnavailable(Backend),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid value {value:?} for environment variable {name}")]
    InvalidEnv {
        name: &'static str,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}
