//! Building blocks for alternating least squares: a sparse association matrix indexed by row and
//! by column, kernels which build and apply the small dense normal-equation matrices, and
//! interchangeable solvers for them.

pub mod config;
pub mod dense;
pub mod error;
pub mod format;
pub mod io;
pub mod kernels;
pub mod solver;
pub mod sparse;
pub mod types;


pub use config::SolverConfig;
pub use dense::{DenseMatrix, RealMatrix};
pub use error::{Error, Result};
pub use kernels::{multiply, multiply_parallel, multiply_vector, multiply_xyt, transpose_times_self};
pub use solver::{Backend, LinearSystemSolver, Solver};
pub use sparse::AssociationMatrix;
pub use types::{FactorVectors, Id, SparseRow, SparseRows};
