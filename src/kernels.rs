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

use scoped_pool::Pool;
use tracing::debug;

use crate::dense::{self, DenseMatrix, RealMatrix};
use crate::error::{Error, Result};
use crate::types::{self, FactorVectors, Id};

/// Computes `M * s` for every vector `s` in `vectors`, keyed like the input. Products are
/// accumulated in double precision and stored as floats.
pub fn multiply<M>(matrix: &M, vectors: &FactorVectors) -> Result<FactorVectors>
    where M: RealMatrix + ?Sized {

    let matrix_data = dense::access_matrix_data_directly(matrix)?;
    let (num_rows, num_cols) = (matrix.rows(), matrix.cols());

    let mut result = types::new_factor_vectors(vectors.len());
    for (id, vector) in vectors.iter() {
        result.insert(*id, matrix_multiply(matrix_data, num_rows, num_cols, vector)?);
    }

    Ok(result)
}

/// Same result as `multiply`, computed on `pool_size` threads over disjoint chunks of
/// `vectors`.
pub fn multiply_parallel<M>(
    matrix: &M,
    vectors: &FactorVectors,
    pool_size: usize,
) -> Result<FactorVectors>
    where M: RealMatrix + ?Sized {

    let matrix_data = dense::access_matrix_data_directly(matrix)?;
    let (num_rows, num_cols) = (matrix.rows(), matrix.cols());

    let entries: Vec<(&Id, &Vec<f32>)> = vectors.iter().collect();
    if entries.is_empty() {
        return Ok(types::new_factor_vectors(0));
    }

    let pool_size = pool_size.max(1);
    let chunk_size = (entries.len() + pool_size - 1) / pool_size;
    let chunks: Vec<&[(&Id, &Vec<f32>)]> = entries.chunks(chunk_size).collect();

    debug!("Multiplying {} vectors in {} chunks", entries.len(), chunks.len());

    let mut partial_results: Vec<Result<Vec<(Id, Vec<f32>)>>> =
        chunks.iter().map(|_| Ok(Vec::new())).collect();

    let pool = Pool::new(pool_size);

    pool.scoped(|scope| {
        for (chunk, partial_result) in chunks.iter().zip(partial_results.iter_mut()) {
            scope.execute(move || {
                *partial_result = chunk.iter()
                    .map(|&(id, vector)| {
                        matrix_multiply(matrix_data, num_rows, num_cols, vector)
                            .map(|product| (*id, product))
                    })
                    .collect();
            });
        }
    });

    pool.shutdown();

    let mut result = types::new_factor_vectors(entries.len());
    for partial_result in partial_results {
        result.extend(partial_result?);
    }

    Ok(result)
}

/// Computes `M * v`, returned at double precision
pub fn multiply_vector<M>(matrix: &M, vector: &[f32]) -> Result<Vec<f64>>
    where M: RealMatrix + ?Sized {

    let matrix_data = dense::access_matrix_data_directly(matrix)?;
    let (num_rows, num_cols) = (matrix.rows(), matrix.cols());
    check_length(num_cols, vector)?;

    Ok(matrix_rows(matrix_data, num_rows, num_cols)
        .map(|matrix_row| row_times_vector(matrix_row, vector))
        .collect())
}

/// Computes `Mt * M` for the tall, skinny matrix `M` whose rows are the given vectors, i.e. the
/// sum of the outer products `v * vt`. All vectors need the same length.
///
/// Returns `None` if there are no vectors, as the dimension of the result is then unknown.
pub fn transpose_times_self(vectors: &FactorVectors) -> Option<DenseMatrix> {

    let dimension = vectors.values().next()?.len();
    let mut result = DenseMatrix::zeros(dimension, dimension);
    let result_data = result.data_mut();

    for vector in vectors.values() {
        debug_assert_eq!(vector.len(), dimension);

        for (row, &row_value) in vector.iter().enumerate() {
            let row_value = row_value as f64;
            let result_row = &mut result_data[row * dimension..(row + 1) * dimension];

            for (cell, &col_value) in result_row.iter_mut().zip(vector.iter()) {
                *cell += row_value * col_value as f64;
            }
        }
    }

    Some(result)
}

/// Computes `X * Yt`, whose entry `(i, j)` is the dot product of `x[i]` and `y[j]`.
///
/// # Panics
///
/// Both `x` and `y` must be keyed by the contiguous ids `0..len`; a missing id panics.
pub fn multiply_xyt(x: &FactorVectors, y: &FactorVectors) -> DenseMatrix {

    let num_rows = x.len();
    let num_cols = y.len();
    let mut result = DenseMatrix::zeros(num_rows, num_cols);

    for row in 0..num_rows {
        let x_row = &x[&(row as Id)];
        for col in 0..num_cols {
            result[(row, col)] = dot(x_row, &y[&(col as Id)]);
        }
    }

    result
}

/// Dot product of two float vectors, accumulated in double precision
pub fn dot(x: &[f32], y: &[f32]) -> f64 {
    x.iter().zip(y.iter()).map(|(&a, &b)| a as f64 * b as f64).sum()
}

fn matrix_multiply(
    matrix_data: &[f64],
    num_rows: usize,
    num_cols: usize,
    vector: &[f32],
) -> Result<Vec<f32>> {
    check_length(num_cols, vector)?;

    Ok(matrix_rows(matrix_data, num_rows, num_cols)
        .map(|matrix_row| row_times_vector(matrix_row, vector) as f32)
        .collect())
}

/// Rows of an `num_rows x num_cols` matrix, empty slices if it has no columns
fn matrix_rows<'a>(
    matrix_data: &'a [f64],
    num_rows: usize,
    num_cols: usize,
) -> impl Iterator<Item=&'a [f64]> {
    (0..num_rows).map(move |row| &matrix_data[row * num_cols..(row + 1) * num_cols])
}

#[inline(always)]
fn row_times_vector(matrix_row: &[f64], vector: &[f32]) -> f64 {
    let mut total = 0.0;
    for (&matrix_value, &value) in matrix_row.iter().zip(vector.iter()) {
        total += value as f64 * matrix_value;
    }
    total
}

fn check_length(num_cols: usize, vector: &[f32]) -> Result<()> {
    if vector.len() != num_cols {
        return Err(Error::dimension_mismatch(num_cols, vector.len()));
    }
    Ok(())
}


#[cfg(test)]
mod tests {

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::dense::tests::Diagonal;
    use crate::dense::{DenseMatrix, RealMatrix};
    use crate::error::Error;
    use crate::kernels;
    use crate::types::{self, FactorVectors};

    fn vectors(entries: Vec<(u64, Vec<f32>)>) -> FactorVectors {
        let mut result = types::new_factor_vectors(entries.len());
        result.extend(entries);
        result
    }

    #[test]
    fn transpose_times_self_single_vector() {
        let result = kernels::transpose_times_self(&vectors(vec![(0, vec![1.0, 2.0, 3.0])]))
            .unwrap();

        assert_eq!(result.into_rows(), vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![3.0, 6.0, 9.0],
        ]);
    }

    #[test]
    fn transpose_times_self_sums_outer_products() {
        let result = kernels::transpose_times_self(&vectors(vec![
            (7, vec![1.0, 0.0]),
            (9, vec![1.0, 2.0]),
        ])).unwrap();

        assert_eq!(result.into_rows(), vec![vec![2.0, 2.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn transpose_times_self_without_data() {
        assert!(kernels::transpose_times_self(&types::new_factor_vectors(0)).is_none());
    }

    #[test]
    fn transpose_times_self_accumulates_in_double_precision() {
        // 0.1f32 squared a million times drifts visibly when summed as f32
        let mut many = types::new_factor_vectors(1_000_000);
        for id in 0..1_000_000u64 {
            many.insert(id, vec![0.1]);
        }

        let result = kernels::transpose_times_self(&many).unwrap();
        let expected = 1_000_000.0 * (0.1f32 as f64) * (0.1f32 as f64);

        assert!((result[(0, 0)] - expected).abs() < 1e-3);
    }

    #[test]
    fn multiply_xyt() {
        let x = vectors(vec![(0, vec![1.0, 0.0]), (1, vec![0.0, 1.0])]);
        let y = vectors(vec![(0, vec![2.0, 3.0])]);

        let result = kernels::multiply_xyt(&x, &y);

        assert_eq!(result.rows(), 2);
        assert_eq!(result.cols(), 1);
        assert_eq!(result.into_rows(), vec![vec![2.0], vec![3.0]]);
    }

    #[test]
    fn multiply_vector() {
        let matrix = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![0.5, -1.0], vec![0.0, 3.0]])
            .unwrap();

        let result = kernels::multiply_vector(&matrix, &[2.0, 1.0]).unwrap();

        assert_eq!(result, vec![4.0, 0.0, 3.0]);
    }

    #[test]
    fn multiply_vector_rejects_wrong_length() {
        let matrix = DenseMatrix::identity(3);

        match kernels::multiply_vector(&matrix, &[1.0, 2.0]) {
            Err(Error::DimensionMismatch { expected: 3, actual: 2 }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn multiply_each_vector() {
        let matrix = DenseMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]])
            .unwrap();
        let input = vectors(vec![(3, vec![1.0, 2.0]), (8, vec![-1.0, 4.0])]);

        let result = kernels::multiply(&matrix, &input).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[&3], vec![2.0, 1.0, 3.0]);
        assert_eq!(result[&8], vec![4.0, -1.0, 3.0]);
    }

    #[test]
    fn matrix_without_columns_yields_zero_vectors() {
        let matrix = DenseMatrix::zeros(3, 0);

        let product = kernels::multiply_vector(&matrix, &[]).unwrap();
        assert_eq!(product, vec![0.0; 3]);

        let result = kernels::multiply(&matrix, &vectors(vec![(5, Vec::new())])).unwrap();
        assert_eq!(result[&5], vec![0.0; 3]);

        let result = kernels::multiply_parallel(&matrix, &vectors(vec![(5, Vec::new())]), 2)
            .unwrap();
        assert_eq!(result[&5], vec![0.0; 3]);
    }

    #[test]
    fn kernels_need_row_major_storage() {
        let input = vectors(vec![(0, vec![1.0, 2.0])]);
        let diagonal = Diagonal(vec![1.0, 1.0]);

        assert!(kernels::multiply(&diagonal, &input).is_err());
        assert!(kernels::multiply_parallel(&diagonal, &input, 2).is_err());
        assert!(kernels::multiply_vector(&diagonal, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn parallel_multiply_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(7);

        let k = 5;
        let rows: Vec<Vec<f64>> = (0..k)
            .map(|_| (0..k).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let matrix = DenseMatrix::from_rows(&rows).unwrap();

        let mut input = types::new_factor_vectors(1_000);
        for _ in 0..1_000 {
            let id = rng.gen::<u64>();
            input.insert(id, (0..k).map(|_| rng.gen_range(-1.0..1.0)).collect());
        }

        let sequential = kernels::multiply(&matrix, &input).unwrap();

        for &pool_size in &[1, 3, 8] {
            let parallel = kernels::multiply_parallel(&matrix, &input, pool_size).unwrap();
            assert_eq!(parallel, sequential);
        }
    }

    #[test]
    fn dot_product() {
        assert_eq!(kernels::dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
        assert_eq!(kernels::dot(&[], &[]), 0.0);
    }
}
