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

use fnv::FnvHashMap;

/// Identifier of a user, an item or any other row/column of an association matrix
pub type Id = u64;

pub type SparseRow = FnvHashMap<Id, f32>;
pub type SparseRows = FnvHashMap<Id, SparseRow>;

/// Latent factor vectors keyed by id, all of the same length
pub type FactorVectors = FnvHashMap<Id, Vec<f32>>;

pub fn new_sparse_row(capacity: usize) -> SparseRow {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}

pub fn new_sparse_rows(capacity: usize) -> SparseRows {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}

pub fn new_factor_vectors(capacity: usize) -> FactorVectors {
    FnvHashMap::with_capacity_and_hasher(capacity, Default::default())
}
