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

use std::env;

use serde_derive::Deserialize;

use crate::error::{Error, Result};
use crate::solver::Backend;

pub const NATIVE_MATH_VAR: &str = "ALSMATH_NATIVE_MATH";
pub const THREADS_VAR: &str = "ALSMATH_THREADS";

/// Startup configuration. It is read once and the solver backend chosen from it stays fixed for
/// the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Use the faer backed solver instead of the portable one
    pub native_math: bool,
    /// Worker threads for parallel kernels, defaults to the number of CPUs
    pub threads: Option<usize>,
}

impl SolverConfig {

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_env() -> Result<Self> {
        SolverConfig::from_vars(|name| env::var(name).ok())
    }

    fn from_vars<F>(lookup: F) -> Result<Self>
        where F: Fn(&'static str) -> Option<String> {

        let native_math = match lookup(NATIVE_MATH_VAR) {
            Some(value) => parse_var(NATIVE_MATH_VAR, value)?,
            None => false,
        };

        let threads = match lookup(THREADS_VAR) {
            Some(value) => Some(parse_var(THREADS_VAR, value)?),
            None => None,
        };

        Ok(SolverConfig { native_math, threads })
    }

    pub fn backend(&self) -> Backend {
        if self.native_math { Backend::Native } else { Backend::Portable }
    }

    pub fn num_threads(&self) -> usize {
        match self.threads {
            Some(threads) if threads > 0 => threads,
            _ => num_cpus::get(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T> {
    value.trim().to_lowercase().parse()
        .map_err(|_| Error::InvalidEnv { name, value })
}
