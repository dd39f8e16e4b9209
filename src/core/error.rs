// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for the cache/processor simulator
//!
//! The simulator's failure surface is deliberately narrow (see the design
//! notes on error handling): almost everything fails at the boundary,
//! before the cache engine and interpreter ever run.

use std::fmt;

/// Convenience alias used throughout `core`.
pub type Result<T> = std::result::Result<T, SimError>;

/// All ways the simulator can fail.
///
/// Configuration errors are reported as distinct variants (rather than a
/// single string) so the CLI layer can re-prompt for exactly the field(s)
/// at fault.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A geometry parameter was zero or not a power of two.
    #[error("{field} must be a positive power of two, got {value}")]
    NotPowerOfTwo {
        /// Which geometry field failed validation.
        field: GeometryField,
        /// The rejected value.
        value: i64,
    },

    /// `number_of_sets * associativity` exceeded the capacity cap.
    #[error("number_of_sets ({sets}) * associativity ({ways}) = {product} exceeds the cap of {cap}")]
    CapacityExceeded {
        /// Requested number of sets.
        sets: u32,
        /// Requested associativity.
        ways: u32,
        /// `sets * ways`.
        product: u64,
        /// The maximum allowed product.
        cap: u64,
    },

    /// The machine-code file could not be opened.
    #[error("cannot open file '{path}': {source}")]
    FileOpen {
        /// Path the caller attempted to open.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure (writing the trace, reading a line, etc.).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which cache geometry parameter a [`SimError::NotPowerOfTwo`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryField {
    /// Block size, in words.
    BlockSize,
    /// Number of sets.
    NumberOfSets,
    /// Associativity (ways per set).
    Associativity,
}

impl fmt::Display for GeometryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryField::BlockSize => "block size",
            GeometryField::NumberOfSets => "number of sets",
            GeometryField::Associativity => "associativity",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_power_of_two_message_names_the_field() {
        let err = SimError::NotPowerOfTwo {
            field: GeometryField::BlockSize,
            value: 3,
        };
        assert_eq!(
            err.to_string(),
            "block size must be a positive power of two, got 3"
        );
    }

    #[test]
    fn capacity_exceeded_message_reports_product_and_cap() {
        let err = SimError::CapacityExceeded {
            sets: 32,
            ways: 16,
            product: 512,
            cap: 256,
        };
        assert_eq!(
            err.to_string(),
            "number_of_sets (32) * associativity (16) = 512 exceeds the cap of 256"
        );
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let sim_err: SimError = io_err.into();
        assert!(matches!(sim_err, SimError::Io(_)));
    }
}
