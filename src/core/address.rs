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

//! Cache geometry and address decomposition
//!
//! A [`CacheGeometry`] is the validated, derived form of the three raw
//! parameters (block size, number of sets, associativity) that a caller
//! supplies. Once constructed it cannot describe an invalid cache: every
//! field is a positive power of two and the total entry count never
//! exceeds the configured cap.
//!
//! Address decomposition (tag / set / offset) is kept as free functions
//! operating on a `&CacheGeometry` rather than methods with hidden state,
//! so they stay pure and trivially testable.

use crate::core::error::{GeometryField, Result, SimError};

/// The capacity cap enforced by the boundary (`number_of_sets * associativity`).
pub const MAX_ENTRIES: u64 = 256;

/// Validated cache geometry: block size, set count, and associativity,
/// plus their derived bit widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    block_size: u32,
    number_of_sets: u32,
    associativity: u32,
    offset_bits: u32,
    set_bits: u32,
    tag_bits: u32,
}

impl CacheGeometry {
    /// Validate and construct a cache geometry.
    ///
    /// All three parameters must be positive powers of two, and
    /// `number_of_sets * associativity` must not exceed [`MAX_ENTRIES`].
    ///
    /// # Example
    /// ```
    /// use cachetrace::core::address::CacheGeometry;
    ///
    /// let geom = CacheGeometry::new(4, 8, 2).unwrap();
    /// assert_eq!(geom.block_size(), 4);
    /// ```
    pub fn new(block_size: u32, number_of_sets: u32, associativity: u32) -> Result<Self> {
        require_power_of_two(GeometryField::BlockSize, block_size)?;
        require_power_of_two(GeometryField::NumberOfSets, number_of_sets)?;
        require_power_of_two(GeometryField::Associativity, associativity)?;

        let product = u64::from(number_of_sets) * u64::from(associativity);
        if product > MAX_ENTRIES {
            return Err(SimError::CapacityExceeded {
                sets: number_of_sets,
                ways: associativity,
                product,
                cap: MAX_ENTRIES,
            });
        }

        let offset_bits = block_size.trailing_zeros();
        let set_bits = number_of_sets.trailing_zeros();
        let tag_bits = 32 - offset_bits - set_bits;

        Ok(Self {
            block_size,
            number_of_sets,
            associativity,
            offset_bits,
            set_bits,
            tag_bits,
        })
    }

    /// Block size in words.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Number of sets.
    pub fn number_of_sets(&self) -> u32 {
        self.number_of_sets
    }

    /// Ways per set.
    pub fn associativity(&self) -> u32 {
        self.associativity
    }

    /// `log2(block_size)`.
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// `log2(number_of_sets)`.
    pub fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// `32 - offset_bits - set_bits`.
    pub fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Total number of cache entries (`number_of_sets * associativity`).
    pub fn capacity(&self) -> u32 {
        self.number_of_sets * self.associativity
    }
}

fn require_power_of_two(field: GeometryField, value: u32) -> Result<()> {
    if value == 0 || !value.is_power_of_two() {
        return Err(SimError::NotPowerOfTwo {
            field,
            value: i64::from(value),
        });
    }
    Ok(())
}

/// The word offset within a block: `address mod block_size`.
#[inline]
pub fn offset(address: u32, geom: &CacheGeometry) -> u32 {
    address & (geom.block_size - 1)
}

/// The set index: `(address / block_size) mod number_of_sets`.
///
/// Returns 0 unconditionally when `number_of_sets == 1` (fully associative).
#[inline]
pub fn set_index(address: u32, geom: &CacheGeometry) -> u32 {
    if geom.number_of_sets == 1 {
        return 0;
    }
    (address >> geom.offset_bits) & (geom.number_of_sets - 1)
}

/// The tag: the high-order bits once offset and set bits are stripped.
#[inline]
pub fn tag(address: u32, geom: &CacheGeometry) -> u32 {
    address >> (geom.offset_bits + geom.set_bits)
}

/// The block-aligned base address containing `address`.
#[inline]
pub fn block_base(address: u32, geom: &CacheGeometry) -> u32 {
    address & !(geom.block_size - 1)
}
