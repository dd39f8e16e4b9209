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

//! The set-associative storage array (§4.2)
//!
//! Purely a data container: `number_of_sets * associativity` entries,
//! laid out as a flat `Vec<Entry>` indexed by `set * associativity +
//! way` rather than the source's nested set/way pointer graph (§9).

use super::entry::Entry;
use crate::core::address::CacheGeometry;

/// `number_of_sets * associativity` entries in a flat arena, each
/// holding `block_size` words.
pub struct CacheArray {
    associativity: u32,
    entries: Vec<Entry>,
}

impl CacheArray {
    /// Allocate `number_of_sets * associativity` invalid, zeroed entries.
    pub fn new(geom: &CacheGeometry) -> Self {
        let total = geom.capacity() as usize;
        Self {
            associativity: geom.associativity(),
            entries: (0..total).map(|_| Entry::new(geom.block_size())).collect(),
        }
    }

    fn index(&self, set: u32, way: u32) -> usize {
        (set * self.associativity + way) as usize
    }

    /// Immutable access to way `way` of set `set`.
    pub fn entry(&self, set: u32, way: u32) -> &Entry {
        &self.entries[self.index(set, way)]
    }

    /// Mutable access to way `way` of set `set`.
    pub fn entry_mut(&mut self, set: u32, way: u32) -> &mut Entry {
        let idx = self.index(set, way);
        &mut self.entries[idx]
    }

    /// Number of ways per set.
    pub fn associativity(&self) -> u32 {
        self.associativity
    }

    /// Number of sets.
    pub fn number_of_sets(&self) -> u32 {
        (self.entries.len() as u32) / self.associativity.max(1)
    }

    /// Iterate every (set, way, entry) in ascending (set, way) order —
    /// the order `flush` must use (§4.3).
    pub fn iter_in_order(&self) -> impl Iterator<Item = (u32, u32, &Entry)> {
        let associativity = self.associativity;
        self.entries.iter().enumerate().map(move |(idx, entry)| {
            let idx = idx as u32;
            (idx / associativity, idx % associativity, entry)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(block_size: u32, sets: u32, ways: u32) -> CacheGeometry {
        CacheGeometry::new(block_size, sets, ways).unwrap()
    }

    #[test]
    fn allocates_all_entries_invalid() {
        let array = CacheArray::new(&geom(4, 8, 2));
        assert_eq!(array.number_of_sets(), 8);
        assert_eq!(array.associativity(), 2);
        for set in 0..8 {
            for way in 0..2 {
                assert!(!array.entry(set, way).valid());
            }
        }
    }

    #[test]
    fn entries_are_independently_addressable() {
        let mut array = CacheArray::new(&geom(1, 2, 2));
        array.entry_mut(0, 0).touch(10);
        array.entry_mut(0, 1).touch(20);
        array.entry_mut(1, 0).touch(30);

        assert_eq!(array.entry(0, 0).tag(), 10);
        assert_eq!(array.entry(0, 1).tag(), 20);
        assert_eq!(array.entry(1, 0).tag(), 30);
        assert!(!array.entry(1, 1).valid());
    }

    #[test]
    fn iter_in_order_visits_sets_then_ways_ascending() {
        let array = CacheArray::new(&geom(1, 2, 3));
        let order: Vec<(u32, u32)> = array.iter_in_order().map(|(s, w, _)| (s, w)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }
}
