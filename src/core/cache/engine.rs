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

//! The cache engine: `read`, `write`, and `flush` (§4.3)
//!
//! This is the core of the simulator. It owns the [`CacheArray`], knows
//! nothing about the CPU beyond "give me an address" / "here is a
//! value", and mutates [`Memory`] only on fills, write-backs, and the
//! halt-time flush. It is generic over its trace sink (`W: Write`) so
//! tests can capture output in a `Vec<u8>` instead of stdout, per the
//! "pure and easily mockable" design note.

use super::action::{log_action, ActionKind};
use super::array::CacheArray;
use crate::core::address::{self, CacheGeometry};
use crate::core::memory::Memory;
use std::io::Write;

/// Write-back, write-allocate set-associative cache.
pub struct CacheEngine<W: Write> {
    geometry: CacheGeometry,
    array: CacheArray,
    sink: W,
}

impl<W: Write> CacheEngine<W> {
    /// Build an empty cache over `geometry`, logging trace lines to `sink`.
    pub fn new(geometry: CacheGeometry, sink: W) -> Self {
        Self {
            array: CacheArray::new(&geometry),
            geometry,
            sink,
        }
    }

    /// The geometry this cache was built with.
    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Borrow the trace sink (used by callers that need to inspect
    /// captured output, e.g. an in-memory `Vec<u8>` in tests).
    pub(crate) fn sink(&self) -> &W {
        &self.sink
    }

    /// Read the word at `address`, filling or evicting as needed (§4.3).
    pub fn read(&mut self, memory: &mut Memory, address: u32) -> std::io::Result<i32> {
        let way = self.service(memory, address)?;
        let set = address::set_index(address, &self.geometry);
        log_action(&mut self.sink, address, 1, ActionKind::CacheToProcessor)?;
        Ok(self.array.entry(set, way).word(address::offset(address, &self.geometry)))
    }

    /// Write `value` to `address`, filling (write-allocate) first on a
    /// miss, then marking the entry dirty (§4.3).
    pub fn write(&mut self, memory: &mut Memory, address: u32, value: i32) -> std::io::Result<()> {
        let way = self.service(memory, address)?;
        let set = address::set_index(address, &self.geometry);
        let offset = address::offset(address, &self.geometry);
        let entry = self.array.entry_mut(set, way);
        entry.set_dirty(true);
        entry.set_word(offset, value);
        log_action(&mut self.sink, address, 1, ActionKind::ProcessorToCache)
    }

    /// Write back every dirty way and invalidate everything (§4.3,
    /// called exactly once, on HALT).
    pub fn flush(&mut self, memory: &mut Memory) -> std::io::Result<()> {
        let block_size = self.geometry.block_size();
        let sets = self.array.number_of_sets();
        let ways = self.array.associativity();
        for set in 0..sets {
            for way in 0..ways {
                let entry = self.array.entry_mut(set, way);
                if entry.dirty() {
                    let base = entry.base_address();
                    memory.write_block(base, entry.data());
                    log_action(&mut self.sink, base, block_size, ActionKind::CacheToMemory)?;
                    entry.set_dirty(false);
                }
                entry.invalidate();
            }
        }
        Ok(())
    }

    /// Age every valid way in the target set, locate-or-allocate a way
    /// for `address` (possibly evicting and/or filling), then mark it
    /// valid for this access. Returns the way index. Steps 1–4 of both
    /// `read` and `write` (§4.3).
    fn service(&mut self, memory: &mut Memory, address: u32) -> std::io::Result<u32> {
        let set = address::set_index(address, &self.geometry);
        let tag = address::tag(address, &self.geometry);
        let base = address::block_base(address, &self.geometry);

        self.bump_ages(set);
        let way = self.locate_or_allocate(memory, set, tag, base)?;
        self.array.entry_mut(set, way).touch(tag);
        Ok(way)
    }

    fn bump_ages(&mut self, set: u32) {
        for way in 0..self.array.associativity() {
            let entry = self.array.entry_mut(set, way);
            if entry.valid() {
                entry.bump_age();
            }
        }
    }

    /// §4.3.1: hit scan, then empty scan, then LRU eviction — each in
    /// ascending way order, returning as soon as a candidate is found.
    fn locate_or_allocate(
        &mut self,
        memory: &mut Memory,
        set: u32,
        tag: u32,
        base: u32,
    ) -> std::io::Result<u32> {
        let ways = self.array.associativity();

        for way in 0..ways {
            let entry = self.array.entry(set, way);
            if entry.valid() && entry.tag() == tag {
                return Ok(way);
            }
        }

        for way in 0..ways {
            if !self.array.entry(set, way).valid() {
                self.fill(memory, set, way, base)?;
                return Ok(way);
            }
        }

        let victim = self.find_lru(set);
        self.evict(memory, set, victim)?;
        self.fill(memory, set, victim, base)?;
        Ok(victim)
    }

    /// The valid way with the greatest age; ties go to the lowest index.
    fn find_lru(&self, set: u32) -> u32 {
        let ways = self.array.associativity();
        let mut best_way = 0;
        let mut best_age = self.array.entry(set, 0).age();
        for way in 1..ways {
            let age = self.array.entry(set, way).age();
            if age > best_age {
                best_age = age;
                best_way = way;
            }
        }
        best_way
    }

    fn evict(&mut self, memory: &mut Memory, set: u32, way: u32) -> std::io::Result<()> {
        let block_size = self.geometry.block_size();
        let entry = self.array.entry_mut(set, way);
        let base = entry.base_address();
        if entry.dirty() {
            memory.write_block(base, entry.data());
            entry.set_dirty(false);
            log_action(&mut self.sink, base, block_size, ActionKind::CacheToMemory)
        } else {
            log_action(&mut self.sink, base, block_size, ActionKind::CacheToNowhere)
        }
    }

    fn fill(&mut self, memory: &mut Memory, set: u32, way: u32, base: u32) -> std::io::Result<()> {
        let block_size = self.geometry.block_size();
        log_action(&mut self.sink, base, block_size, ActionKind::MemoryToCache)?;
        let mut block = vec![0i32; block_size as usize];
        memory.read_block(base, &mut block);
        self.array.entry_mut(set, way).fill(base, &block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::CacheGeometry;

    fn engine(block: u32, sets: u32, ways: u32) -> CacheEngine<Vec<u8>> {
        let geom = CacheGeometry::new(block, sets, ways).unwrap();
        CacheEngine::new(geom, Vec::new())
    }

    fn lines(engine: &CacheEngine<Vec<u8>>) -> Vec<String> {
        String::from_utf8(engine.sink.clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn read_miss_fills_then_returns_to_processor() {
        let mut mem = Memory::new();
        mem.write(100, 7);
        let mut cache = engine(1, 1, 1);

        let value = cache.read(&mut mem, 100).unwrap();
        assert_eq!(value, 7);
        assert_eq!(
            lines(&cache),
            vec![
                "transferring word [100-100] from the memory to the cache",
                "transferring word [100-100] from the cache to the processor",
            ]
        );
    }

    #[test]
    fn p7_second_read_is_a_hit_with_no_further_fill() {
        let mut mem = Memory::new();
        mem.write(0, 9);
        let mut cache = engine(1, 1, 2);

        cache.read(&mut mem, 0).unwrap();
        cache.read(&mut mem, 0).unwrap();

        let lines = lines(&cache);
        assert_eq!(lines.iter().filter(|l| l.contains("memory to the cache")).count(), 1);
        assert_eq!(
            lines.iter().filter(|l| l.contains("cache to the processor")).count(),
            2
        );
    }

    #[test]
    fn p8_store_then_load_returns_stored_value_without_extra_fill() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 1);

        cache.write(&mut mem, 50, 123).unwrap();
        let value = cache.read(&mut mem, 50).unwrap();

        assert_eq!(value, 123);
        let lines = lines(&cache);
        assert_eq!(lines.iter().filter(|l| l.contains("memory to the cache")).count(), 1);
    }

    #[test]
    fn scenario_c_write_conflict_causes_dirty_writeback() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 1);

        cache.write(&mut mem, 100, 11).unwrap();
        cache.write(&mut mem, 200, 22).unwrap();

        assert_eq!(
            lines(&cache),
            vec![
                "transferring word [100-100] from the memory to the cache",
                "transferring word [100-100] from the processor to the cache",
                "transferring word [100-100] from the cache to the memory",
                "transferring word [200-200] from the memory to the cache",
                "transferring word [200-200] from the processor to the cache",
            ]
        );
        assert_eq!(mem.read(100), 11);
    }

    #[test]
    fn scenario_d_clean_eviction_is_thrown_away() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 1);

        cache.read(&mut mem, 100).unwrap();
        cache.read(&mut mem, 200).unwrap();

        assert_eq!(
            lines(&cache),
            vec![
                "transferring word [100-100] from the memory to the cache",
                "transferring word [100-100] from the cache to the processor",
                "transferring word [100-100] from the cache to nowhere",
                "transferring word [200-200] from the memory to the cache",
                "transferring word [200-200] from the cache to the processor",
            ]
        );
    }

    #[test]
    fn scenario_e_flush_writes_back_all_dirty_blocks_in_order() {
        let mut mem = Memory::new();
        let mut cache = engine(4, 1, 2);

        cache.write(&mut mem, 0, 1).unwrap();
        cache.write(&mut mem, 4, 2).unwrap();
        cache.flush(&mut mem).unwrap();

        let flush_lines: Vec<String> = lines(&cache)
            .into_iter()
            .filter(|l| l.contains("cache to the memory"))
            .collect();
        assert_eq!(
            flush_lines,
            vec![
                "transferring word [0-3] from the cache to the memory",
                "transferring word [4-7] from the cache to the memory",
            ]
        );
        assert_eq!(mem.read(0), 1);
        assert_eq!(mem.read(4), 2);
    }

    #[test]
    fn flush_emits_no_cache_to_nowhere_for_clean_entries() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 2);

        cache.read(&mut mem, 1).unwrap();
        cache.flush(&mut mem).unwrap();

        assert!(!lines(&cache).iter().any(|l| l.contains("nowhere")));
    }

    #[test]
    fn p9_direct_mapped_evicts_on_every_conflict() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 4, 1);

        // Same set (set = addr % 4 == 0), different tags: conflict every time.
        for addr in [0u32, 4, 8, 12] {
            cache.read(&mut mem, addr).unwrap();
        }

        let evictions = lines(&cache)
            .into_iter()
            .filter(|l| l.contains("nowhere") || l.contains("cache to the memory"))
            .count();
        assert_eq!(evictions, 3); // first fill has nothing to evict
    }

    #[test]
    fn p10_fully_associative_within_capacity_has_no_evictions() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 4);

        for addr in [0u32, 1, 2, 3] {
            cache.read(&mut mem, addr).unwrap();
        }

        assert!(!lines(&cache)
            .iter()
            .any(|l| l.contains("nowhere") || l.contains("cache to the memory")));
    }

    #[test]
    fn p11_block_size_one_produces_single_word_ranges() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 2, 1);
        cache.read(&mut mem, 3).unwrap();
        for line in lines(&cache) {
            if line.contains("cache") {
                assert!(line.contains("[3-3]"));
            }
        }
    }

    #[test]
    fn scenario_f_lru_tie_evicts_lowest_index_first() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 2);

        cache.read(&mut mem, 10).unwrap(); // way 0
        cache.read(&mut mem, 20).unwrap(); // way 1, both ages equal at this point
        cache.read(&mut mem, 30).unwrap(); // forces eviction; way 0 should go

        let lines = lines(&cache);
        assert!(lines
            .iter()
            .any(|l| l.contains("[10-10]") && l.contains("nowhere")));
    }

    #[test]
    fn invariant_tag_and_set_match_base_address() {
        let geom = CacheGeometry::new(4, 8, 2).unwrap();
        let mut mem = Memory::new();
        let mut cache = CacheEngine::new(geom, Vec::new());

        for addr in [0u32, 4, 100, 65532] {
            cache.read(&mut mem, addr).unwrap();
        }

        for set in 0..cache.array.number_of_sets() {
            for way in 0..cache.array.associativity() {
                let entry = cache.array.entry(set, way);
                if entry.valid() {
                    assert_eq!(entry.base_address() % 4, 0);
                    assert_eq!(
                        entry.tag(),
                        entry.base_address() >> (cache.geometry.offset_bits() + cache.geometry.set_bits())
                    );
                }
            }
        }
    }

    #[test]
    fn p3_dirty_implies_valid_after_write() {
        let mut mem = Memory::new();
        let mut cache = engine(1, 1, 1);
        cache.write(&mut mem, 5, 1).unwrap();
        let entry = cache.array.entry(0, 0);
        assert!(entry.dirty());
        assert!(entry.valid());
    }
}
