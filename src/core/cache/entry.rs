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

//! A single cache way (§3: Cache Array)

/// One way within a set: a valid bit, a dirty bit, a tag, the
/// block-aligned base address it holds, an LRU age, and the resident
/// block's data.
#[derive(Debug, Clone)]
pub struct Entry {
    valid: bool,
    dirty: bool,
    tag: u32,
    base_address: u32,
    age: u32,
    data: Vec<i32>,
}

impl Entry {
    /// An invalid, empty entry holding `block_size` words.
    pub fn new(block_size: u32) -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: 0,
            base_address: 0,
            age: 0,
            data: vec![0; block_size as usize],
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn bump_age(&mut self) {
        self.age += 1;
    }

    pub fn word(&self, offset: u32) -> i32 {
        self.data[offset as usize]
    }

    pub fn set_word(&mut self, offset: u32, value: i32) {
        self.data[offset as usize] = value;
    }

    /// Replace the resident block: mark valid, clean, reset age, and set
    /// tag/base_address/data from a fresh fill. Called after a fill
    /// completes; dirty/tag/valid/age are the caller's responsibility
    /// to finish setting per §4.3.1.
    pub fn fill(&mut self, base_address: u32, data: &[i32]) {
        self.base_address = base_address;
        self.data.copy_from_slice(data);
        self.dirty = false;
    }

    /// Finalize an access: mark valid with `tag`, reset age to 0.
    pub fn touch(&mut self, tag: u32) {
        self.valid = true;
        self.tag = tag;
        self.age = 0;
    }

    /// Invalidate this entry (used by `flush`).
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.dirty = false;
    }
}
