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

//! The action logger (§4.3.2)
//!
//! The five action kinds form a closed tagged variant. Formatting is a
//! pure function from (address, size, kind) to a line of text, kept
//! separate from wherever that line ends up being written so trace
//! assertions never need a real file or stdout (§9).

use std::fmt;

/// One of the five data-transfer kinds the cache engine can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Cache → processor (a read hit or a miss once filled).
    CacheToProcessor,
    /// Processor → cache (a write).
    ProcessorToCache,
    /// Memory → cache (a fill on miss).
    MemoryToCache,
    /// Cache → memory (a dirty write-back on eviction or flush).
    CacheToMemory,
    /// Cache → nowhere (a clean eviction, discarded).
    CacheToNowhere,
}

impl ActionKind {
    fn suffix(self) -> &'static str {
        match self {
            ActionKind::CacheToProcessor => "from the cache to the processor",
            ActionKind::ProcessorToCache => "from the processor to the cache",
            ActionKind::MemoryToCache => "from the memory to the cache",
            ActionKind::CacheToMemory => "from the cache to the memory",
            ActionKind::CacheToNowhere => "from the cache to nowhere",
        }
    }
}

/// A single formatted trace line: `transferring word [low-high] <suffix>`.
pub struct Action {
    address: u32,
    size: u32,
    kind: ActionKind,
}

impl Action {
    /// Describe a transfer of `size` words starting at `address`.
    pub fn new(address: u32, size: u32, kind: ActionKind) -> Self {
        Self {
            address,
            size,
            kind,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let high = self.address + self.size - 1;
        write!(
            f,
            "transferring word [{}-{}] {}",
            self.address,
            high,
            self.kind.suffix()
        )
    }
}

/// Write one trace line (with trailing `\n`) to `sink`.
pub fn log_action(
    sink: &mut impl std::io::Write,
    address: u32,
    size: u32,
    kind: ActionKind,
) -> std::io::Result<()> {
    writeln!(sink, "{}", Action::new(address, size, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_single_word_transfer() {
        let line = Action::new(42, 1, ActionKind::CacheToProcessor).to_string();
        assert_eq!(line, "transferring word [42-42] from the cache to the processor");
    }

    #[test]
    fn formats_block_transfer_range() {
        let line = Action::new(8, 4, ActionKind::MemoryToCache).to_string();
        assert_eq!(line, "transferring word [8-11] from the memory to the cache");
    }

    #[test]
    fn all_five_suffixes_are_distinct() {
        let kinds = [
            ActionKind::CacheToProcessor,
            ActionKind::ProcessorToCache,
            ActionKind::MemoryToCache,
            ActionKind::CacheToMemory,
            ActionKind::CacheToNowhere,
        ];
        let suffixes: Vec<&str> = kinds.iter().map(|k| k.suffix()).collect();
        let mut deduped = suffixes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(suffixes.len(), deduped.len());
    }

    #[test]
    fn log_action_writes_lf_terminated_line() {
        let mut buf = Vec::new();
        log_action(&mut buf, 0, 1, ActionKind::ProcessorToCache).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "transferring word [0-0] from the processor to the cache\n"
        );
    }
}
