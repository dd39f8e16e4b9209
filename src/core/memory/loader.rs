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

//! The machine-code loader (§4.6, §6.3)
//!
//! Reads one decimal integer per line into memory starting at word 0.
//! This is boundary I/O: the only failure it can report is "the file
//! would not open". Once open, every line is accepted — a line with no
//! parseable leading integer contributes `0`, mirroring `atoi`'s
//! permissiveness in the reference implementation.

use super::{Memory, NUM_MEMORY};
use crate::core::error::{Result, SimError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a machine-code file into `memory`, starting at word 0.
///
/// Returns the number of lines read (capped at [`NUM_MEMORY`]).
pub fn load_program(path: impl AsRef<Path>, memory: &mut Memory) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SimError::FileOpen {
        path: path.display().to_string(),
        source,
    })?;

    let mut count = 0usize;
    for line in BufReader::new(file).lines() {
        if count >= NUM_MEMORY {
            break;
        }
        let line = line?;
        memory.write(count as u32, parse_word(&line));
        count += 1;
    }

    memory.set_num_memory(count);
    log::info!("loaded {count} word(s) from {}", path.display());
    Ok(count)
}

/// Parse a line as a signed 32-bit decimal word, `atoi`-style: skip
/// leading whitespace, take an optional sign and the run of digits that
/// follows, and stop at the first non-digit. A line with no leading
/// digits parses as `0`.
fn parse_word(line: &str) -> i32 {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars().peekable();

    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let digits: String = chars.take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }

    let magnitude: i64 = digits.parse().unwrap_or(i64::MAX);
    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parses_plain_decimal_lines() {
        let file = write_temp("1\n2\n3\n");
        let mut mem = Memory::new();
        let count = load_program(file.path(), &mut mem).unwrap();
        assert_eq!(count, 3);
        assert_eq!(mem.read(0), 1);
        assert_eq!(mem.read(1), 2);
        assert_eq!(mem.read(2), 3);
    }

    #[test]
    fn honors_leading_sign() {
        let file = write_temp("-5\n+7\n");
        let mut mem = Memory::new();
        load_program(file.path(), &mut mem).unwrap();
        assert_eq!(mem.read(0), -5);
        assert_eq!(mem.read(1), 7);
    }

    #[test]
    fn malformed_line_parses_as_zero() {
        let file = write_temp("abc\n42\n");
        let mut mem = Memory::new();
        let count = load_program(file.path(), &mut mem).unwrap();
        assert_eq!(count, 2);
        assert_eq!(mem.read(0), 0);
        assert_eq!(mem.read(1), 42);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut mem = Memory::new();
        let err = load_program("/nonexistent/path/does/not/exist.txt", &mut mem).unwrap_err();
        assert!(matches!(err, SimError::FileOpen { .. }));
    }

    #[test]
    fn records_num_memory() {
        let file = write_temp("1\n2\n3\n4\n5\n");
        let mut mem = Memory::new();
        load_program(file.path(), &mut mem).unwrap();
        assert_eq!(mem.num_memory(), 5);
    }

    #[test]
    fn leaves_untouched_words_zero() {
        let file = write_temp("99\n");
        let mut mem = Memory::new();
        load_program(file.path(), &mut mem).unwrap();
        assert_eq!(mem.read(0), 99);
        assert_eq!(mem.read(1), 0);
    }
}
