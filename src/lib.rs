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

//! cachetrace: a set-associative cache simulator for a small load/store ISA
//!
//! This crate simulates a load/store RISC-style processor paired with a
//! configurable write-back, write-allocate CPU cache, emitting a trace
//! of every data transfer between processor, cache, and main memory.
//!
//! # Architecture
//!
//! - [`core::address`]: pure tag/set/offset address decomposition
//! - [`core::cache`]: the set-associative array, the LRU/write-back
//!   engine, and the action trace logger
//! - [`core::memory`]: flat main memory and the machine-code loader
//! - [`core::cpu`]: machine state and instruction decode
//! - [`core::system`]: the fetch-decode-execute loop tying it together
//!
//! # Example
//!
//! ```no_run
//! use cachetrace::core::address::CacheGeometry;
//! use cachetrace::core::memory::{load_program, Memory};
//! use cachetrace::core::system::System;
//!
//! let geometry = CacheGeometry::new(4, 8, 2)?;
//! let mut memory = Memory::new();
//! load_program("program.txt", &mut memory)?;
//!
//! let mut system = System::new(geometry, memory, std::io::stdout());
//! system.run()?;
//! # Ok::<(), cachetrace::SimError>(())
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`core::error::Result<T>`], an alias
//! for `Result<T, SimError>`.

pub mod core;

// Re-export commonly used types
pub use core::error::{Result, SimError};
