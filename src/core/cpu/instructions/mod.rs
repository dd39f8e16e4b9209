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

//! Per-opcode execution, split the way the instruction set groups
//! naturally: arithmetic (ADD/NAND) on registers only, and the shared
//! effective-address arithmetic that LW/SW/BEQ/JALR need from the
//! system loop. Branch and jump targets are computed directly in the
//! fetch-execute loop (§4.4) since they mutate `pc`, not a register.

mod arithmetic;
mod memory;

pub(crate) use arithmetic::{exec_add, exec_nand};
pub(crate) use memory::effective_address;
