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

//! System integration: ties the CPU, main memory, and cache engine
//! together and drives the fetch-decode-execute loop (§4.4).

use crate::core::address::CacheGeometry;
use crate::core::cache::CacheEngine;
use crate::core::cpu::{self, Cpu, Instruction};
use crate::core::memory::Memory;
use std::io::Write;

/// The whole machine: registers, main memory, and the cache that sits
/// between them and the interpreter.
pub struct System<W: Write> {
    cpu: Cpu,
    memory: Memory,
    cache: CacheEngine<W>,
    instructions_executed: u64,
}

impl<W: Write> System<W> {
    /// Build a system with a fresh CPU and zeroed memory over `geometry`,
    /// logging every cache action to `sink`.
    pub fn new(geometry: CacheGeometry, memory: Memory, sink: W) -> Self {
        Self {
            cpu: Cpu::new(),
            memory,
            cache: CacheEngine::new(geometry, sink),
            instructions_executed: 0,
        }
    }

    /// Current program counter.
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Number of instructions retired so far (HALT itself is counted).
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    /// Shared access to main memory (for loading programs before `run`).
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Run until HALT, flushing the cache exactly once before returning
    /// (§4.4's state machine: `Running` → `Halted`).
    pub fn run(&mut self) -> std::io::Result<()> {
        loop {
            let pc = self.cpu.pc();
            let word = self.cache.read(&mut self.memory, pc)?;
            let instruction = cpu::decode(word);

            if matches!(instruction, Instruction::Halt) {
                self.cache.flush(&mut self.memory)?;
                self.instructions_executed += 1;
                log::info!(
                    "halted after {} instruction(s), pc={}",
                    self.instructions_executed,
                    pc
                );
                return Ok(());
            }

            self.cpu.set_pc(pc + 1);
            self.execute(instruction)?;
            self.instructions_executed += 1;
        }
    }

    fn execute(&mut self, instruction: Instruction) -> std::io::Result<()> {
        match instruction {
            Instruction::Add { reg_a, reg_b, dest } => {
                cpu::exec_add(&mut self.cpu, reg_a, reg_b, dest);
            }
            Instruction::Nand { reg_a, reg_b, dest } => {
                cpu::exec_nand(&mut self.cpu, reg_a, reg_b, dest);
            }
            Instruction::Lw {
                reg_a,
                reg_b,
                offset,
            } => {
                let addr = cpu::effective_address(self.cpu.reg(reg_b), offset);
                let value = self.cache.read(&mut self.memory, addr)?;
                self.cpu.set_reg(reg_a, value);
            }
            Instruction::Sw {
                reg_a,
                reg_b,
                offset,
            } => {
                let addr = cpu::effective_address(self.cpu.reg(reg_b), offset);
                self.cache.write(&mut self.memory, addr, self.cpu.reg(reg_a))?;
            }
            Instruction::Beq {
                reg_a,
                reg_b,
                offset,
            } => {
                if self.cpu.reg(reg_a) == self.cpu.reg(reg_b) {
                    let target = (self.cpu.pc() as i32).wrapping_add(offset) as u32;
                    self.cpu.set_pc(target);
                }
            }
            Instruction::Jalr { reg_a, reg_b } => {
                // Link write precedes the jump read: when reg_a == reg_b
                // the jump target becomes the just-written link (pc + 1),
                // per the reference implementation (§9).
                let link = self.cpu.pc() as i32;
                self.cpu.set_reg(reg_a, link);
                let target = self.cpu.reg(reg_b) as u32;
                self.cpu.set_pc(target);
            }
            Instruction::Noop => {}
            Instruction::Halt => unreachable!("HALT is handled in run() before execute()"),
        }
        Ok(())
    }
}
