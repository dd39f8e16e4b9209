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

//! `cachetrace` CLI entry point (§4.7, §6.2)
//!
//! Four optional flags (`-f/-b/-s/-a`); anything missing or invalid is
//! prompted for on standard input, mirroring the reference
//! implementation's `while (invalid) { prompt; read; }` loop.

use cachetrace::core::address::CacheGeometry;
use cachetrace::core::memory::{load_program, Memory};
use cachetrace::core::system::System;
use cachetrace::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cachetrace", about = "Set-associative cache simulator")]
struct Args {
    /// Machine-code file to load
    #[arg(short = 'f')]
    file: Option<String>,

    /// Block size in words (must be a positive power of two)
    #[arg(short = 'b')]
    block_size: Option<u32>,

    /// Number of sets (must be a positive power of two)
    #[arg(short = 's')]
    sets: Option<u32>,

    /// Associativity, ways per set (must be a positive power of two)
    #[arg(short = 'a')]
    associativity: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let path = resolve_file_path(args.file)?;
    let block_size = resolve_block_size(args.block_size)?;
    let geometry = resolve_sets_and_associativity(args.sets, args.associativity, block_size)?;

    log::info!(
        "cache geometry: block_size={} number_of_sets={} associativity={} (offset_bits={}, set_bits={}, tag_bits={})",
        geometry.block_size(),
        geometry.number_of_sets(),
        geometry.associativity(),
        geometry.offset_bits(),
        geometry.set_bits(),
        geometry.tag_bits(),
    );

    let mut memory = Memory::new();
    let loaded = load_program(&path, &mut memory)?;
    log::info!("loaded {loaded} word(s) from {path}");

    let stdout = io::stdout();
    let mut system = System::new(geometry, memory, stdout.lock());
    system.run()?;

    log::info!(
        "run complete: {} instruction(s) executed, final pc={}",
        system.instructions_executed(),
        system.pc()
    );
    Ok(())
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn resolve_file_path(cli: Option<String>) -> io::Result<String> {
    let mut path = cli.unwrap_or_default();
    while path.is_empty() {
        log::warn!("no machine-code file given, re-prompting");
        path = prompt_line("Enter the name of the file containing machine code: ")?;
    }
    Ok(path)
}

fn resolve_block_size(cli: Option<u32>) -> io::Result<u32> {
    let mut value = cli;
    loop {
        if let Some(v) = value {
            if v > 0 && v.is_power_of_two() {
                return Ok(v);
            }
            log::warn!("block size {v} is not a positive power of two, re-prompting");
        }
        let line = prompt_line("Enter the cache block size (words): ")?;
        value = line.parse().ok();
    }
}

fn resolve_sets_and_associativity(
    cli_sets: Option<u32>,
    cli_associativity: Option<u32>,
    block_size: u32,
) -> io::Result<CacheGeometry> {
    let mut sets = cli_sets;
    let mut associativity = cli_associativity;
    loop {
        if let (Some(s), Some(a)) = (sets, associativity) {
            match CacheGeometry::new(block_size, s, a) {
                Ok(geometry) => return Ok(geometry),
                Err(err) => {
                    log::warn!("{err}, re-prompting for number of sets and associativity");
                }
            }
        }
        let sets_line = prompt_line("Enter the number of sets: ")?;
        sets = sets_line.parse().ok();
        let associativity_line = prompt_line("Enter the associativity: ")?;
        associativity = associativity_line.parse().ok();
    }
}

