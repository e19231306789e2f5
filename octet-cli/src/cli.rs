use clap::{Parser, Subcommand};
use octet_spec::Address;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "octet")]
#[command(about = "Assemble, disassemble and run programs for the Octet 8-bit machine")]
#[command(version)]
pub struct Cli {
    /// Log every executed instruction (same as RUST_LOG=trace)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a source file into a raw big-endian image
    Asm {
        /// Input assembly file
        input: PathBuf,

        /// Output image (defaults to the input with a .bin extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a listing of a raw image
    Disasm {
        /// Input image
        input: PathBuf,

        /// Address the image is loaded at
        #[arg(long, default_value = "0xFF00", value_parser = parse_address)]
        base: Address,
    },

    /// Load a program and run it
    Run {
        /// Assembly source (.asm, .s) or raw image
        input: PathBuf,

        /// Load address, also the reset PC
        #[arg(long, default_value = "0xFF00", value_parser = parse_address)]
        base: Address,

        /// Stop after this many cycles
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Print registers and flags when the run ends
        #[arg(long)]
        dump: bool,

        /// Print a memory range when the run ends, as ADDR:LEN
        #[arg(long, value_parser = parse_range)]
        memory: Option<MemoryRange>,

        /// Print one trace row per cycle
        #[arg(long)]
        trace: bool,
    },

    /// Run the built-in countdown program
    Demo {
        /// Print one trace row per cycle
        #[arg(long)]
        trace: bool,
    },
}

/// A `--memory ADDR:LEN` argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    pub start: Address,
    pub len: usize,
}

/// Parse `0x`-prefixed hex or plain decimal into an address
pub fn parse_address(text: &str) -> Result<Address, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => Address::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{text}': {e}"))
}

pub fn parse_range(text: &str) -> Result<MemoryRange, String> {
    let (start, len) = text
        .split_once(':')
        .ok_or_else(|| format!("expected ADDR:LEN, got '{text}'"))?;
    let start = parse_address(start)?;
    let len = parse_address(len)? as usize;
    Ok(MemoryRange { start, len })
}
