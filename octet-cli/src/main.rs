//! Octet - command line driver for the Octet 8-bit register machine

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, MemoryRange};
use octet_runtime::{VMConfig, VM};
use octet_spec::{Address, Config, Program};
use std::fs;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Counts r0 down from 10 and halts when it reaches zero
const DEMO_SOURCE: &str = "\
ldi r0, #10
ldi r1, #1
ldi r7, #0xFF
ldi r3, #0x10
ldi r5, #0x0A
sub r0, r0, r1
jz r7, r3
jp r7, r5
hlt
";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Asm { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("bin"));
            assemble_file(&input, &output)
        }
        Commands::Disasm { input, base } => {
            let bytes = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let program = Program::from_bytes(base, &bytes)?;
            print!("{}", octet_disassembler::listing(&program));
            Ok(())
        }
        Commands::Run {
            input,
            base,
            max_cycles,
            dump,
            memory,
            trace,
        } => {
            let program = load_input(&input, base)?;
            run(&program, max_cycles, dump, memory, trace)
        }
        Commands::Demo { trace } => {
            let program = octet_assembler::assemble_program(DEMO_SOURCE, Config::DEFAULT.reset_pc)?;
            print!("{}", octet_disassembler::listing(&program));
            run(&program, None, true, None, trace)
        }
    }
}

fn assemble_file(input: &Path, output: &Path) -> Result<()> {
    let source =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let code = octet_assembler::assemble(&source)
        .with_context(|| format!("assembling {}", input.display()))?;
    let bytes = Program::new(code).to_bytes();
    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

/// Assemble source files, read anything else as a raw image
fn load_input(input: &Path, base: Address) -> Result<Program> {
    let is_source = matches!(
        input.extension().and_then(|ext| ext.to_str()),
        Some("asm" | "s")
    );

    if is_source {
        let source =
            fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
        octet_assembler::assemble_program(&source, base)
            .with_context(|| format!("assembling {}", input.display()))
    } else {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        Ok(Program::from_bytes(base, &bytes)?)
    }
}

/// Default layout, program loaded at its base, PC at the base
fn machine(program: &Program, trace: bool) -> Result<VM> {
    let config = VMConfig {
        trace,
        ..VMConfig::default()
    };
    Ok(VM::with_program(program, config)?)
}

fn run(
    program: &Program,
    max_cycles: Option<u64>,
    dump: bool,
    memory: Option<MemoryRange>,
    trace: bool,
) -> Result<()> {
    let mut vm = machine(program, trace)?;
    info!("Loaded {} words at 0x{:04X}", program.code.len(), program.base);

    let outcome = match max_cycles {
        Some(limit) => vm.execute(limit),
        None => vm.run(),
    };

    for row in vm.trace() {
        println!("{}", row);
    }
    if dump {
        println!("{}", vm.dump_state());
    }
    if let Some(range) = memory {
        print!("{}", vm.dump_memory_range(range.start, range.len, 16));
    }

    match outcome {
        Ok(result) => {
            info!("{} after {} cycles", result.status, result.cycles);
            Ok(())
        }
        Err(e) => {
            error!("{} after {} cycles", vm.status(), vm.cycles());
            Err(e.into())
        }
    }
}
