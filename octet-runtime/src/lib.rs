//! # Octet Runtime
//!
//! Execute Octet programs on an 8-bit register machine with 64 KiB of
//! byte-addressed memory.
//!
//! ## Features
//!
//! - **16 instructions**: load/store, arithmetic, logic, jumps, stack
//! - **8 registers**: r0-r7, 8 bits each
//! - **Flags**: carry, zero, overflow, negative, halt
//! - **Diagnostics**: state and memory dumps, per-cycle trace, snapshots
//!
//! ## Example
//!
//! ```rust,no_run
//! use octet_runtime::{VM, VMConfig};
//!
//! let mut vm = VM::new(VMConfig::default()).unwrap();
//! vm.load(0xFF00, &[0xD00A, 0xF000]).unwrap();
//! let result = vm.run().unwrap();
//! println!("Cycles: {}", result.cycles);
//! println!("{}", vm.dump_state());
//! ```

pub mod error;
pub mod state;
pub mod memory;
pub mod execute;
pub mod dump;
pub mod trace;
pub mod snapshot;
pub mod vm;

pub use state::{HaltReason, MachineState, MachineStatus};
pub use memory::Memory;
pub use dump::{MemoryDump, StateDump};
pub use trace::TraceRow;
pub use snapshot::Snapshot;
pub use vm::{ExecutionResult, VMConfig, DEFAULT_TRACE_LIMIT, VM};
pub use error::{Fault, Result, RuntimeError};

/// Simple execution helper
///
/// Loads a program on a fresh default machine, points PC at its base and
/// runs it to completion.
pub fn run_program(program: &octet_spec::Program) -> Result<VM> {
    let mut vm = VM::with_program(program, VMConfig::default())?;
    vm.run()?;
    Ok(vm)
}
