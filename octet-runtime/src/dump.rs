//! Human-readable machine dumps
//!
//! Read-only views; safe to take at any time, including after a fault.

use crate::memory::Memory;
use crate::state::MachineState;
use octet_spec::Address;
use std::fmt;

/// Registers, PC, SP, flags and status
pub struct StateDump<'a> {
    pub state: &'a MachineState,
    pub memory_size: usize,
}

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        writeln!(f, "memory=<size 0x{:X} bytes>", self.memory_size)?;
        writeln!(f, "registers={:?}", state.registers)?;
        writeln!(f, "pc=0x{:04X}", state.pc)?;
        writeln!(f, "sp=0x{:04X}", state.sp)?;
        writeln!(f, "flags={} [0b{:b}]", state.flags, state.flags.bits())?;
        writeln!(f, "status={}", state.status)?;
        write!(f, "cycles={}", state.cycles)
    }
}

/// Hex rows of memory, `width` bytes per row
pub struct MemoryDump<'a> {
    pub memory: &'a Memory,
    pub start: Address,
    pub len: usize,
    pub width: usize,
}

impl<'a> MemoryDump<'a> {
    /// Every byte of memory
    pub fn full(memory: &'a Memory, width: usize) -> Self {
        Self {
            memory,
            start: 0,
            len: octet_spec::MEMORY_SIZE,
            width,
        }
    }

    /// `len` bytes from `start`, clamped to the end of memory
    pub fn range(memory: &'a Memory, start: Address, len: usize, width: usize) -> Self {
        Self {
            memory,
            start,
            len,
            width,
        }
    }
}

impl fmt::Display for MemoryDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.width.max(1);
        let bytes = self.memory.slice(self.start, self.len);

        for (row, chunk) in bytes.chunks(width).enumerate() {
            let addr = self.start as usize + row * width;
            write!(f, "0x{:04X}:", addr)?;
            for byte in chunk {
                write!(f, " {:02X}", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
