//! Execution trace

use octet_spec::{Address, Flags, Word, REGISTER_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One completed cycle.
///
/// `pc` and `word` identify the instruction that ran; registers, SP and
/// flags are the state after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    pub cycle: u64,
    pub pc: Address,
    pub word: Word,
    pub registers: [u8; REGISTER_COUNT],
    pub sp: Address,
    pub flags: Flags,
}

impl fmt::Display for TraceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:6}] 0x{:04X} {:04X} ", self.cycle, self.pc, self.word)?;
        for (i, value) in self.registers.iter().enumerate() {
            write!(f, "r{}={:02X} ", i, value)?;
        }
        write!(f, "sp=0x{:04X} {}", self.sp, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_row_display() {
        let row = TraceRow {
            cycle: 3,
            pc: 0xFF04,
            word: 0x3001,
            registers: [9, 1, 0, 0x10, 0, 0x0A, 0, 0xFF],
            sp: 0x00FF,
            flags: Flags::new(),
        };
        assert_eq!(
            row.to_string(),
            "[     3] 0xFF04 3001 r0=09 r1=01 r2=00 r3=10 r4=00 r5=0A r6=00 r7=FF sp=0x00FF ........"
        );
    }
}
