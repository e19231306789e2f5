//! Runtime error types

use octet_spec::{Fields, OctetError, Register};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason an execution cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum Fault {
    #[error("invalid register {0}")]
    InvalidRegister(Register),

    #[error("division by zero")]
    DivisionByZero,

    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("unknown opcode {0:#x}")]
    UnknownOpcode(u8),

    #[error("reached end of memory")]
    EndOfMemory,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Spec error: {0}")]
    SpecError(#[from] OctetError),

    #[error("Execution fault at PC {pc:#06x} (word {word:#06x}, {fields}): {fault}")]
    Execution {
        pc: u16,
        word: u16,
        fields: Fields,
        fault: Fault,
    },

    #[error("Machine is faulted ({0}); reset or restore before executing")]
    Faulted(Fault),

    #[error("Program of {words} words at {base:#06x} runs past the end of memory")]
    ProgramOutOfBounds { base: u16, words: usize },

    #[error("Invalid register index: {0}")]
    InvalidRegister(usize),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Snapshot memory is {0} bytes, expected {}", octet_spec::MEMORY_SIZE)]
    SnapshotSize(usize),
}

impl RuntimeError {
    /// Fault category, for errors raised by (or after) a failed cycle
    pub fn fault(&self) -> Option<Fault> {
        match self {
            RuntimeError::Execution { fault, .. } | RuntimeError::Faulted(fault) => Some(*fault),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display() {
        assert_eq!(Fault::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            Fault::InvalidRegister(Register::new(9)).to_string(),
            "invalid register r9"
        );
        assert_eq!(Fault::EndOfMemory.to_string(), "reached end of memory");
    }

    #[test]
    fn test_execution_display() {
        let err = RuntimeError::Execution {
            pc: 0xFF04,
            word: 0x5012,
            fields: Fields::extract(0x5012),
            fault: Fault::DivisionByZero,
        };
        assert_eq!(
            err.to_string(),
            "Execution fault at PC 0xff04 (word 0x5012, op=0x5 r1=0 r2=1 r3=2 imm=0x12): division by zero"
        );
        assert_eq!(err.fault(), Some(Fault::DivisionByZero));
    }

    #[test]
    fn test_program_out_of_bounds_display() {
        let err = RuntimeError::ProgramOutOfBounds {
            base: 0xFFFE,
            words: 2,
        };
        assert_eq!(
            err.to_string(),
            "Program of 2 words at 0xfffe runs past the end of memory"
        );
        assert_eq!(err.fault(), None);
    }

    #[test]
    fn test_snapshot_size_display() {
        let err = RuntimeError::SnapshotSize(12);
        assert_eq!(err.to_string(), "Snapshot memory is 12 bytes, expected 65536");
    }
}
