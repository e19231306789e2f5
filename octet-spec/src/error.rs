//! # Error Types for the Octet ISA

use crate::config::ConfigError;
use crate::opcode::{Arity, Opcode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OctetError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Instruction errors
    #[error("Invalid opcode: {0:#x}")]
    InvalidOpcode(u8),

    #[error("Opcode {opcode} expects {expected}, found {found}")]
    ArityMismatch {
        opcode: Opcode,
        expected: Arity,
        found: Arity,
    },

    // Program image errors
    #[error("Program image length {0} is not a whole number of words")]
    OddImageLength(usize),

    #[error("Program of {words} words at {base:#06x} runs past the end of memory")]
    ProgramTooLarge { base: u16, words: usize },
}

pub type Result<T> = std::result::Result<T, OctetError>;
