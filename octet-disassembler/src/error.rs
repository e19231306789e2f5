//! Disassembler errors

use octet_spec::{Arity, Register};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error("Unknown opcode: 0x{0:X}")]
    UnknownOpcode(u8),

    #[error("Instruction '{mnemonic}' addresses an invalid register {register}")]
    InvalidRegister {
        mnemonic: &'static str,
        register: Register,
    },

    #[error("Instruction '{mnemonic}' expected {expected}, potentially corrupt!")]
    UnexpectedOperands {
        mnemonic: &'static str,
        expected: Arity,
    },
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
