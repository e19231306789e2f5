//! Assembler errors

use octet_spec::{Arity, OctetError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("Invalid register at line {line}: {text}")]
    InvalidRegister { line: usize, text: String },

    #[error("Invalid immediate value at line {line}: {text}")]
    InvalidImmediate { line: usize, text: String },

    #[error("Wrong operand count at line {line}: '{mnemonic}' expects {expected} operand(s), found {found}")]
    OperandCount {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Operand mismatch at line {line}: '{mnemonic}' takes {arity}")]
    OperandKind {
        line: usize,
        mnemonic: &'static str,
        arity: Arity,
    },

    #[error("Spec error: {0}")]
    Spec(#[from] OctetError),
}

impl AssemblerError {
    /// Source line the error was raised on (1-based), if any
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::SyntaxError { line, .. }
            | AssemblerError::UnknownInstruction { line, .. }
            | AssemblerError::InvalidRegister { line, .. }
            | AssemblerError::InvalidImmediate { line, .. }
            | AssemblerError::OperandCount { line, .. }
            | AssemblerError::OperandKind { line, .. } => Some(*line),
            AssemblerError::Spec(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
