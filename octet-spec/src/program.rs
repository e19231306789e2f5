//! # Program Image
//!
//! A run of instruction words destined for a base address. The binary form
//! is the raw memory image: each word as two bytes, high byte first.

use crate::error::{OctetError, Result};
use crate::{Address, Word, INSTRUCTION_SIZE, MEMORY_SIZE, RESET_PC};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction words plus the address they load at
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Load address of the first word
    pub base: Address,
    /// Instruction words in execution order
    pub code: Vec<Word>,
}

impl Program {
    /// Create a program loaded at the default reset address
    pub fn new(code: Vec<Word>) -> Self {
        Self::at(RESET_PC, code)
    }

    /// Create a program loaded at `base`
    pub fn at(base: Address, code: Vec<Word>) -> Self {
        Self { base, code }
    }

    /// Size of the image in bytes
    pub fn byte_len(&self) -> usize {
        self.code.len() * INSTRUCTION_SIZE as usize
    }

    /// Check that the image fits between `base` and the end of memory
    pub fn validate(&self) -> Result<()> {
        let end = self.base as usize + self.byte_len();
        if end > MEMORY_SIZE {
            return Err(OctetError::ProgramTooLarge {
                base: self.base,
                words: self.code.len(),
            });
        }
        Ok(())
    }

    /// Address of the word at `index`
    pub fn address_of(&self, index: usize) -> Address {
        self.base
            .wrapping_add((index as u16).wrapping_mul(INSTRUCTION_SIZE))
    }

    /// Serialize to the big-endian memory image
    pub fn to_bytes(&self) -> Vec<u8> {
        self.code.iter().flat_map(|word| word.to_be_bytes()).collect()
    }

    /// Deserialize a big-endian memory image
    pub fn from_bytes(base: Address, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % INSTRUCTION_SIZE as usize != 0 {
            return Err(OctetError::OddImageLength(bytes.len()));
        }

        let code = bytes
            .chunks_exact(INSTRUCTION_SIZE as usize)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        let program = Self { base, code };
        program.validate()?;
        Ok(program)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Program {{ base: {:#06x}, words: {} }}",
            self.base,
            self.code.len()
        )
    }
}
