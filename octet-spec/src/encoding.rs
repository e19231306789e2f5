//! # Instruction Encoding Constants and Helpers
//!
//! Centralized bit layout for the 16-bit Octet instruction word.
//!
//! ## Instruction Format (16-bit)
//!
//! ```text
//! NoOperand: [opcode:4][0:12]
//! OneReg:    [opcode:4][a:4][0:8]
//! TwoReg:    [opcode:4][a:4][b:4][0:4]
//! ThreeReg:  [opcode:4][a:4][b:4][c:4]
//! RegImm:    [opcode:4][a:4][imm:8]
//! ```
//!
//! Encoding truncates every field to its width and never checks register
//! range. Extraction is unconditional: all fields are pulled out of every
//! word whatever its arity.

use crate::opcode::Arity;
use serde::{Deserialize, Serialize};

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 12-15
pub const OPCODE_SHIFT: u32 = 12;

/// First register field: bits 8-11
pub const R1_SHIFT: u32 = 8;

/// Second register field: bits 4-7
pub const R2_SHIFT: u32 = 4;

/// Third register field: bits 0-3
pub const R3_SHIFT: u32 = 0;

/// Immediate field: bits 0-7
pub const IMM_SHIFT: u32 = 0;

// ============================================================================
// Field Masks
// ============================================================================

/// Opcode mask (4 bits)
pub const OPCODE_MASK: u16 = 0xF;

/// Register field mask (4 bits)
pub const REGISTER_MASK: u16 = 0xF;

/// Immediate mask (8 bits)
pub const IMM_MASK: u16 = 0xFF;

/// Bits that must be zero for each arity, as seen by a strict decoder
pub const fn unused_mask(arity: Arity) -> u16 {
    match arity {
        Arity::NoOperand => 0x0FFF,
        Arity::OneReg => 0x00FF,
        Arity::TwoReg => 0x000F,
        Arity::ThreeReg | Arity::RegImm => 0x0000,
    }
}

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract opcode (bits 12-15)
#[inline]
pub const fn extract_opcode(word: u16) -> u8 {
    ((word >> OPCODE_SHIFT) & OPCODE_MASK) as u8
}

/// Extract first register field (bits 8-11)
#[inline]
pub const fn extract_r1(word: u16) -> u8 {
    ((word >> R1_SHIFT) & REGISTER_MASK) as u8
}

/// Extract second register field (bits 4-7)
#[inline]
pub const fn extract_r2(word: u16) -> u8 {
    ((word >> R2_SHIFT) & REGISTER_MASK) as u8
}

/// Extract third register field (bits 0-3)
#[inline]
pub const fn extract_r3(word: u16) -> u8 {
    ((word >> R3_SHIFT) & REGISTER_MASK) as u8
}

/// Extract immediate byte (bits 0-7)
#[inline]
pub const fn extract_imm(word: u16) -> u8 {
    ((word >> IMM_SHIFT) & IMM_MASK) as u8
}

// ============================================================================
// Encoding Functions
// ============================================================================

#[inline]
const fn opcode_bits(opcode: u8) -> u16 {
    ((opcode as u16) & OPCODE_MASK) << OPCODE_SHIFT
}

#[inline]
const fn reg_bits(reg: u8, shift: u32) -> u16 {
    ((reg as u16) & REGISTER_MASK) << shift
}

/// Encode an instruction with no operands
#[inline]
pub const fn encode_none(opcode: u8) -> u16 {
    opcode_bits(opcode)
}

/// Encode an instruction with one register field
#[inline]
pub const fn encode_one(opcode: u8, a: u8) -> u16 {
    opcode_bits(opcode) | reg_bits(a, R1_SHIFT)
}

/// Encode an instruction with two register fields
#[inline]
pub const fn encode_two(opcode: u8, a: u8, b: u8) -> u16 {
    opcode_bits(opcode) | reg_bits(a, R1_SHIFT) | reg_bits(b, R2_SHIFT)
}

/// Encode an instruction with three register fields
#[inline]
pub const fn encode_three(opcode: u8, a: u8, b: u8, c: u8) -> u16 {
    opcode_bits(opcode) | reg_bits(a, R1_SHIFT) | reg_bits(b, R2_SHIFT) | reg_bits(c, R3_SHIFT)
}

/// Encode an instruction with a register field and an immediate byte
#[inline]
pub const fn encode_reg_imm(opcode: u8, a: u8, imm: u8) -> u16 {
    opcode_bits(opcode) | reg_bits(a, R1_SHIFT) | (((imm as u16) & IMM_MASK) << IMM_SHIFT)
}

// ============================================================================
// Raw Fields
// ============================================================================

/// Every field of an instruction word, extracted regardless of arity.
///
/// `imm` overlaps `r2` and `r3`. Which fields matter depends on the opcode;
/// this type is for diagnostics and corruption checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fields {
    pub opcode: u8,
    pub r1: u8,
    pub r2: u8,
    pub r3: u8,
    pub imm: u8,
}

impl Fields {
    /// Split a word into all of its fields
    pub const fn extract(word: u16) -> Self {
        Self {
            opcode: extract_opcode(word),
            r1: extract_r1(word),
            r2: extract_r2(word),
            r3: extract_r3(word),
            imm: extract_imm(word),
        }
    }
}

impl std::fmt::Display for Fields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "op={:#x} r1={} r2={} r3={} imm={:#04x}",
            self.opcode, self.r1, self.r2, self.r3, self.imm
        )
    }
}
