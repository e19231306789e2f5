//! # Octet Opcode Definitions
//!
//! Opcodes occupy the top 4 bits of every instruction word, so all 16 values
//! are assigned. Each opcode has exactly one operand shape ([`Arity`]).

use crate::error::OctetError;
use serde::{Deserialize, Serialize};

/// Instruction opcode (4 bits)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// LDR: dst = src
    LoadFromReg = 0x0,
    /// ST: mem[hi << 8 | lo] = src
    Store = 0x1,
    /// ADD: dst = lhs + rhs
    Add = 0x2,
    /// SUB: dst = lhs - rhs
    Sub = 0x3,
    /// MUL: dst = lhs * rhs
    Mul = 0x4,
    /// DIV: dst = lhs / rhs
    Div = 0x5,
    /// JP: pc = hi << 8 | lo
    Jump = 0x6,
    /// JZ: if Z, pc = hi << 8 | lo
    JumpIfZero = 0x7,
    /// AND: dst = lhs & rhs
    And = 0x8,
    /// OR: dst = lhs | rhs
    Or = 0x9,
    /// XOR: dst = lhs ^ rhs
    Xor = 0xA,
    /// PUSH: mem[--sp] = src
    Push = 0xB,
    /// POP: dst = mem[sp++]
    Pop = 0xC,
    /// LDI: dst = imm
    LoadFromImm = 0xD,
    /// LDM: dst = mem[hi << 8 | lo]
    LoadFromMem = 0xE,
    /// HLT: set the Halt flag
    Halt = 0xF,
}

/// Operand shape of an opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// `oooo 0000 0000 0000`
    NoOperand,
    /// `oooo aaaa 0000 0000`
    OneReg,
    /// `oooo aaaa bbbb 0000`
    TwoReg,
    /// `oooo aaaa bbbb cccc`
    ThreeReg,
    /// `oooo aaaa iiii iiii`
    RegImm,
}

impl Arity {
    /// Number of register fields this shape uses
    pub const fn register_count(self) -> usize {
        match self {
            Arity::NoOperand => 0,
            Arity::OneReg | Arity::RegImm => 1,
            Arity::TwoReg => 2,
            Arity::ThreeReg => 3,
        }
    }

    /// Total number of operands written in assembly
    pub const fn operand_count(self) -> usize {
        match self {
            Arity::RegImm => 2,
            other => other.register_count(),
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Arity::NoOperand => "no registers",
            Arity::OneReg => "1 register",
            Arity::TwoReg => "2 registers",
            Arity::ThreeReg => "3 registers",
            Arity::RegImm => "a register and an immediate",
        };
        write!(f, "{}", text)
    }
}

impl Opcode {
    /// Opcode width in bits
    pub const BITS: usize = 4;

    /// All opcodes in encoding order
    pub const ALL: [Opcode; 16] = [
        Opcode::LoadFromReg,
        Opcode::Store,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Jump,
        Opcode::JumpIfZero,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Push,
        Opcode::Pop,
        Opcode::LoadFromImm,
        Opcode::LoadFromMem,
        Opcode::Halt,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Operand shape of this opcode
    pub const fn arity(self) -> Arity {
        match self {
            Opcode::Halt => Arity::NoOperand,
            Opcode::Push | Opcode::Pop => Arity::OneReg,
            Opcode::LoadFromReg | Opcode::Jump | Opcode::JumpIfZero => Arity::TwoReg,
            Opcode::LoadFromImm => Arity::RegImm,
            Opcode::Store
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::LoadFromMem => Arity::ThreeReg,
        }
    }

    /// Assembly mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::LoadFromReg => "ldr",
            Opcode::Store => "st",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Jump => "jp",
            Opcode::JumpIfZero => "jz",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::LoadFromImm => "ldi",
            Opcode::LoadFromMem => "ldm",
            Opcode::Halt => "hlt",
        }
    }

    /// Look up an opcode by its mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == mnemonic)
    }

    /// Check if this opcode redirects the program counter
    #[inline]
    pub const fn is_control(self) -> bool {
        matches!(self, Opcode::Jump | Opcode::JumpIfZero)
    }

    /// Check if this opcode touches the stack
    #[inline]
    pub const fn is_stack(self) -> bool {
        matches!(self, Opcode::Push | Opcode::Pop)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = OctetError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(OctetError::InvalidOpcode(value))
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
