//! Octet Instruction Set
//!
//! One variant per opcode, each carrying only the operands its arity
//! defines. Register operands are raw 4-bit fields; range is checked by the
//! consumer (execution or strict disassembly), never here.

use crate::encoding::Fields;
use crate::error::{OctetError, Result};
use crate::opcode::{Arity, Opcode};
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// Octet instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    // ========== Load / Store ==========
    /// LDR: dst = src
    LoadFromReg { dst: Register, src: Register },

    /// ST: mem[hi << 8 | lo] = src
    Store { hi: Register, lo: Register, src: Register },

    /// LDI: dst = imm
    LoadFromImm { dst: Register, imm: u8 },

    /// LDM: dst = mem[hi << 8 | lo]
    LoadFromMem { dst: Register, hi: Register, lo: Register },

    // ========== Arithmetic ==========
    /// ADD: dst = lhs + rhs (mod 256)
    Add { dst: Register, lhs: Register, rhs: Register },

    /// SUB: dst = lhs - rhs (mod 256)
    Sub { dst: Register, lhs: Register, rhs: Register },

    /// MUL: dst = lhs * rhs (mod 256)
    Mul { dst: Register, lhs: Register, rhs: Register },

    /// DIV: dst = lhs / rhs
    Div { dst: Register, lhs: Register, rhs: Register },

    // ========== Logical ==========
    /// AND: dst = lhs & rhs
    And { dst: Register, lhs: Register, rhs: Register },

    /// OR: dst = lhs | rhs
    Or { dst: Register, lhs: Register, rhs: Register },

    /// XOR: dst = lhs ^ rhs
    Xor { dst: Register, lhs: Register, rhs: Register },

    // ========== Control ==========
    /// JP: pc = hi << 8 | lo
    Jump { hi: Register, lo: Register },

    /// JZ: if Z then pc = hi << 8 | lo
    JumpIfZero { hi: Register, lo: Register },

    // ========== Stack ==========
    /// PUSH: sp -= 1; mem[sp] = src
    Push { src: Register },

    /// POP: dst = mem[sp]; sp += 1
    Pop { dst: Register },

    // ========== System ==========
    /// HLT
    Halt,
}

/// Operand list in assembly order, shaped by arity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operands {
    None,
    One(Register),
    Two(Register, Register),
    Three(Register, Register, Register),
    RegImm(Register, u8),
}

impl Operands {
    /// Arity this operand list satisfies
    pub const fn arity(&self) -> Arity {
        match self {
            Operands::None => Arity::NoOperand,
            Operands::One(_) => Arity::OneReg,
            Operands::Two(..) => Arity::TwoReg,
            Operands::Three(..) => Arity::ThreeReg,
            Operands::RegImm(..) => Arity::RegImm,
        }
    }

    /// Register operands, in field order
    pub fn registers(&self) -> impl Iterator<Item = Register> {
        let (regs, n) = match *self {
            Operands::None => ([Register::R0; 3], 0),
            Operands::One(a) | Operands::RegImm(a, _) => ([a, Register::R0, Register::R0], 1),
            Operands::Two(a, b) => ([a, b, Register::R0], 2),
            Operands::Three(a, b, c) => ([a, b, c], 3),
        };
        regs.into_iter().take(n)
    }
}

impl Instruction {
    /// Build an instruction from an opcode and operands of matching arity
    pub fn new(opcode: Opcode, operands: Operands) -> Result<Self> {
        use Operands as O;

        let inst = match (opcode, operands) {
            (Opcode::Halt, O::None) => Instruction::Halt,
            (Opcode::Push, O::One(src)) => Instruction::Push { src },
            (Opcode::Pop, O::One(dst)) => Instruction::Pop { dst },
            (Opcode::LoadFromReg, O::Two(dst, src)) => Instruction::LoadFromReg { dst, src },
            (Opcode::Jump, O::Two(hi, lo)) => Instruction::Jump { hi, lo },
            (Opcode::JumpIfZero, O::Two(hi, lo)) => Instruction::JumpIfZero { hi, lo },
            (Opcode::LoadFromImm, O::RegImm(dst, imm)) => Instruction::LoadFromImm { dst, imm },
            (Opcode::Store, O::Three(hi, lo, src)) => Instruction::Store { hi, lo, src },
            (Opcode::LoadFromMem, O::Three(dst, hi, lo)) => Instruction::LoadFromMem { dst, hi, lo },
            (Opcode::Add, O::Three(dst, lhs, rhs)) => Instruction::Add { dst, lhs, rhs },
            (Opcode::Sub, O::Three(dst, lhs, rhs)) => Instruction::Sub { dst, lhs, rhs },
            (Opcode::Mul, O::Three(dst, lhs, rhs)) => Instruction::Mul { dst, lhs, rhs },
            (Opcode::Div, O::Three(dst, lhs, rhs)) => Instruction::Div { dst, lhs, rhs },
            (Opcode::And, O::Three(dst, lhs, rhs)) => Instruction::And { dst, lhs, rhs },
            (Opcode::Or, O::Three(dst, lhs, rhs)) => Instruction::Or { dst, lhs, rhs },
            (Opcode::Xor, O::Three(dst, lhs, rhs)) => Instruction::Xor { dst, lhs, rhs },
            (opcode, operands) => {
                return Err(OctetError::ArityMismatch {
                    opcode,
                    expected: opcode.arity(),
                    found: operands.arity(),
                })
            }
        };
        Ok(inst)
    }

    /// Build the tagged instruction an opcode's arity selects from raw fields.
    ///
    /// Fields outside the arity are dropped.
    pub fn from_fields(opcode: Opcode, fields: &Fields) -> Self {
        let a = Register::new(fields.r1);
        let b = Register::new(fields.r2);
        let c = Register::new(fields.r3);

        match opcode {
            Opcode::LoadFromReg => Instruction::LoadFromReg { dst: a, src: b },
            Opcode::Store => Instruction::Store { hi: a, lo: b, src: c },
            Opcode::Add => Instruction::Add { dst: a, lhs: b, rhs: c },
            Opcode::Sub => Instruction::Sub { dst: a, lhs: b, rhs: c },
            Opcode::Mul => Instruction::Mul { dst: a, lhs: b, rhs: c },
            Opcode::Div => Instruction::Div { dst: a, lhs: b, rhs: c },
            Opcode::Jump => Instruction::Jump { hi: a, lo: b },
            Opcode::JumpIfZero => Instruction::JumpIfZero { hi: a, lo: b },
            Opcode::And => Instruction::And { dst: a, lhs: b, rhs: c },
            Opcode::Or => Instruction::Or { dst: a, lhs: b, rhs: c },
            Opcode::Xor => Instruction::Xor { dst: a, lhs: b, rhs: c },
            Opcode::Push => Instruction::Push { src: a },
            Opcode::Pop => Instruction::Pop { dst: a },
            Opcode::LoadFromImm => Instruction::LoadFromImm { dst: a, imm: fields.imm },
            Opcode::LoadFromMem => Instruction::LoadFromMem { dst: a, hi: b, lo: c },
            Opcode::Halt => Instruction::Halt,
        }
    }

    /// Get the opcode
    pub const fn opcode(&self) -> Opcode {
        match self {
            Instruction::LoadFromReg { .. } => Opcode::LoadFromReg,
            Instruction::Store { .. } => Opcode::Store,
            Instruction::LoadFromImm { .. } => Opcode::LoadFromImm,
            Instruction::LoadFromMem { .. } => Opcode::LoadFromMem,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Mul { .. } => Opcode::Mul,
            Instruction::Div { .. } => Opcode::Div,
            Instruction::And { .. } => Opcode::And,
            Instruction::Or { .. } => Opcode::Or,
            Instruction::Xor { .. } => Opcode::Xor,
            Instruction::Jump { .. } => Opcode::Jump,
            Instruction::JumpIfZero { .. } => Opcode::JumpIfZero,
            Instruction::Push { .. } => Opcode::Push,
            Instruction::Pop { .. } => Opcode::Pop,
            Instruction::Halt => Opcode::Halt,
        }
    }

    /// Get the instruction mnemonic
    pub const fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// Operands in assembly order
    pub const fn operands(&self) -> Operands {
        match *self {
            Instruction::Halt => Operands::None,
            Instruction::Push { src } => Operands::One(src),
            Instruction::Pop { dst } => Operands::One(dst),
            Instruction::LoadFromReg { dst, src } => Operands::Two(dst, src),
            Instruction::Jump { hi, lo } | Instruction::JumpIfZero { hi, lo } => {
                Operands::Two(hi, lo)
            }
            Instruction::LoadFromImm { dst, imm } => Operands::RegImm(dst, imm),
            Instruction::Store { hi, lo, src } => Operands::Three(hi, lo, src),
            Instruction::LoadFromMem { dst, hi, lo } => Operands::Three(dst, hi, lo),
            Instruction::Add { dst, lhs, rhs }
            | Instruction::Sub { dst, lhs, rhs }
            | Instruction::Mul { dst, lhs, rhs }
            | Instruction::Div { dst, lhs, rhs }
            | Instruction::And { dst, lhs, rhs }
            | Instruction::Or { dst, lhs, rhs }
            | Instruction::Xor { dst, lhs, rhs } => Operands::Three(dst, lhs, rhs),
        }
    }

    /// Every register the instruction reads or writes
    pub fn registers(&self) -> impl Iterator<Item = Register> {
        self.operands().registers()
    }

    /// First register operand outside r0-r7, if any
    pub fn invalid_register(&self) -> Option<Register> {
        self.registers().find(|reg| !reg.is_valid())
    }

    /// Check if this instruction may redirect the program counter
    pub const fn is_jump(&self) -> bool {
        self.opcode().is_control()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        match self.operands() {
            Operands::None => Ok(()),
            Operands::One(a) => write!(f, " {}", a),
            Operands::Two(a, b) => write!(f, " {}, {}", a, b),
            Operands::Three(a, b, c) => write!(f, " {}, {}, {}", a, b, c),
            Operands::RegImm(a, imm) => write!(f, " {}, #{}", a, imm),
        }
    }
}
