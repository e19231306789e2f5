//! Instruction encoding to the 16-bit word format
//!
//! Fields are truncated to their width; register range is never checked.

use octet_spec::encoding::{encode_none, encode_one, encode_reg_imm, encode_three, encode_two};
use octet_spec::{Instruction, Operands};

/// Encode instruction to a 16-bit word
pub fn encode(instr: &Instruction) -> u16 {
    let op = instr.opcode().to_u8();
    match instr.operands() {
        Operands::None => encode_none(op),
        Operands::One(a) => encode_one(op, a.index()),
        Operands::Two(a, b) => encode_two(op, a.index(), b.index()),
        Operands::Three(a, b, c) => encode_three(op, a.index(), b.index(), c.index()),
        Operands::RegImm(a, imm) => encode_reg_imm(op, a.index(), imm),
    }
}

/// Encode a run of instructions
pub fn encode_all(instrs: &[Instruction]) -> Vec<u16> {
    instrs.iter().map(encode).collect()
}
