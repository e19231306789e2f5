//! Instruction decoder
//!
//! [`decode`] is what the machine uses: it trusts the opcode's arity and
//! drops unused fields. [`decode_strict`] is what the disassembler uses: it
//! also rejects out-of-range registers and non-zero unused fields.

use crate::error::{DisassemblerError, Result};
use octet_spec::encoding::unused_mask;
use octet_spec::{Fields, Instruction, Opcode};

/// Decode a 16-bit instruction word
pub fn decode(word: u16) -> Result<Instruction> {
    let fields = Fields::extract(word);
    let opcode = decode_opcode(&fields)?;
    Ok(Instruction::from_fields(opcode, &fields))
}

/// Decode a word, rejecting anything that looks corrupt.
///
/// Register range is checked before the unused-field check, so a word with
/// both problems reports the invalid register.
pub fn decode_strict(word: u16) -> Result<Instruction> {
    let fields = Fields::extract(word);
    let opcode = decode_opcode(&fields)?;
    let inst = Instruction::from_fields(opcode, &fields);

    if let Some(register) = inst.invalid_register() {
        return Err(DisassemblerError::InvalidRegister {
            mnemonic: opcode.mnemonic(),
            register,
        });
    }

    let arity = opcode.arity();
    if word & unused_mask(arity) != 0 {
        return Err(DisassemblerError::UnexpectedOperands {
            mnemonic: opcode.mnemonic(),
            expected: arity,
        });
    }

    Ok(inst)
}

fn decode_opcode(fields: &Fields) -> Result<Opcode> {
    Opcode::from_u8(fields.opcode).ok_or(DisassemblerError::UnknownOpcode(fields.opcode))
}
