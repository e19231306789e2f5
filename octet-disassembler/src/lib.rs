//! # Octet Disassembler
//!
//! Turn 16-bit Octet instruction words back into assembly text.
//!
//! Disassembly is per word: a corrupt word (register past r7, or stray bits
//! in a field its opcode does not use) is reported and skipped while the
//! rest of the input is still rendered.
//!
//! ## Example
//!
//! ```rust
//! use octet_disassembler::disassemble;
//!
//! let out = disassemble(&[0xD0FF, 0xF000]);
//! assert_eq!(out.text(), "ldi r0, #255\nhlt\n");
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::{disassemble, disassemble_program, listing, Disassembly, Line, Rejected};
pub use decoder::{decode, decode_strict};
pub use formatter::format;

#[cfg(test)]
mod tests {
    use super::*;
    use octet_spec::{Instruction, Opcode, Program, Register};

    #[test]
    fn test_decode_function() {
        let word = (Opcode::Halt.to_u8() as u16) << 12;
        assert_eq!(decode(word), Ok(Instruction::Halt));
    }

    #[test]
    fn test_format_function() {
        let instr = Instruction::Mul {
            dst: Register::R1,
            lhs: Register::R2,
            rhs: Register::R3,
        };
        assert_eq!(format(&instr), "mul r1, r2, r3");
    }

    #[test]
    fn test_disassembler_error_display() {
        let err = DisassemblerError::InvalidRegister {
            mnemonic: "pop",
            register: Register::new(12),
        };
        assert_eq!(err.to_string(), "Instruction 'pop' addresses an invalid register r12");

        let err = DisassemblerError::UnexpectedOperands {
            mnemonic: "push",
            expected: octet_spec::Arity::OneReg,
        };
        assert_eq!(
            err.to_string(),
            "Instruction 'push' expected 1 register, potentially corrupt!"
        );
    }

    #[test]
    fn test_listing_empty_program() {
        let output = listing(&Program::default());
        assert!(output.contains("0 instructions"));
    }

    // Cross-crate roundtrip tests are in the workspace-level tests/cross_module.rs
}
