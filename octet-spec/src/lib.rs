//! # Octet ISA Specification
//!
//! 8-bit register machine with a fixed 16-bit instruction encoding.
//!
//! ## Key Features
//! - 8-bit data width, 16-bit address space (64 KiB, byte addressable)
//! - 16-bit instructions stored big-endian in two consecutive bytes
//! - 8 general-purpose registers (r0-r7)
//! - Flags: Carry, Zero, Overflow, Negative, Halt
//! - Downward-growing stack in a fixed window below a fixed top address
//!
//! ## Instruction Format
//!
//! ```text
//! oooo aaaa bbbb cccc
//! ```
//!
//! `oooo` is the opcode. The remaining 12 bits hold up to three register
//! fields, or one register field followed by an 8-bit immediate, depending
//! on the opcode's [`Arity`].

pub mod config;
pub mod encoding;
pub mod error;
pub mod flags;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod register;

pub use config::{Config, ConfigError};
pub use encoding::Fields;
pub use error::OctetError;
pub use flags::{Flag, Flags};
pub use instruction::{Instruction, Operands};
pub use opcode::{Arity, Opcode};
pub use program::Program;
pub use register::{Register, REGISTER_COUNT};

/// Instruction word (16 bits)
pub type Word = u16;

/// Address type (16 bits)
pub type Address = u16;

/// Size of the address space in bytes
pub const MEMORY_SIZE: usize = 1 << 16;

/// Bytes occupied by one instruction word
pub const INSTRUCTION_SIZE: u16 = 2;

/// Default reset address (initial PC)
pub const RESET_PC: Address = 0xFF00;

/// Default stack top; the stack grows down from here
pub const STACK_TOP: Address = 0x00FF;

/// Default number of bytes in the stack window
pub const STACK_SIZE: u16 = 0xFF;

/// Word treated as an implicit halt when fetched.
///
/// Any memory the loader never wrote reads back as this word, so running off
/// the end of a program stops cleanly. It is bit-for-bit identical to
/// `ldr r0, r0`, which therefore can never be executed.
pub const IMPLICIT_HALT_WORD: Word = 0x0000;
