//! Octet Assembler
//!
//! Assemble Octet assembly text into 16-bit instruction words.
//!
//! ## Example
//!
//! ```rust
//! use octet_assembler::assemble;
//!
//! let source = r#"
//!     ldi r0, #10
//!     ldi r1, #0x01
//!     sub r0, r0, r1
//!     hlt
//! "#;
//!
//! let words = assemble(source).unwrap();
//! assert_eq!(words.len(), 4);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod encoder;
pub mod assembler;

pub use error::{AssemblerError, Result};
pub use assembler::{assemble, assemble_program};
pub use parser::{parse_instruction, parse_line, parse_register};
pub use encoder::{encode, encode_all};
