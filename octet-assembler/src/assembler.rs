//! Main assembler logic
//!
//! Assembly is all-or-nothing: the first bad line fails the whole source and
//! no words are returned.

use crate::encoder::encode;
use crate::error::Result;
use crate::parser::parse_line;
use octet_spec::{Address, Program, Word};

/// Assemble source code into instruction words
pub fn assemble(source: &str) -> Result<Vec<Word>> {
    let mut words = Vec::new();

    for (index, line) in source.lines().enumerate() {
        if let Some(instr) = parse_line(line, index + 1)? {
            words.push(encode(&instr));
        }
    }

    tracing::debug!(words = words.len(), "assembled source");
    Ok(words)
}

/// Assemble source code into a program image loaded at `base`
pub fn assemble_program(source: &str, base: Address) -> Result<Program> {
    let program = Program::at(base, assemble(source)?);
    program.validate()?;
    Ok(program)
}
