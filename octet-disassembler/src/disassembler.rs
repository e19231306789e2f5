//! Main disassembler logic
//!
//! Words are handled one at a time. A word that fails [`decode_strict`] is
//! logged, recorded as rejected and left out of the text; the rest of the
//! program is still rendered.

use crate::decoder::decode_strict;
use crate::error::DisassemblerError;
use crate::formatter::format;
use octet_spec::{Address, Instruction, Program, Word};

/// One successfully disassembled word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Position of the word in the input
    pub index: usize,
    pub address: Address,
    pub word: Word,
    pub instruction: Instruction,
}

/// A word the disassembler refused to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub index: usize,
    pub address: Address,
    pub word: Word,
    pub error: DisassemblerError,
}

/// Result of disassembling a run of words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disassembly {
    pub lines: Vec<Line>,
    pub rejected: Vec<Rejected>,
}

impl Disassembly {
    /// Assembly text, one instruction per line
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| format(&line.instruction) + "\n")
            .collect()
    }

    /// Check if every word was rendered
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Disassemble a bare run of words
pub fn disassemble(words: &[Word]) -> Disassembly {
    disassemble_program(&Program::at(0, words.to_vec()))
}

/// Disassemble a program, tagging every word with its load address
pub fn disassemble_program(program: &Program) -> Disassembly {
    let mut out = Disassembly::default();

    for (index, &word) in program.code.iter().enumerate() {
        let address = program.address_of(index);
        match decode_strict(word) {
            Ok(instruction) => out.lines.push(Line {
                index,
                address,
                word,
                instruction,
            }),
            Err(error) => {
                tracing::warn!(index, address, word, "{}", error);
                out.rejected.push(Rejected {
                    index,
                    address,
                    word,
                    error,
                });
            }
        }
    }

    out
}

/// Render a program as an annotated listing with address and hex columns
pub fn listing(program: &Program) -> String {
    let mut output = String::new();

    output.push_str("; Octet disassembly\n");
    output.push_str(&format!("; Base: 0x{:04X}\n", program.base));
    output.push_str(&format!(
        "; Code size: {} bytes ({} instructions)\n",
        program.byte_len(),
        program.code.len()
    ));
    output.push('\n');

    for (index, &word) in program.code.iter().enumerate() {
        // Address label
        output.push_str(&format!("0x{:04X}:  ", program.address_of(index)));

        // Hex encoding
        output.push_str(&format!("{:04X}  ", word));

        match decode_strict(word) {
            Ok(instr) => output.push_str(&format(&instr)),
            Err(e) => output.push_str(&format!("; ERROR: {}", e)),
        }

        output.push('\n');
    }

    output
}
