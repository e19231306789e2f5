//! Assembly parser
//!
//! One instruction per line: a mnemonic followed by operands separated by
//! whitespace, each optionally followed by a single comma. Register range is
//! not checked here; `r8` and `r9` assemble and fail later.

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use octet_spec::{Arity, Instruction, Opcode, Operands, Register};

/// Alternate spellings accepted for mnemonics
const ALIASES: &[(&str, Opcode)] = &[("done", Opcode::Halt)];

/// A parsed operand before it is matched against the opcode's arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Register(Register),
    Immediate(u8),
}

/// Parse a single instruction from assembly text
pub fn parse_instruction(text: &str) -> Result<Instruction> {
    parse_line(text, 1)?.ok_or_else(|| AssemblerError::SyntaxError {
        line: 1,
        column: 1,
        message: "Empty instruction".to_string(),
    })
}

/// Parse register name
pub fn parse_register(name: &str) -> Result<Register> {
    let name = name.trim().trim_end_matches(',');
    match Token::lexer(name).collect::<Vec<_>>().as_slice() {
        [Ok(Token::Register(index))] => Ok(Register::new(*index)),
        _ => Err(AssemblerError::InvalidRegister {
            line: 1,
            text: name.to_string(),
        }),
    }
}

/// Parse one source line; blank lines yield `None`.
///
/// `line` is the 1-based line number reported in errors.
pub fn parse_line(text: &str, line: usize) -> Result<Option<Instruction>> {
    let mut lex = Token::lexer(text);

    let mnemonic = match lex.next() {
        None => return Ok(None),
        Some(Ok(Token::Identifier(name))) => name,
        Some(_) => {
            return Err(syntax(line, lex.span().start, format!(
                "expected mnemonic, found '{}'",
                lex.slice()
            )))
        }
    };

    let opcode = lookup_mnemonic(&mnemonic).ok_or_else(|| AssemblerError::UnknownInstruction {
        line,
        mnemonic: mnemonic.clone(),
    })?;

    let mut operands = Vec::new();
    // A comma is only allowed directly after an operand
    let mut comma_allowed = false;

    while let Some(token) = lex.next() {
        let column = lex.span().start;
        let slice = lex.slice();
        match token {
            Ok(Token::Register(index)) => {
                operands.push(Operand::Register(Register::new(index)));
                comma_allowed = true;
            }
            Ok(Token::Immediate(value)) => {
                let imm = u8::try_from(value).map_err(|_| AssemblerError::InvalidImmediate {
                    line,
                    text: slice.to_string(),
                })?;
                operands.push(Operand::Immediate(imm));
                comma_allowed = true;
            }
            Ok(Token::Comma) if comma_allowed => comma_allowed = false,
            Ok(Token::Comma) => return Err(syntax(line, column, "unexpected ','".to_string())),
            Ok(Token::Identifier(word)) if word.starts_with(['r', 'R']) => {
                return Err(AssemblerError::InvalidRegister { line, text: word })
            }
            Ok(Token::Identifier(word)) => {
                return Err(syntax(line, column, format!("unparsable operand '{}'", word)))
            }
            Err(()) if slice.starts_with('#') => {
                return Err(AssemblerError::InvalidImmediate {
                    line,
                    text: immediate_text(text, column),
                })
            }
            Err(()) => return Err(syntax(line, column, format!("unexpected '{}'", slice))),
        }
    }

    build(opcode, &operands, line).map(Some)
}

/// Match parsed operands against the opcode's arity
fn build(opcode: Opcode, operands: &[Operand], line: usize) -> Result<Instruction> {
    use Operand::{Immediate as I, Register as R};

    let arity = opcode.arity();
    if operands.len() != arity.operand_count() {
        return Err(AssemblerError::OperandCount {
            line,
            mnemonic: opcode.mnemonic(),
            expected: arity.operand_count(),
            found: operands.len(),
        });
    }

    let shaped = match (arity, operands) {
        (Arity::NoOperand, []) => Operands::None,
        (Arity::OneReg, [R(a)]) => Operands::One(*a),
        (Arity::TwoReg, [R(a), R(b)]) => Operands::Two(*a, *b),
        (Arity::ThreeReg, [R(a), R(b), R(c)]) => Operands::Three(*a, *b, *c),
        (Arity::RegImm, [R(a), I(imm)]) => Operands::RegImm(*a, *imm),
        _ => {
            return Err(AssemblerError::OperandKind {
                line,
                mnemonic: opcode.mnemonic(),
                arity,
            })
        }
    };

    Ok(Instruction::new(opcode, shaped)?)
}

/// Resolve a mnemonic, ignoring case
pub fn lookup_mnemonic(mnemonic: &str) -> Option<Opcode> {
    let mnemonic = mnemonic.to_lowercase();
    Opcode::from_mnemonic(&mnemonic).or_else(|| {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == mnemonic)
            .map(|(_, opcode)| *opcode)
    })
}

fn syntax(line: usize, offset: usize, message: String) -> AssemblerError {
    AssemblerError::SyntaxError {
        line,
        column: offset + 1,
        message,
    }
}

/// The whitespace- or comma-delimited word starting at `offset`
fn immediate_text(text: &str, offset: usize) -> String {
    text[offset..]
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
        .to_string()
}
