//! # Lexer for Octet Assembly
//!
//! Lexes a single source line; the assembler splits lines itself.

use logos::Logos;

/// Tokens for Octet assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    /// Register: `r` followed by exactly one decimal digit
    #[regex(r"r[0-9]", |lex| lex.slice()[1..].parse::<u8>().ok())]
    Register(u8),

    /// Immediate: `#` then decimal, or `#0x` then hexadecimal
    #[regex(r"#[0-9]+", |lex| lex.slice()[1..].parse::<u32>().ok())]
    #[regex(r"#0[xX][0-9a-fA-F]+", |lex| u32::from_str_radix(&lex.slice()[3..], 16).ok())]
    Immediate(u32),

    /// Mnemonics, and anything else word-shaped
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token(",")]
    Comma,
}
