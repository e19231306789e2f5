//! Tests for malformed input handling in the assembler
//!
//! Any bad line fails the whole source; no partial output is produced.

use octet_assembler::{assemble, AssemblerError};

// ============================================================================
// Invalid Instruction Tests
// ============================================================================

#[test]
fn test_unknown_instruction() {
    let result = assemble("mov r0, 0x100");

    if let Err(AssemblerError::UnknownInstruction { mnemonic, line }) = result {
        assert_eq!(mnemonic, "mov");
        assert_eq!(line, 1);
    } else {
        panic!("Expected UnknownInstruction error");
    }
}

#[test]
fn test_instruction_typo() {
    assert!(assemble("addd r1, r2, r3").is_err());
}

#[test]
fn test_operand_where_mnemonic_expected() {
    assert!(matches!(
        assemble("r1 r2"),
        Err(AssemblerError::SyntaxError { line: 1, column: 1, .. })
    ));
}

// ============================================================================
// Invalid Operand Tests
// ============================================================================

#[test]
fn test_invalid_register() {
    let result = assemble("\n        push r512\n    ");
    assert!(matches!(
        result,
        Err(AssemblerError::InvalidRegister { line: 2, ref text }) if text == "r512"
    ));
}

#[test]
fn test_invalid_immediate() {
    let result = assemble("ldi r0, #0x100");
    assert!(matches!(
        result,
        Err(AssemblerError::InvalidImmediate { ref text, .. }) if text == "#0x100"
    ));
}

#[test]
fn test_bare_number_operand() {
    assert!(assemble("ldi r0, 10").is_err());
}

// ============================================================================
// Invalid Operand Count Tests
// ============================================================================

#[test]
fn test_too_many_arguments() {
    assert!(assemble("pop r0, r1, r2, r7").is_err());
    assert!(matches!(
        assemble("pop r0, r1"),
        Err(AssemblerError::OperandCount {
            mnemonic: "pop",
            expected: 1,
            found: 2,
            ..
        })
    ));
}

#[test]
fn test_missing_operands() {
    assert!(matches!(
        assemble("add r1, r2"),
        Err(AssemblerError::OperandCount { expected: 3, found: 2, .. })
    ));
    assert!(matches!(
        assemble("ldi r1"),
        Err(AssemblerError::OperandCount { expected: 2, found: 1, .. })
    ));
}

// ============================================================================
// All-Or-Nothing
// ============================================================================

#[test]
fn test_late_error_discards_everything() {
    let source = "ldi r0, #1\nldi r1, #2\nadd r0, r0, r1\nldi r2, #300\nhlt\n";
    let err = assemble(source).expect_err("line 4 is out of range");
    assert_eq!(err.line(), Some(4));
    assert!(err.to_string().contains("line 4"));
}

#[test]
fn test_comments_are_not_supported() {
    assert!(assemble("hlt ; stop").is_err());
}
