//! Instruction formatting to assembly text

use octet_spec::{Instruction, Operands, Register};

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let mnemonic = instr.mnemonic();
    match instr.operands() {
        Operands::None => mnemonic.to_string(),
        Operands::One(a) => format!("{} {}", mnemonic, format_reg(a)),
        Operands::Two(a, b) => format!("{} {}, {}", mnemonic, format_reg(a), format_reg(b)),
        Operands::Three(a, b, c) => format!(
            "{} {}, {}, {}",
            mnemonic,
            format_reg(a),
            format_reg(b),
            format_reg(c)
        ),
        Operands::RegImm(a, imm) => format!("{} {}, {}", mnemonic, format_reg(a), format_imm(imm)),
    }
}

fn format_reg(reg: Register) -> String {
    format!("r{}", reg.index())
}

fn format_imm(imm: u8) -> String {
    format!("#{}", imm)
}
