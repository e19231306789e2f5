//! Instruction execution
//!
//! Registers are validated before anything is touched, and every fault is
//! raised before the first write, so a failed instruction leaves the state
//! exactly as it found it.

use crate::error::Fault;
use crate::memory::Memory;
use crate::state::MachineState;
use octet_spec::{Address, Config, Flag, Instruction, Register};

/// What the run loop does with the PC after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to the next instruction
    Next,
    /// Fetch the next instruction from exactly this address
    Jump(Address),
    /// `hlt` executed
    Halt,
}

#[inline]
fn address(state: &MachineState, hi: Register, lo: Register) -> Result<Address, Fault> {
    Ok(u16::from_be_bytes([state.read_reg(hi)?, state.read_reg(lo)?]))
}

/// Execute single instruction
pub fn execute(
    instr: &Instruction,
    state: &mut MachineState,
    memory: &mut Memory,
    layout: &Config,
) -> Result<Flow, Fault> {
    if let Some(reg) = instr.invalid_register() {
        return Err(Fault::InvalidRegister(reg));
    }

    match *instr {
        // ========== Load / Store ==========
        Instruction::LoadFromReg { dst, src } => {
            let value = state.read_reg(src)?;
            state.write_reg(dst, value)?;
            state.flags.set_zn(value);
        }

        Instruction::LoadFromImm { dst, imm } => {
            state.write_reg(dst, imm)?;
            state.flags.set_zn(imm);
        }

        Instruction::LoadFromMem { dst, hi, lo } => {
            let value = memory.read_byte(address(state, hi, lo)?);
            state.write_reg(dst, value)?;
            state.flags.set_zn(value);
        }

        Instruction::Store { hi, lo, src } => {
            let addr = address(state, hi, lo)?;
            let value = state.read_reg(src)?;
            memory.write_byte(addr, value);
            state.flags.set_zn(value);
        }

        // ========== Arithmetic ==========
        Instruction::Add { dst, lhs, rhs } => {
            let (value, overflow) = state.read_reg(lhs)?.overflowing_add(state.read_reg(rhs)?);
            state.write_reg(dst, value)?;
            state.flags.assign(Flag::Overflow, overflow);
            state.flags.set_zn(value);
        }

        Instruction::Sub { dst, lhs, rhs } => {
            let (value, borrow) = state.read_reg(lhs)?.overflowing_sub(state.read_reg(rhs)?);
            state.write_reg(dst, value)?;
            state.flags.assign(Flag::Carry, borrow);
            state.flags.set_zn(value);
        }

        Instruction::Mul { dst, lhs, rhs } => {
            let (value, overflow) = state.read_reg(lhs)?.overflowing_mul(state.read_reg(rhs)?);
            state.write_reg(dst, value)?;
            state.flags.assign(Flag::Overflow, overflow);
            state.flags.set_zn(value);
        }

        Instruction::Div { dst, lhs, rhs } => {
            let value = state
                .read_reg(lhs)?
                .checked_div(state.read_reg(rhs)?)
                .ok_or(Fault::DivisionByZero)?;
            state.write_reg(dst, value)?;
            state.flags.set_zn(value);
        }

        // ========== Logical ==========
        Instruction::And { dst, lhs, rhs } => {
            let value = state.read_reg(lhs)? & state.read_reg(rhs)?;
            state.write_reg(dst, value)?;
            state.flags.set_zn(value);
        }

        Instruction::Or { dst, lhs, rhs } => {
            let value = state.read_reg(lhs)? | state.read_reg(rhs)?;
            state.write_reg(dst, value)?;
            state.flags.set_zn(value);
        }

        Instruction::Xor { dst, lhs, rhs } => {
            let value = state.read_reg(lhs)? ^ state.read_reg(rhs)?;
            state.write_reg(dst, value)?;
            state.flags.set_zn(value);
        }

        // ========== Control ==========
        Instruction::Jump { hi, lo } => {
            return Ok(Flow::Jump(address(state, hi, lo)?));
        }

        Instruction::JumpIfZero { hi, lo } => {
            let target = address(state, hi, lo)?;
            if state.flags.is_set(Flag::Zero) {
                return Ok(Flow::Jump(target));
            }
        }

        // ========== Stack ==========
        Instruction::Push { src } => {
            let value = state.read_reg(src)?;
            if state.sp <= layout.stack_bottom() {
                return Err(Fault::StackOverflow);
            }
            state.sp -= 1;
            memory.write_byte(state.sp, value);
        }

        Instruction::Pop { dst } => {
            if state.sp >= layout.stack_top {
                return Err(Fault::StackUnderflow);
            }
            let value = memory.read_byte(state.sp);
            state.write_reg(dst, value)?;
            state.sp += 1;
        }

        // ========== System ==========
        Instruction::Halt => {
            state.flags.set(Flag::Halt);
            return Ok(Flow::Halt);
        }
    }

    Ok(Flow::Next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (MachineState, Memory, Config) {
        let config = Config::DEFAULT;
        (MachineState::new(&config), Memory::new(), config)
    }

    fn run(instr: Instruction, state: &mut MachineState, memory: &mut Memory) -> Result<Flow, Fault> {
        execute(&instr, state, memory, &Config::DEFAULT)
    }

    #[test]
    fn test_add_overflow() {
        let (mut state, mut mem, _) = setup();
        state.registers[1] = 128;
        state.registers[2] = 129;
        let add = Instruction::Add {
            dst: Register::R0,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        assert_eq!(run(add, &mut state, &mut mem), Ok(Flow::Next));
        assert_eq!(state.registers[0], 1);
        assert!(state.flags.is_set(Flag::Overflow));
        assert!(!state.flags.is_set(Flag::Zero));
        assert!(!state.flags.is_set(Flag::Negative));
    }

    #[test]
    fn test_add_clears_overflow() {
        let (mut state, mut mem, _) = setup();
        state.flags.set(Flag::Overflow);
        state.registers[1] = 128;
        state.registers[2] = 2;
        let add = Instruction::Add {
            dst: Register::R0,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        run(add, &mut state, &mut mem).expect("add");
        assert_eq!(state.registers[0], 130);
        assert!(!state.flags.is_set(Flag::Overflow));
        assert!(state.flags.is_set(Flag::Negative));
    }

    #[test]
    fn test_add_zero() {
        let (mut state, mut mem, _) = setup();
        let add = Instruction::Add {
            dst: Register::R0,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        run(add, &mut state, &mut mem).expect("add");
        assert!(state.flags.is_set(Flag::Zero));
    }

    #[test]
    fn test_sub_borrow() {
        let (mut state, mut mem, _) = setup();
        state.registers[1] = 5;
        state.registers[2] = 10;
        let sub = Instruction::Sub {
            dst: Register::R0,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        run(sub, &mut state, &mut mem).expect("sub");
        assert_eq!(state.registers[0], 251);
        assert!(state.flags.is_set(Flag::Carry));
        assert!(state.flags.is_set(Flag::Negative));
    }

    #[test]
    fn test_mul_overflow() {
        let (mut state, mut mem, _) = setup();
        state.registers[1] = 16;
        state.registers[2] = 17;
        let mul = Instruction::Mul {
            dst: Register::R3,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        run(mul, &mut state, &mut mem).expect("mul");
        assert_eq!(state.registers[3], (16u16 * 17 % 256) as u8);
        assert!(state.flags.is_set(Flag::Overflow));
    }

    #[test]
    fn test_div_by_zero_preserves_dst() {
        let (mut state, mut mem, _) = setup();
        state.registers[0] = 0x42;
        state.registers[1] = 9;
        let div = Instruction::Div {
            dst: Register::R0,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        let before = state.clone();
        assert_eq!(run(div, &mut state, &mut mem), Err(Fault::DivisionByZero));
        assert_eq!(state, before);
    }

    #[test]
    fn test_div() {
        let (mut state, mut mem, _) = setup();
        state.registers[1] = 200;
        state.registers[2] = 7;
        let div = Instruction::Div {
            dst: Register::R0,
            lhs: Register::R1,
            rhs: Register::R2,
        };
        run(div, &mut state, &mut mem).expect("div");
        assert_eq!(state.registers[0], 28);
    }

    #[test]
    fn test_logic_ops() {
        let (mut state, mut mem, _) = setup();
        state.registers[1] = 0b1100_1010;
        state.registers[2] = 0b1010_0110;
        let (r0, r1, r2) = (Register::R0, Register::R1, Register::R2);

        run(Instruction::And { dst: r0, lhs: r1, rhs: r2 }, &mut state, &mut mem).expect("and");
        assert_eq!(state.registers[0], 0b1000_0010);
        run(Instruction::Or { dst: r0, lhs: r1, rhs: r2 }, &mut state, &mut mem).expect("or");
        assert_eq!(state.registers[0], 0b1110_1110);
        run(Instruction::Xor { dst: r0, lhs: r1, rhs: r1 }, &mut state, &mut mem).expect("xor");
        assert_eq!(state.registers[0], 0);
        assert!(state.flags.is_set(Flag::Zero));
    }

    #[test]
    fn test_load_and_store_memory() {
        let (mut state, mut mem, _) = setup();
        state.registers[1] = 0x12;
        state.registers[2] = 0x34;
        state.registers[3] = 42;
        let st = Instruction::Store {
            hi: Register::R1,
            lo: Register::R2,
            src: Register::R3,
        };
        run(st, &mut state, &mut mem).expect("st");
        assert_eq!(mem.read_byte(0x1234), 42);

        let ldm = Instruction::LoadFromMem {
            dst: Register::R4,
            hi: Register::R1,
            lo: Register::R2,
        };
        run(ldm, &mut state, &mut mem).expect("ldm");
        assert_eq!(state.registers[4], 42);
    }

    #[test]
    fn test_invalid_register_faults_first() {
        let (mut state, mut mem, _) = setup();
        let ldi = Instruction::LoadFromImm {
            dst: Register::new(10),
            imm: 1,
        };
        assert_eq!(
            run(ldi, &mut state, &mut mem),
            Err(Fault::InvalidRegister(Register::new(10)))
        );
        assert_eq!(state, MachineState::new(&Config::DEFAULT));
    }

    #[test]
    fn test_jump_targets() {
        let (mut state, mut mem, _) = setup();
        state.registers[7] = 0xFF;
        state.registers[3] = 0x10;
        let jz = Instruction::JumpIfZero {
            hi: Register::R7,
            lo: Register::R3,
        };
        assert_eq!(run(jz, &mut state, &mut mem), Ok(Flow::Next));
        state.flags.set(Flag::Zero);
        assert_eq!(run(jz, &mut state, &mut mem), Ok(Flow::Jump(0xFF10)));

        let jp = Instruction::Jump {
            hi: Register::R0,
            lo: Register::R0,
        };
        assert_eq!(run(jp, &mut state, &mut mem), Ok(Flow::Jump(0x0000)));
    }

    #[test]
    fn test_push_pop() {
        let (mut state, mut mem, _) = setup();
        state.registers[0] = 0x5A;
        run(Instruction::Push { src: Register::R0 }, &mut state, &mut mem).expect("push");
        assert_eq!(state.sp, 0x00FE);
        assert_eq!(mem.read_byte(0x00FE), 0x5A);

        run(Instruction::Pop { dst: Register::R1 }, &mut state, &mut mem).expect("pop");
        assert_eq!(state.registers[1], 0x5A);
        assert_eq!(state.sp, 0x00FF);
    }

    #[test]
    fn test_pop_empty() {
        let (mut state, mut mem, _) = setup();
        let pop = Instruction::Pop { dst: Register::R0 };
        assert_eq!(run(pop, &mut state, &mut mem), Err(Fault::StackUnderflow));
        assert_eq!(state.sp, 0x00FF);
    }

    #[test]
    fn test_push_full() {
        let (mut state, mut mem, config) = setup();
        state.sp = config.stack_bottom();
        let push = Instruction::Push { src: Register::R0 };
        assert_eq!(run(push, &mut state, &mut mem), Err(Fault::StackOverflow));
        assert_eq!(state.sp, config.stack_bottom());
    }

    #[test]
    fn test_halt() {
        let (mut state, mut mem, _) = setup();
        assert_eq!(run(Instruction::Halt, &mut state, &mut mem), Ok(Flow::Halt));
        assert!(state.flags.is_set(Flag::Halt));
    }
}
