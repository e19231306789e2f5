//! Machine state: registers, PC, SP, flags and run status

use crate::error::Fault;
use octet_spec::{Address, Config, Flag, Flags, Register, REGISTER_COUNT};
use serde::{Deserialize, Serialize};

/// Why the machine stopped normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaltReason {
    /// `hlt` executed
    Instruction,
    /// Fetched the all-zero word
    ZeroWord,
}

/// Engine run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineStatus {
    Running,
    Halted(HaltReason),
    Faulted(Fault),
}

impl MachineStatus {
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, MachineStatus::Running)
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        matches!(self, MachineStatus::Halted(_))
    }

    #[inline]
    pub fn is_faulted(&self) -> bool {
        matches!(self, MachineStatus::Faulted(_))
    }
}

impl std::fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineStatus::Running => write!(f, "running"),
            MachineStatus::Halted(HaltReason::Instruction) => write!(f, "halted"),
            MachineStatus::Halted(HaltReason::ZeroWord) => write!(f, "halted (zero word)"),
            MachineStatus::Faulted(fault) => write!(f, "faulted: {}", fault),
        }
    }
}

/// Machine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    /// General-purpose registers (r0-r7)
    pub registers: [u8; REGISTER_COUNT],

    /// Program counter
    pub pc: Address,

    /// Stack pointer
    pub sp: Address,

    /// Status flags
    pub flags: Flags,

    /// Cycles executed since reset
    pub cycles: u64,

    /// Run status
    pub status: MachineStatus,
}

impl MachineState {
    pub fn new(config: &Config) -> Self {
        MachineState {
            registers: [0; REGISTER_COUNT],
            pc: config.reset_pc,
            sp: config.stack_top,
            flags: Flags::new(),
            cycles: 0,
            status: MachineStatus::Running,
        }
    }

    /// Read register
    #[inline]
    pub fn read_reg(&self, reg: Register) -> Result<u8, Fault> {
        self.registers
            .get(reg.index() as usize)
            .copied()
            .ok_or(Fault::InvalidRegister(reg))
    }

    /// Write register
    #[inline]
    pub fn write_reg(&mut self, reg: Register, value: u8) -> Result<(), Fault> {
        let slot = self
            .registers
            .get_mut(reg.index() as usize)
            .ok_or(Fault::InvalidRegister(reg))?;
        *slot = value;
        Ok(())
    }

    /// Halt execution
    pub fn halt(&mut self, reason: HaltReason) {
        self.flags.set(Flag::Halt);
        self.status = MachineStatus::Halted(reason);
    }

    /// Stop permanently on a fault
    pub fn fault(&mut self, fault: Fault) {
        self.status = MachineStatus::Faulted(fault);
    }

    #[inline]
    pub fn inc_cycles(&mut self) {
        self.cycles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = MachineState::new(&Config::DEFAULT);
        assert_eq!(state.registers, [0; 8]);
        assert_eq!(state.pc, 0xFF00);
        assert_eq!(state.sp, 0x00FF);
        assert_eq!(state.flags.bits(), 0);
        assert!(state.status.is_running());
    }

    #[test]
    fn test_register_access() {
        let mut state = MachineState::new(&Config::DEFAULT);
        assert_eq!(state.write_reg(Register::R7, 0xAA), Ok(()));
        assert_eq!(state.read_reg(Register::R7), Ok(0xAA));

        let bad = Register::new(8);
        assert_eq!(state.read_reg(bad), Err(Fault::InvalidRegister(bad)));
        assert_eq!(state.write_reg(bad, 1), Err(Fault::InvalidRegister(bad)));
    }

    #[test]
    fn test_halt_sets_flag() {
        let mut state = MachineState::new(&Config::DEFAULT);
        state.halt(HaltReason::ZeroWord);
        assert!(state.flags.is_set(Flag::Halt));
        assert_eq!(state.status, MachineStatus::Halted(HaltReason::ZeroWord));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(MachineStatus::Running.to_string(), "running");
        assert_eq!(
            MachineStatus::Faulted(Fault::StackUnderflow).to_string(),
            "faulted: stack underflow"
        );
    }
}
