//! Virtual Machine for the Octet ISA

use crate::dump::{MemoryDump, StateDump};
use crate::error::{Fault, Result, RuntimeError};
use crate::execute::{execute, Flow};
use crate::memory::Memory;
use crate::snapshot::Snapshot;
use crate::state::{HaltReason, MachineState, MachineStatus};
use crate::trace::TraceRow;
use octet_disassembler::DisassemblerError;
use octet_spec::{
    Address, Config, Fields, Flag, Flags, Instruction, Program, Word, IMPLICIT_HALT_WORD,
    INSTRUCTION_SIZE, MEMORY_SIZE, REGISTER_COUNT,
};
use std::collections::VecDeque;

/// Trace rows kept by default before the oldest are dropped
pub const DEFAULT_TRACE_LIMIT: usize = 1 << 16;

/// VM configuration
#[derive(Debug, Clone)]
pub struct VMConfig {
    /// Reset address and stack window
    pub layout: Config,

    /// Collect a [`TraceRow`] per completed cycle
    pub trace: bool,

    /// Most trace rows kept; once full, each new row evicts the oldest, so
    /// a program that never halts only retains its latest cycles
    pub trace_limit: usize,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            layout: Config::DEFAULT,
            trace: false,
            trace_limit: DEFAULT_TRACE_LIMIT,
        }
    }
}

/// Outcome of a bounded or unbounded run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Cycles completed by this call
    pub cycles: u64,

    /// Status after the call
    pub status: MachineStatus,
}

/// What one fetch produced
enum Fetched {
    Instruction(Instruction),
    /// The all-zero word: stop without executing anything
    ImplicitHalt,
}

/// Octet Virtual Machine
#[derive(Debug)]
pub struct VM {
    /// Registers, PC, SP, flags, status
    state: MachineState,

    /// 64 KiB memory
    memory: Memory,

    /// Configuration
    config: VMConfig,

    /// Execution trace (if enabled), oldest first
    trace: VecDeque<TraceRow>,
}

impl VM {
    /// Create a reset machine
    pub fn new(config: VMConfig) -> Result<Self> {
        config.layout.validate().map_err(octet_spec::OctetError::from)?;

        Ok(Self {
            state: MachineState::new(&config.layout),
            memory: Memory::new(),
            config,
            trace: VecDeque::new(),
        })
    }

    /// Create a machine, load a program at its base address and point PC
    /// at the base.
    ///
    /// The base may be any address, including one inside the stack window;
    /// only the configured reset address is checked against the layout.
    pub fn with_program(program: &Program, config: VMConfig) -> Result<Self> {
        let mut vm = Self::new(config)?;
        vm.load_program(program)?;
        vm.set_pc(program.base);
        Ok(vm)
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    // ========================================================================
    // Reset & Loading
    // ========================================================================

    /// Zero memory and registers, PC to the configured reset address
    pub fn reset(&mut self) {
        self.reset_with_pc(self.config.layout.reset_pc);
    }

    /// Zero memory and registers, PC to `pc`
    pub fn reset_with_pc(&mut self, pc: Address) {
        self.memory.clear();
        self.state = MachineState::new(&self.config.layout);
        self.state.pc = pc;
        self.trace.clear();
        tracing::debug!(pc, "machine reset");
    }

    /// Write words starting at `base`, two bytes each, high byte first
    pub fn load(&mut self, base: Address, words: &[Word]) -> Result<()> {
        self.memory.load(base, words)?;
        tracing::debug!(base, words = words.len(), "program loaded");
        Ok(())
    }

    pub fn load_program(&mut self, program: &Program) -> Result<()> {
        self.load(program.base, &program.code)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Run one cycle.
    ///
    /// A halted machine stays halted and does nothing. A faulted machine
    /// refuses to run until reset or restored.
    pub fn step(&mut self) -> Result<MachineStatus> {
        match self.state.status {
            MachineStatus::Running => {}
            MachineStatus::Halted(_) => return Ok(self.state.status),
            MachineStatus::Faulted(fault) => return Err(RuntimeError::Faulted(fault)),
        }

        let pc = self.state.pc;
        let word = self.fetch(pc)?;

        let fetched = if word == IMPLICIT_HALT_WORD {
            Fetched::ImplicitHalt
        } else {
            match octet_disassembler::decode(word) {
                Ok(inst) => Fetched::Instruction(inst),
                Err(DisassemblerError::UnknownOpcode(op)) => {
                    return Err(self.fail(pc, word, Fault::UnknownOpcode(op)))
                }
                Err(_) => {
                    let opcode = Fields::extract(word).opcode;
                    return Err(self.fail(pc, word, Fault::UnknownOpcode(opcode)));
                }
            }
        };

        let flow = match fetched {
            Fetched::ImplicitHalt => {
                tracing::trace!(cycle = self.state.cycles, pc, "zero word, implicit halt");
                Flow::Halt
            }
            Fetched::Instruction(inst) => {
                tracing::trace!(cycle = self.state.cycles, pc, word, "{}", inst);
                execute(&inst, &mut self.state, &mut self.memory, &self.config.layout)
                    .map_err(|fault| self.fail(pc, word, fault))?
            }
        };

        let next = pc.checked_add(INSTRUCTION_SIZE);
        match flow {
            Flow::Jump(target) => self.state.pc = target,
            Flow::Next => match next {
                Some(next) => self.state.pc = next,
                None => {
                    // Committed, but there is nothing left to fetch
                    self.complete_cycle(pc, word);
                    return Err(self.fail(pc, word, Fault::EndOfMemory));
                }
            },
            Flow::Halt => {
                self.state.pc = next.unwrap_or(pc);
                let reason = match fetched {
                    Fetched::ImplicitHalt => HaltReason::ZeroWord,
                    Fetched::Instruction(_) => HaltReason::Instruction,
                };
                self.state.halt(reason);
                tracing::debug!(pc, cycles = self.state.cycles + 1, ?reason, "machine halted");
            }
        }

        self.complete_cycle(pc, word);
        Ok(self.state.status)
    }

    /// Run up to `max_cycles` cycles, stopping early on halt.
    ///
    /// `Ok` means no fault occurred; check `status` to tell a halt from an
    /// exhausted budget.
    pub fn execute(&mut self, max_cycles: u64) -> Result<ExecutionResult> {
        let start = self.state.cycles;
        if let MachineStatus::Faulted(fault) = self.state.status {
            return Err(RuntimeError::Faulted(fault));
        }

        let mut remaining = max_cycles;
        while remaining > 0 && self.state.status.is_running() {
            self.step()?;
            remaining -= 1;
        }

        Ok(ExecutionResult {
            cycles: self.state.cycles - start,
            status: self.state.status,
        })
    }

    /// Run until halted or faulted
    pub fn run(&mut self) -> Result<ExecutionResult> {
        self.execute(u64::MAX)
    }

    /// Read the word at `pc`, faulting when it would cross the end of memory
    fn fetch(&mut self, pc: Address) -> Result<Word> {
        match self.memory.read_word(pc) {
            Some(word) => Ok(word),
            None => {
                let word = (self.memory.read_byte(pc) as Word) << 8;
                Err(self.fail(pc, word, Fault::EndOfMemory))
            }
        }
    }

    /// Move to Faulted and build the error carrying the decoded fields
    fn fail(&mut self, pc: Address, word: Word, fault: Fault) -> RuntimeError {
        let fields = Fields::extract(word);
        self.state.fault(fault);
        tracing::warn!(pc, word, %fields, "execution fault: {}", fault);
        RuntimeError::Execution {
            pc,
            word,
            fields,
            fault,
        }
    }

    fn complete_cycle(&mut self, pc: Address, word: Word) {
        self.state.inc_cycles();
        if self.config.trace && self.config.trace_limit > 0 {
            if self.trace.len() >= self.config.trace_limit {
                self.trace.pop_front();
            }
            self.trace.push_back(TraceRow {
                cycle: self.state.cycles,
                pc,
                word,
                registers: self.state.registers,
                sp: self.state.sp,
                flags: self.state.flags,
            });
        }
    }

    // ========================================================================
    // Host Access
    // ========================================================================

    pub fn read_memory(&self, addr: Address) -> u8 {
        self.memory.read_byte(addr)
    }

    pub fn write_memory(&mut self, addr: Address, value: u8) {
        self.memory.write_byte(addr, value);
    }

    /// Read the big-endian word at `addr`
    pub fn read_instruction(&self, addr: Address) -> Option<Word> {
        self.memory.read_word(addr)
    }

    /// Write a big-endian word at `addr`
    pub fn write_instruction(&mut self, addr: Address, word: Word) -> Result<()> {
        self.memory.write_word(addr, word)
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.state.registers
    }

    pub fn register(&self, index: usize) -> Result<u8> {
        self.state
            .registers
            .get(index)
            .copied()
            .ok_or(RuntimeError::InvalidRegister(index))
    }

    pub fn write_register(&mut self, index: usize, value: u8) -> Result<()> {
        let slot = self
            .state
            .registers
            .get_mut(index)
            .ok_or(RuntimeError::InvalidRegister(index))?;
        *slot = value;
        Ok(())
    }

    pub fn pc(&self) -> Address {
        self.state.pc
    }

    /// Redirect the next fetch
    pub fn set_pc(&mut self, pc: Address) {
        self.state.pc = pc;
    }

    pub fn sp(&self) -> Address {
        self.state.sp
    }

    pub fn flags(&self) -> Flags {
        self.state.flags
    }

    pub fn is_flag_set(&self, flag: Flag) -> bool {
        self.state.flags.is_set(flag)
    }

    pub fn status(&self) -> MachineStatus {
        self.state.status
    }

    /// Cycles completed since reset
    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    /// Get current state (for debugging)
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Get memory (for debugging)
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Rows collected so far, oldest first (empty unless tracing is enabled)
    pub fn trace(&self) -> &VecDeque<TraceRow> {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<TraceRow> {
        Vec::from(std::mem::take(&mut self.trace))
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Registers, PC, SP and flags
    pub fn dump_state(&self) -> StateDump<'_> {
        StateDump {
            state: &self.state,
            memory_size: MEMORY_SIZE,
        }
    }

    /// All of memory in rows of `width` bytes
    pub fn dump_memory(&self, width: usize) -> MemoryDump<'_> {
        MemoryDump::full(&self.memory, width)
    }

    /// `len` bytes from `start` in rows of `width` bytes
    pub fn dump_memory_range(&self, start: Address, len: usize, width: usize) -> MemoryDump<'_> {
        MemoryDump::range(&self.memory, start, len, width)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            layout: self.config.layout,
            state: self.state.clone(),
            memory: self.memory.as_bytes().to_vec(),
        }
    }

    /// Replace the whole machine with a snapshot; clears the trace
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        snapshot.layout.validate().map_err(octet_spec::OctetError::from)?;
        let memory = Memory::from_bytes(snapshot.memory.clone())?;

        self.config.layout = snapshot.layout;
        self.state = snapshot.state.clone();
        self.memory = memory;
        self.trace.clear();
        tracing::debug!(pc = self.state.pc, status = %self.state.status, "snapshot restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octet_spec::Register;

    fn vm_with(words: &[Word]) -> VM {
        let mut vm = VM::new(VMConfig::default()).expect("default config");
        vm.load(octet_spec::RESET_PC, words).expect("fits");
        vm
    }

    fn encode(inst: Instruction) -> Word {
        octet_assembler::encode(&inst)
    }

    #[test]
    fn test_vmconfig_default() {
        let config = VMConfig::default();
        assert_eq!(config.layout, Config::DEFAULT);
        assert!(!config.trace);
        assert_eq!(config.trace_limit, DEFAULT_TRACE_LIMIT);
    }

    #[test]
    fn test_vm_debug() {
        let vm = vm_with(&[]);
        let text = format!("{:?}", vm);
        assert!(text.starts_with("VM"));
        assert!(text.contains("pc: 65280"));
    }

    #[test]
    fn test_trace_limit_keeps_latest_rows() {
        // jp r0, r0 at 0x0000 spins forever
        let config = VMConfig {
            trace: true,
            trace_limit: 4,
            ..VMConfig::default()
        };
        let mut vm = VM::new(config).expect("default layout");
        vm.load(0x0000, &[0x6000]).expect("fits");
        vm.set_pc(0x0000);

        let result = vm.execute(100).expect("no fault");
        assert_eq!(result.status, MachineStatus::Running);
        assert_eq!(vm.cycles(), 100);

        let cycles: Vec<u64> = vm.trace().iter().map(|row| row.cycle).collect();
        assert_eq!(cycles, vec![97, 98, 99, 100]);
    }

    #[test]
    fn test_trace_limit_zero_collects_nothing() {
        let config = VMConfig {
            trace: true,
            trace_limit: 0,
            ..VMConfig::default()
        };
        let mut vm = VM::new(config).expect("default layout");
        vm.load(0xFF00, &[0xD00A, 0xF000]).expect("fits");
        vm.run().expect("halts");
        assert!(vm.trace().is_empty());
    }

    #[test]
    fn test_with_program_base_inside_stack_window() {
        // ldi r1, #7 at 0x0010, which the default stack window covers
        let program = Program::at(0x0010, vec![0xD107, 0xF000]);
        let mut vm = VM::with_program(&program, VMConfig::default()).expect("any base loads");
        assert_eq!(vm.pc(), 0x0010);

        let result = vm.run().expect("halts");
        assert_eq!(result.status, MachineStatus::Halted(HaltReason::Instruction));
        assert_eq!(vm.registers()[1], 7);
        assert_eq!(vm.pc(), 0x0014);
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let config = VMConfig {
            layout: Config {
                reset_pc: 0x0090,
                stack_top: 0x0100,
                stack_size: 0x80,
            },
            ..VMConfig::default()
        };
        assert!(matches!(VM::new(config), Err(RuntimeError::SpecError(_))));
    }

    #[test]
    fn test_step_advances_pc() {
        let mut vm = vm_with(&[encode(Instruction::LoadFromImm {
            dst: Register::R0,
            imm: 5,
        })]);
        assert_eq!(vm.step().ok(), Some(MachineStatus::Running));
        assert_eq!(vm.pc(), 0xFF02);
        assert_eq!(vm.registers()[0], 5);
        assert_eq!(vm.cycles(), 1);
    }

    #[test]
    fn test_zero_word_halts() {
        let mut vm = vm_with(&[]);
        let result = vm.run().expect("no fault");
        assert_eq!(result.status, MachineStatus::Halted(HaltReason::ZeroWord));
        assert!(vm.is_flag_set(Flag::Halt));
        assert_eq!(result.cycles, 1);
    }

    #[test]
    fn test_halt_is_sticky() {
        let mut vm = vm_with(&[encode(Instruction::Halt)]);
        vm.run().expect("halts");
        let again = vm.execute(10).expect("no-op");
        assert_eq!(again.cycles, 0);
        assert_eq!(again.status, MachineStatus::Halted(HaltReason::Instruction));
    }

    #[test]
    fn test_fault_is_terminal() {
        let mut vm = vm_with(&[encode(Instruction::Pop { dst: Register::R0 })]);
        let err = vm.run().expect_err("underflow");
        assert_eq!(err.fault(), Some(Fault::StackUnderflow));
        assert_eq!(vm.status(), MachineStatus::Faulted(Fault::StackUnderflow));
        assert_eq!(vm.pc(), 0xFF00);
        assert_eq!(vm.cycles(), 0);

        assert!(matches!(vm.step(), Err(RuntimeError::Faulted(Fault::StackUnderflow))));
        assert!(matches!(vm.execute(1), Err(RuntimeError::Faulted(_))));
    }

    #[test]
    fn test_end_of_memory_fetch() {
        let mut vm = VM::new(VMConfig::default()).expect("default config");
        vm.set_pc(0xFFFF);
        vm.write_memory(0xFFFF, 0xD0);
        let err = vm.step().expect_err("cannot fetch");
        assert!(matches!(
            err,
            RuntimeError::Execution {
                pc: 0xFFFF,
                fault: Fault::EndOfMemory,
                ..
            }
        ));
    }

    #[test]
    fn test_end_of_memory_after_last_word() {
        let mut vm = VM::new(VMConfig::default()).expect("default config");
        vm.reset_with_pc(0xFFFE);
        vm.write_instruction(0xFFFE, 0xD07F).expect("fits");
        let err = vm.run().expect_err("nothing after 0xFFFE");
        assert_eq!(err.fault(), Some(Fault::EndOfMemory));
        // The last instruction still took effect
        assert_eq!(vm.registers()[0], 0x7F);
        assert_eq!(vm.cycles(), 1);
    }

    #[test]
    fn test_execute_budget() {
        let ldi = encode(Instruction::LoadFromImm {
            dst: Register::R1,
            imm: 1,
        });
        let mut vm = vm_with(&[ldi, ldi, ldi, ldi]);
        let result = vm.execute(2).expect("no fault");
        assert_eq!(result.cycles, 2);
        assert_eq!(result.status, MachineStatus::Running);
        assert_eq!(vm.pc(), 0xFF04);
    }

    #[test]
    fn test_trace_collection() {
        let config = VMConfig {
            trace: true,
            ..VMConfig::default()
        };
        let mut vm = VM::new(config).expect("default layout");
        vm.load(0xFF00, &[0xD00A, 0xF000]).expect("fits");
        vm.run().expect("halts");

        let trace = vm.trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].pc, 0xFF00);
        assert_eq!(trace[0].registers[0], 10);
        assert_eq!(trace[1].word, 0xF000);
        assert!(trace[1].flags.is_set(Flag::Halt));
    }

    #[test]
    fn test_register_host_access() {
        let mut vm = VM::new(VMConfig::default()).expect("default config");
        vm.write_register(7, 0xFF).expect("valid");
        assert_eq!(vm.register(7).ok(), Some(0xFF));
        assert!(matches!(vm.register(8), Err(RuntimeError::InvalidRegister(8))));
        assert!(vm.write_register(8, 1).is_err());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut vm = vm_with(&[0xD0FF]);
        vm.run().expect("halts");
        vm.reset_with_pc(0x1000);
        assert_eq!(vm.pc(), 0x1000);
        assert_eq!(vm.registers(), &[0; 8]);
        assert_eq!(vm.read_instruction(0xFF00), Some(0));
        assert_eq!(vm.status(), MachineStatus::Running);
        assert_eq!(vm.cycles(), 0);
    }
}
