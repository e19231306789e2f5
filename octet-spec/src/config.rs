//! # Machine Layout Configuration
//!
//! Reset address and stack window of an Octet machine. The stack occupies
//! `[stack_top - stack_size, stack_top)` and grows toward lower addresses.

use crate::{Address, RESET_PC, STACK_SIZE, STACK_TOP};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Initial program counter
    pub reset_pc: Address,
    /// Initial stack pointer; the stack is empty when SP equals this
    pub stack_top: Address,
    /// Number of bytes the stack may hold
    pub stack_size: u16,
}

impl Config {
    /// Default layout: code at 0xFF00, 255-byte stack below 0x00FF
    pub const DEFAULT: Self = Self {
        reset_pc: RESET_PC,
        stack_top: STACK_TOP,
        stack_size: STACK_SIZE,
    };

    /// Create a new configuration with validation
    pub const fn new(reset_pc: Address, stack_top: Address, stack_size: u16) -> Result<Self, ConfigError> {
        let config = Self {
            reset_pc,
            stack_top,
            stack_size,
        };

        if stack_size == 0 {
            return Err(ConfigError::EmptyStack);
        }
        if stack_size > stack_top {
            return Err(ConfigError::StackUnderflowsMemory);
        }
        if reset_pc >= stack_top - stack_size && reset_pc < stack_top {
            return Err(ConfigError::ResetInStack);
        }

        Ok(config)
    }

    /// Lowest address the stack may occupy
    #[inline]
    pub const fn stack_bottom(&self) -> Address {
        self.stack_top.saturating_sub(self.stack_size)
    }

    /// Check if an address falls inside the stack window
    #[inline]
    pub const fn in_stack(&self, address: Address) -> bool {
        address >= self.stack_bottom() && address < self.stack_top
    }

    /// Validate a configuration built by hand
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.reset_pc, self.stack_top, self.stack_size).map(|_| ())
    }

    /// Same layout with a different reset address
    pub fn with_reset_pc(self, reset_pc: Address) -> Result<Self, ConfigError> {
        Self::new(reset_pc, self.stack_top, self.stack_size)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reset={:#06x}, stack=[{:#06x}, {:#06x})",
            self.reset_pc,
            self.stack_bottom(),
            self.stack_top
        )
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stack size must be non-zero
    EmptyStack,
    /// Stack window must not extend below address 0
    StackUnderflowsMemory,
    /// Reset address must lie outside the stack window
    ResetInStack,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyStack => {
                write!(f, "stack_size must be non-zero")
            }
            ConfigError::StackUnderflowsMemory => {
                write!(f, "stack_size must not exceed stack_top")
            }
            ConfigError::ResetInStack => {
                write!(f, "reset_pc must lie outside the stack window")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
