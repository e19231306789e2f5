//! Register definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of general-purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Register operand (r0-r7 are valid).
///
/// Holds the raw 4-bit field value. Indices 8-15 are representable because
/// the encoding has room for them; they are rejected at execution and
/// disassembly time, not at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Register(u8);

impl Register {
    pub const R0: Self = Self(0);
    pub const R1: Self = Self(1);
    pub const R2: Self = Self(2);
    pub const R3: Self = Self(3);
    pub const R4: Self = Self(4);
    pub const R5: Self = Self(5);
    pub const R6: Self = Self(6);
    pub const R7: Self = Self(7);

    #[inline]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Construct only if the index names an existing register
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Check if the index is below [`REGISTER_COUNT`]
    #[inline]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < REGISTER_COUNT
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validity() {
        assert!(Register::R0.is_valid());
        assert!(Register::R7.is_valid());
        assert!(!Register::new(8).is_valid());
        assert!(!Register::new(15).is_valid());
    }

    #[test]
    fn test_from_index() {
        assert_eq!(Register::from_index(3), Some(Register::R3));
        assert_eq!(Register::from_index(8), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Register::R5.to_string(), "r5");
        assert_eq!(Register::new(9).to_string(), "r9");
    }
}
