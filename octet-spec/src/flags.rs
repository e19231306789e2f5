//! Status flags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Single status flag, valued by its bit in the flags byte
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    Carry = 1 << 0,
    Zero = 1 << 1,
    Overflow = 1 << 2,
    Negative = 1 << 3,
    Halt = 1 << 4,
}

impl Flag {
    /// All flags, lowest bit first
    pub const ALL: [Flag; 5] = [
        Flag::Carry,
        Flag::Zero,
        Flag::Overflow,
        Flag::Negative,
        Flag::Halt,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Letter used in the flag string
    pub const fn letter(self) -> char {
        match self {
            Flag::Carry => 'C',
            Flag::Zero => 'Z',
            Flag::Overflow => 'O',
            Flag::Negative => 'N',
            Flag::Halt => 'H',
        }
    }
}

/// Flags register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags(u8);

impl Flags {
    /// Width of the rendered flag string
    pub const DISPLAY_WIDTH: usize = 8;

    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_set(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    #[inline]
    pub fn clear(&mut self, flag: Flag) {
        self.0 &= !flag.bit();
    }

    /// Set or clear a flag from a condition
    #[inline]
    pub fn assign(&mut self, flag: Flag, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update Zero and Negative from a result byte
    pub fn set_zn(&mut self, value: u8) {
        self.assign(Flag::Zero, value == 0);
        self.assign(Flag::Negative, value & 0x80 != 0);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl fmt::Display for Flags {
    /// Fixed-width code, highest bit first: `...HNOZC`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::with_capacity(Self::DISPLAY_WIDTH);
        for bit in (0..Self::DISPLAY_WIDTH).rev() {
            let letter = Flag::ALL
                .iter()
                .find(|flag| flag.bit() == 1 << bit)
                .filter(|flag| self.is_set(**flag))
                .map(|flag| flag.letter());
            text.push(letter.unwrap_or('.'));
        }
        write!(f, "{}", text)
    }
}
