//! Memory subsystem
//!
//! Flat 64 KiB byte array. Every 16-bit address is valid, so byte access
//! never fails; only word access at 0xFFFF (whose second byte would fall
//! outside the address space) and oversized loads are rejected.

use crate::error::{Result, RuntimeError};
use octet_spec::{Address, Word, INSTRUCTION_SIZE, MEMORY_SIZE};

#[derive(Clone)]
pub struct Memory {
    data: Box<[u8]>,
}

impl Memory {
    /// Create zero-filled memory
    pub fn new() -> Self {
        Memory {
            data: vec![0u8; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Rebuild memory from a full image
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != MEMORY_SIZE {
            return Err(RuntimeError::SnapshotSize(bytes.len()));
        }
        Ok(Memory {
            data: bytes.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn read_byte(&self, addr: Address) -> u8 {
        self.data[addr as usize]
    }

    #[inline]
    pub fn write_byte(&mut self, addr: Address, value: u8) {
        self.data[addr as usize] = value;
    }

    /// Read a big-endian word; `None` when it would cross the end of memory
    pub fn read_word(&self, addr: Address) -> Option<Word> {
        let lo_addr = addr.checked_add(1)?;
        Some(u16::from_be_bytes([self.read_byte(addr), self.read_byte(lo_addr)]))
    }

    /// Write a big-endian word
    pub fn write_word(&mut self, addr: Address, word: Word) -> Result<()> {
        let lo_addr = addr.checked_add(1).ok_or(RuntimeError::ProgramOutOfBounds {
            base: addr,
            words: 1,
        })?;
        let [hi, lo] = word.to_be_bytes();
        self.write_byte(addr, hi);
        self.write_byte(lo_addr, lo);
        Ok(())
    }

    /// Write consecutive words starting at `base`, all or nothing
    pub fn load(&mut self, base: Address, words: &[Word]) -> Result<()> {
        let end = base as usize + words.len() * INSTRUCTION_SIZE as usize;
        if end > MEMORY_SIZE {
            return Err(RuntimeError::ProgramOutOfBounds {
                base,
                words: words.len(),
            });
        }

        for (i, &word) in words.iter().enumerate() {
            let at = base as usize + i * INSTRUCTION_SIZE as usize;
            let [hi, lo] = word.to_be_bytes();
            self.data[at] = hi;
            self.data[at + 1] = lo;
        }
        Ok(())
    }

    /// Bytes from `start`, at most `len` of them, clamped to the end of memory
    pub fn slice(&self, start: Address, len: usize) -> &[u8] {
        let start = start as usize;
        let end = start.saturating_add(len).min(MEMORY_SIZE);
        &self.data[start..end]
    }

    /// Entire memory image
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Zero every byte
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.data.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("size", &self.data.len())
            .field("nonzero_bytes", &used)
            .finish()
    }
}
