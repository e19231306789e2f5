//! Machine snapshots
//!
//! A faulted machine stays faulted until it is reset or restored. Snapshots
//! let a host save state before a risky run, repair it, and resume.

use crate::error::Result;
use crate::state::MachineState;
use octet_spec::Config;
use serde::{Deserialize, Serialize};

/// Complete copy of a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layout: Config,
    pub state: MachineState,
    pub memory: Vec<u8>,
}

impl Snapshot {
    /// Serialize with bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize with bincode
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
