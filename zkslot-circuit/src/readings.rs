// zkslot/zkslot-circuit/src/readings.rs
// Numan Thabit 2025

//! Storage readings handed to the circuit by the data-acquisition layer.
//!
//! Readings arrive already authenticated against their block's state root; this module
//! only owns them and offers positional access. Position 0 is the liquidity provider's
//! balance slot, position 1 the challenger's.

use serde::{Deserialize, Serialize};

use crate::{
    bytes::{Address, Bytes32},
    error::CircuitError,
};

pub const LP_READING_INDEX: usize = 0;
pub const CHALLENGER_READING_INDEX: usize = 1;

/// One storage slot value read at a given block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReading {
    pub block_number: u64,
    pub contract: Address,
    pub slot: Bytes32,
    pub value: Bytes32,
}

impl StorageReading {
    pub fn new(block_number: u64, contract: Address, slot: Bytes32, value: Bytes32) -> Self {
        Self {
            block_number,
            contract,
            slot,
            value,
        }
    }
}

/// Ordered, owned list of readings with bounds-checked access.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageReadings {
    entries: Vec<StorageReading>,
}

impl StorageReadings {
    pub fn new(entries: Vec<StorageReading>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&StorageReading, CircuitError> {
        self.entries.get(index).ok_or(CircuitError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &StorageReading> {
        self.entries.iter()
    }
}

impl From<Vec<StorageReading>> for StorageReadings {
    fn from(entries: Vec<StorageReading>) -> Self {
        Self::new(entries)
    }
}
