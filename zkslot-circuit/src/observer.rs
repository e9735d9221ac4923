// zkslot/zkslot-circuit/src/observer.rs
// Numan Thabit 2025

//! Optional diagnostics hook for witness values seen during circuit definition.

use std::fmt;

use crate::{readings::StorageReadings, word::SlotWord};

/// Receives witness values while the circuit is being defined. Never affects constraints.
pub trait WitnessObserver: fmt::Debug + Send + Sync {
    fn on_readings(&self, _readings: &StorageReadings) {}

    fn on_slot_words(&self, _lp: &SlotWord, _challenger: &SlotWord) {}
}

/// Emits observed witnesses as `tracing` debug events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl WitnessObserver for TracingObserver {
    fn on_readings(&self, readings: &StorageReadings) {
        for (index, reading) in readings.iter().enumerate() {
            tracing::debug!(
                index,
                block = reading.block_number,
                contract = %reading.contract,
                slot = %reading.slot,
                "storage reading"
            );
        }
    }

    fn on_slot_words(&self, lp: &SlotWord, challenger: &SlotWord) {
        tracing::debug!(
            lp = %lp.to_bytes32(),
            challenger = %challenger.to_bytes32(),
            "slot words"
        );
    }
}
