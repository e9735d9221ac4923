// zkslot/zkslot-circuit/src/check.rs
// Numan Thabit 2025

//! The liquidity check: LP balance strictly above the challenger's balance.
//!
//! A check starts [`Unbuilt`] and becomes [`Built`] through a single consuming call to
//! [`LiquidityCheck::define`], so one instance can never be defined twice.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    api::CircuitApi,
    bytes::Bytes32,
    error::CircuitError,
    observer::WitnessObserver,
    readings::{StorageReading, StorageReadings, CHALLENGER_READING_INDEX, LP_READING_INDEX},
    word::SlotWord,
};

/// Upper bounds on each input kind a circuit consumes. Backends size their
/// pre-allocation from this, so it must match actual consumption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub max_receipts: usize,
    pub max_storage: usize,
    pub max_transactions: usize,
}

/// Readings the check consumes: the LP's slot and the challenger's slot.
pub const REQUIRED_STORAGE_READINGS: usize = 2;

const _: () = assert!(LiquidityCheck::<Unbuilt>::ALLOCATION.max_storage == REQUIRED_STORAGE_READINGS);
const _: () = assert!(LP_READING_INDEX < REQUIRED_STORAGE_READINGS);
const _: () = assert!(CHALLENGER_READING_INDEX < REQUIRED_STORAGE_READINGS);

#[derive(Clone, Copy, Debug, Default)]
pub struct Unbuilt;

/// Terminal state. Records what the definition actually consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Built {
    pub consumed: Allocation,
}

#[derive(Clone, Debug)]
pub struct LiquidityCheck<S> {
    challenger_address: Bytes32,
    order_hash: Bytes32,
    observer: Option<Arc<dyn WitnessObserver>>,
    state: S,
}

impl<S> LiquidityCheck<S> {
    pub const ALLOCATION: Allocation = Allocation {
        max_receipts: 0,
        max_storage: REQUIRED_STORAGE_READINGS,
        max_transactions: 0,
    };

    pub fn challenger_address(&self) -> &Bytes32 {
        &self.challenger_address
    }

    pub fn order_hash(&self) -> &Bytes32 {
        &self.order_hash
    }
}

impl LiquidityCheck<Unbuilt> {
    pub fn new(challenger_address: Bytes32, order_hash: Bytes32) -> Self {
        Self {
            challenger_address,
            order_hash,
            observer: None,
            state: Unbuilt,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn WitnessObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Emits the comparison constraints and declares
    /// `[is_greater, challenger_address, order_hash]` as public outputs.
    ///
    /// Only positions 0 and 1 are read. Readings past those are left unconstrained.
    ///
    /// Input validation happens before the first call into `api`; on error nothing has
    /// been emitted.
    pub fn define<A: CircuitApi>(
        self,
        api: &mut A,
        readings: &StorageReadings,
    ) -> Result<LiquidityCheck<Built>, CircuitError> {
        if readings.len() < REQUIRED_STORAGE_READINGS {
            return Err(CircuitError::InsufficientInputs {
                required: REQUIRED_STORAGE_READINGS,
                supplied: readings.len(),
            });
        }

        let mut tracked = TrackedReadings::new(readings);
        let lp = tracked.get(LP_READING_INDEX)?;
        let challenger = tracked.get(CHALLENGER_READING_INDEX)?;

        if let Some(observer) = &self.observer {
            observer.on_readings(readings);
            observer.on_slot_words(
                &SlotWord::from_bytes32(&lp.value),
                &SlotWord::from_bytes32(&challenger.value),
            );
        }

        let lp_word = api.to_slot_word(&lp.value);
        let challenger_word = api.to_slot_word(&challenger.value);
        let is_greater = api.is_greater_than(&lp_word, &challenger_word);

        let challenger_address = api.constant_bytes32(&self.challenger_address);
        let order_hash = api.constant_bytes32(&self.order_hash);

        api.output_bool(is_greater);
        api.output_bytes32(challenger_address);
        api.output_bytes32(order_hash);

        Ok(LiquidityCheck {
            challenger_address: self.challenger_address,
            order_hash: self.order_hash,
            observer: self.observer,
            state: Built {
                consumed: Allocation {
                    max_receipts: 0,
                    max_storage: tracked.touched(),
                    max_transactions: 0,
                },
            },
        })
    }
}

impl LiquidityCheck<Built> {
    pub fn consumed(&self) -> Allocation {
        self.state.consumed
    }
}

/// Counts storage capacity actually used: one past the highest position read.
struct TrackedReadings<'a> {
    readings: &'a StorageReadings,
    touched: usize,
}

impl<'a> TrackedReadings<'a> {
    fn new(readings: &'a StorageReadings) -> Self {
        Self {
            readings,
            touched: 0,
        }
    }

    fn get(&mut self, index: usize) -> Result<&'a StorageReading, CircuitError> {
        let reading = self.readings.get(index)?;
        self.touched = self.touched.max(index + 1);
        Ok(reading)
    }

    fn touched(&self) -> usize {
        self.touched
    }
}
