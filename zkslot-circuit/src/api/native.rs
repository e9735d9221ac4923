// zkslot/zkslot-circuit/src/api/native.rs
// Numan Thabit 2025

use crate::{
    api::CircuitApi,
    bytes::Bytes32,
    error::CircuitError,
    output::{OutputValue, PublicOutput},
    word::SlotWord,
};

/// Out-of-circuit evaluation of a definition.
#[derive(Clone, Debug, Default)]
pub struct NativeApi {
    outputs: Vec<OutputValue>,
}

impl NativeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outputs(&self) -> &[OutputValue] {
        &self.outputs
    }

    pub fn into_public_output(self) -> Result<PublicOutput, CircuitError> {
        PublicOutput::from_entries(&self.outputs)
    }
}

impl CircuitApi for NativeApi {
    type Word = SlotWord;
    type Bool = bool;

    fn to_slot_word(&mut self, value: &Bytes32) -> SlotWord {
        SlotWord::from_bytes32(value)
    }

    fn constant_bytes32(&mut self, value: &Bytes32) -> SlotWord {
        SlotWord::from_bytes32(value)
    }

    fn is_greater_than(&mut self, a: &SlotWord, b: &SlotWord) -> bool {
        a > b
    }

    fn output_bool(&mut self, value: bool) {
        self.outputs.push(OutputValue::Bool(value));
    }

    fn output_bytes32(&mut self, value: SlotWord) {
        self.outputs.push(OutputValue::Bytes32(value.to_bytes32()));
    }
}
