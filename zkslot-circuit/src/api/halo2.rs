// zkslot/zkslot-circuit/src/api/halo2.rs
// Numan Thabit 2025

use halo2_base::{gates::range::RangeChip, gates::RangeInstructions, AssignedValue, Context};
use halo2curves_axiom::bn256::Fr;

use crate::{
    api::CircuitApi,
    bytes::Bytes32,
    gadgets::{
        compare::word_greater_than,
        word::{load_word, AssignedWord},
    },
};

/// halo2-base backend. Output cells are kept in declaration order so the caller can
/// bind them to instance columns.
pub struct Halo2Api<'a> {
    ctx: &'a mut Context<Fr>,
    range: &'a RangeChip<Fr>,
    outputs: Vec<AssignedValue<Fr>>,
}

impl<'a> Halo2Api<'a> {
    pub fn new(ctx: &'a mut Context<Fr>, range: &'a RangeChip<Fr>) -> Self {
        Self {
            ctx,
            range,
            outputs: Vec::new(),
        }
    }

    pub fn into_outputs(self) -> Vec<AssignedValue<Fr>> {
        self.outputs
    }
}

impl CircuitApi for Halo2Api<'_> {
    type Word = AssignedWord;
    type Bool = AssignedValue<Fr>;

    fn to_slot_word(&mut self, value: &Bytes32) -> AssignedWord {
        load_word(self.ctx, self.range.gate(), self.range, value)
    }

    fn constant_bytes32(&mut self, value: &Bytes32) -> AssignedWord {
        load_word(self.ctx, self.range.gate(), self.range, value)
    }

    fn is_greater_than(&mut self, a: &AssignedWord, b: &AssignedWord) -> AssignedValue<Fr> {
        word_greater_than(self.ctx, self.range.gate(), self.range, a, b)
    }

    fn output_bool(&mut self, value: AssignedValue<Fr>) {
        self.outputs.push(value);
    }

    fn output_bytes32(&mut self, value: AssignedWord) {
        self.outputs.extend(value.cells());
    }
}
