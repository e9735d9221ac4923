// zkslot/zkslot-circuit/src/gadgets/word.rs
// Numan Thabit 2025

use halo2_base::{
    gates::{
        flex_gate::{GateChip, GateInstructions},
        range::{RangeChip, RangeInstructions},
    },
    AssignedValue, Context,
    QuantumCell::Constant,
};
use halo2curves_axiom::bn256::Fr;

use crate::bytes::Bytes32;

/// In-circuit form of a 32-byte value: top byte and 248-bit low word.
#[derive(Clone, Copy, Debug)]
pub struct AssignedWord {
    pub hi: AssignedValue<Fr>,
    pub lo: AssignedValue<Fr>,
}

impl AssignedWord {
    pub fn cells(&self) -> [AssignedValue<Fr>; 2] {
        [self.hi, self.lo]
    }
}

/// Load `value` as 32 byte witnesses, range-check each byte and pack them big-endian.
///
/// Every byte is constrained to 8 bits, so `lo < 2^248` and `hi < 2^8` hold for any
/// satisfying assignment and the packing cannot wrap the field.
pub fn load_word(
    ctx: &mut Context<Fr>,
    gate: &GateChip<Fr>,
    range: &RangeChip<Fr>,
    value: &Bytes32,
) -> AssignedWord {
    let bytes: Vec<AssignedValue<Fr>> = value
        .0
        .iter()
        .map(|byte| {
            let cell = ctx.load_witness(Fr::from(*byte as u64));
            range.range_check(ctx, cell, 8);
            cell
        })
        .collect();

    let base = Constant(Fr::from(256u64));
    let mut lo = ctx.load_constant(Fr::zero());
    for byte in &bytes[1..] {
        lo = gate.mul_add(ctx, lo, base, *byte);
    }

    AssignedWord { hi: bytes[0], lo }
}
