// zkslot/zkslot-circuit/src/gadgets/compare.rs
// Numan Thabit 2025

use halo2_base::{
    gates::{
        flex_gate::{GateChip, GateInstructions},
        range::{RangeChip, RangeInstructions},
    },
    AssignedValue, Context,
    QuantumCell::Constant,
};
use halo2curves_axiom::{bn256::Fr, ff::Field};

use crate::{
    gadgets::word::AssignedWord,
    word::{HI_BITS, WORD_BITS},
};

/// Largest operand width for which `a - b + 2^n - 1` stays below the field modulus.
const MAX_COMPARE_BITS: usize = 251;

/// Returns 1 if `a > b`, 0 otherwise, for operands already constrained below `2^num_bits`.
///
/// `diff = a - b + 2^num_bits - 1` lies in `[0, 2^(num_bits + 1))`; bit `num_bits` of its
/// decomposition is set exactly when `a - b >= 1`.
pub fn is_greater_bits(
    ctx: &mut Context<Fr>,
    gate: &GateChip<Fr>,
    a: AssignedValue<Fr>,
    b: AssignedValue<Fr>,
    num_bits: usize,
) -> AssignedValue<Fr> {
    assert!(num_bits <= MAX_COMPARE_BITS, "comparison width {num_bits} too large");
    let offset = Fr::from(2u64).pow_vartime([num_bits as u64]) - Fr::one();
    let shifted = gate.add(ctx, a, Constant(offset));
    let diff = gate.sub(ctx, shifted, b);
    let bits = gate.num_to_bits(ctx, diff, num_bits + 1);
    bits[num_bits]
}

/// Strict unsigned `a > b` over full 32-byte words.
///
/// The top bytes decide unless they are equal, in which case the 248-bit low words
/// decide. `hi_gt` and `hi_eq` are never both set, so the sum below is boolean.
pub fn word_greater_than(
    ctx: &mut Context<Fr>,
    gate: &GateChip<Fr>,
    range: &RangeChip<Fr>,
    a: &AssignedWord,
    b: &AssignedWord,
) -> AssignedValue<Fr> {
    let hi_gt = range.is_less_than(ctx, b.hi, a.hi, HI_BITS);
    let hi_eq = gate.is_equal(ctx, a.hi, b.hi);
    let lo_gt = is_greater_bits(ctx, gate, a.lo, b.lo, WORD_BITS);
    gate.mul_add(ctx, hi_eq, lo_gt, hi_gt)
}
