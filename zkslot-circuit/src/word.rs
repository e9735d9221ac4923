// zkslot/zkslot-circuit/src/word.rs
// Numan Thabit 2025

//! Exact packing of a 32-byte big-endian value into BN254 scalars.
//!
//! The scalar field holds 253 bits, so a full 256-bit word is carried as a 248-bit low
//! word plus its top byte: `value = hi * 2^248 + lo`. The split is lossless and the
//! derived ordering on `(hi, lo)` is the unsigned ordering of the original value.

use halo2curves_axiom::bn256::Fr;

use crate::bytes::{Bytes32, BYTES32_LEN};

/// Width of the low word in bits.
pub const WORD_BITS: usize = 248;
/// Width of the low word in bytes.
pub const WORD_BYTES: usize = WORD_BITS / 8;
/// Width of the top limb in bits.
pub const HI_BITS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotWord {
    pub hi: u8,
    pub lo: [u8; WORD_BYTES],
}

impl SlotWord {
    pub fn from_bytes32(value: &Bytes32) -> Self {
        let mut lo = [0u8; WORD_BYTES];
        lo.copy_from_slice(&value.0[BYTES32_LEN - WORD_BYTES..]);
        Self { hi: value.0[0], lo }
    }

    pub fn to_bytes32(&self) -> Bytes32 {
        let mut out = [0u8; BYTES32_LEN];
        out[0] = self.hi;
        out[1..].copy_from_slice(&self.lo);
        Bytes32(out)
    }

    pub fn hi_fr(&self) -> Fr {
        Fr::from(self.hi as u64)
    }

    pub fn lo_fr(&self) -> Fr {
        fr_from_be_bytes(&self.lo)
    }

    /// `(hi, lo)` as instance-ready field elements.
    pub fn limbs(&self) -> [Fr; 2] {
        [self.hi_fr(), self.lo_fr()]
    }
}

impl From<&Bytes32> for SlotWord {
    fn from(value: &Bytes32) -> Self {
        Self::from_bytes32(value)
    }
}

/// Horner evaluation of big-endian bytes. Callers keep inputs under 253 bits.
pub fn fr_from_be_bytes(bytes: &[u8]) -> Fr {
    let base = Fr::from(256u64);
    bytes
        .iter()
        .fold(Fr::zero(), |acc, byte| acc * base + Fr::from(*byte as u64))
}
