// zkslot/zkslot-circuit/src/output.rs
// Numan Thabit 2025

//! The public output vector and its two encodings.
//!
//! Order and widths are part of the verifier contract:
//! `[is_greater (bool)][challenger_address (32 bytes)][order_hash (32 bytes)]`.

use halo2curves_axiom::bn256::Fr;
use serde::{Deserialize, Serialize};

use crate::{bytes::Bytes32, error::CircuitError, word::SlotWord};

/// Number of positional entries in the output vector.
pub const PUBLIC_OUTPUT_ENTRIES: usize = 3;
/// Length of the packed byte encoding: one boolean byte and two 32-byte fields.
pub const PACKED_OUTPUT_LEN: usize = 1 + 32 + 32;
/// Instance cells: the boolean plus two limbs for each 32-byte field.
pub const NUM_INSTANCE_COLUMNS: usize = 5;

pub const IS_GREATER_COLUMN: usize = 0;
pub const CHALLENGER_HI_COLUMN: usize = 1;
pub const CHALLENGER_LO_COLUMN: usize = 2;
pub const ORDER_HASH_HI_COLUMN: usize = 3;
pub const ORDER_HASH_LO_COLUMN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicOutput {
    pub is_greater: bool,
    pub challenger_address: Bytes32,
    pub order_hash: Bytes32,
}

/// One declared output, as recorded by a backend in call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputValue {
    Bool(bool),
    Bytes32(Bytes32),
}

impl PublicOutput {
    /// `abi.encodePacked(bool, bytes32, bytes32)`.
    pub fn to_packed_bytes(&self) -> [u8; PACKED_OUTPUT_LEN] {
        let mut out = [0u8; PACKED_OUTPUT_LEN];
        out[0] = self.is_greater as u8;
        out[1..33].copy_from_slice(&self.challenger_address.0);
        out[33..].copy_from_slice(&self.order_hash.0);
        out
    }

    pub fn from_packed_bytes(bytes: &[u8]) -> Result<Self, CircuitError> {
        if bytes.len() != PACKED_OUTPUT_LEN {
            return Err(CircuitError::width(
                "packed public output",
                PACKED_OUTPUT_LEN,
                bytes.len(),
            ));
        }
        let is_greater = match bytes[0] {
            0 => false,
            1 => true,
            other => {
                return Err(CircuitError::MalformedInput(format!(
                    "boolean output byte must be 0 or 1, got {other:#04x}"
                )))
            }
        };
        Ok(Self {
            is_greater,
            challenger_address: Bytes32::from_slice(&bytes[1..33])?,
            order_hash: Bytes32::from_slice(&bytes[33..])?,
        })
    }

    /// Positional view of the vector.
    pub fn entries(&self) -> [OutputValue; PUBLIC_OUTPUT_ENTRIES] {
        [
            OutputValue::Bool(self.is_greater),
            OutputValue::Bytes32(self.challenger_address),
            OutputValue::Bytes32(self.order_hash),
        ]
    }

    /// Reassembles the vector from outputs declared in call order.
    pub fn from_entries(entries: &[OutputValue]) -> Result<Self, CircuitError> {
        match entries {
            [OutputValue::Bool(is_greater), OutputValue::Bytes32(challenger_address), OutputValue::Bytes32(order_hash)] => {
                Ok(Self {
                    is_greater: *is_greater,
                    challenger_address: *challenger_address,
                    order_hash: *order_hash,
                })
            }
            other => Err(CircuitError::MalformedInput(format!(
                "public output must be [bool, bytes32, bytes32], got {other:?}"
            ))),
        }
    }

    /// Flattened instance values in column order.
    pub fn instance_values(&self) -> [Fr; NUM_INSTANCE_COLUMNS] {
        let [challenger_hi, challenger_lo] = SlotWord::from_bytes32(&self.challenger_address).limbs();
        let [order_hi, order_lo] = SlotWord::from_bytes32(&self.order_hash).limbs();
        [
            Fr::from(self.is_greater as u64),
            challenger_hi,
            challenger_lo,
            order_hi,
            order_lo,
        ]
    }
}

/// Halo2 instance columns for a public output, one row per column.
pub fn public_instances(output: &PublicOutput) -> Vec<Vec<Fr>> {
    output
        .instance_values()
        .into_iter()
        .map(|value| vec![value])
        .collect()
}
