// zkslot/zkslot-circuit/src/api/mod.rs
// Numan Thabit 2025

//! Capabilities the circuit definition consumes from a backend.
//!
//! The comparison logic is written once against [`CircuitApi`]. [`Halo2Api`] turns it
//! into halo2-base constraints; [`NativeApi`] evaluates it directly, which is how the
//! prover computes the public output it expects the proof to carry.

mod halo2;
mod native;

pub use halo2::Halo2Api;
pub use native::NativeApi;

use crate::bytes::Bytes32;

pub trait CircuitApi {
    /// A 32-byte value reduced into the backend's working representation.
    type Word;
    /// A boolean produced by a constrained comparison.
    type Bool;

    /// Exact big-endian reduction of a private 32-byte value.
    fn to_slot_word(&mut self, value: &Bytes32) -> Self::Word;

    /// Loads a public 32-byte constant. It is published later through `output_bytes32`.
    fn constant_bytes32(&mut self, value: &Bytes32) -> Self::Word;

    /// Constrained unsigned `a > b`.
    fn is_greater_than(&mut self, a: &Self::Word, b: &Self::Word) -> Self::Bool;

    /// Appends a boolean to the public output vector.
    fn output_bool(&mut self, value: Self::Bool);

    /// Appends a 32-byte value to the public output vector.
    fn output_bytes32(&mut self, value: Self::Word);
}
