// zkslot/zkslot-circuit/src/gadgets/mod.rs
// Numan Thabit 2025

pub mod compare;
pub mod word;
