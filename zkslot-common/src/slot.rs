//! Storage slot keys for Solidity `mapping(address => uint256)` balances.

use sha3::{Digest, Keccak256};
use zkslot_circuit::{Address, Bytes32};

/// Slot holding `holder`'s entry in a mapping declared at `base_slot`:
/// `keccak256(leftpad32(holder) ++ uint256(base_slot))`.
pub fn balance_slot_key(holder: &Address, base_slot: u64) -> Bytes32 {
    let mut hasher = Keccak256::new();
    hasher.update(Bytes32::from_address(holder).as_bytes());
    hasher.update(Bytes32::from_u128(base_slot as u128).as_bytes());
    Bytes32(hasher.finalize().into())
}
