// zkslot/zkslot-circuit/src/bytes.rs
// Numan Thabit 2025

//! Fixed-width byte values used at the circuit boundary.
//!
//! Both types serialize as `0x`-prefixed lowercase hex and reject any other width on
//! the way in.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CircuitError;

pub const BYTES32_LEN: usize = 32;
pub const ADDRESS_LEN: usize = 20;

/// A 32-byte big-endian word: storage slot keys, slot values and the public constants.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes32(pub [u8; BYTES32_LEN]);

/// A 20-byte account or contract address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Bytes32 {
    pub const ZERO: Bytes32 = Bytes32([0u8; BYTES32_LEN]);
    pub const MAX: Bytes32 = Bytes32([0xFF; BYTES32_LEN]);

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CircuitError> {
        let array: [u8; BYTES32_LEN] = bytes
            .try_into()
            .map_err(|_| CircuitError::width("bytes32 value", BYTES32_LEN, bytes.len()))?;
        Ok(Bytes32(array))
    }

    pub fn from_hex(text: &str) -> Result<Self, CircuitError> {
        let bytes = decode_hex(text)?;
        Self::from_slice(&bytes)
    }

    /// Big-endian encoding of `value`, zero-extended on the left.
    pub fn from_u128(value: u128) -> Self {
        let mut out = [0u8; BYTES32_LEN];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Bytes32(out)
    }

    /// Left-pads a 20-byte address to 32 bytes, matching EVM word layout.
    pub fn from_address(address: &Address) -> Self {
        let mut out = [0u8; BYTES32_LEN];
        out[BYTES32_LEN - ADDRESS_LEN..].copy_from_slice(&address.0);
        Bytes32(out)
    }

    pub fn as_bytes(&self) -> &[u8; BYTES32_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl Address {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CircuitError> {
        let array: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| CircuitError::width("address", ADDRESS_LEN, bytes.len()))?;
        Ok(Address(array))
    }

    pub fn from_hex(text: &str) -> Result<Self, CircuitError> {
        let bytes = decode_hex(text)?;
        Self::from_slice(&bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; BYTES32_LEN]> for Bytes32 {
    fn from(bytes: [u8; BYTES32_LEN]) -> Self {
        Bytes32(bytes)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }
}

fn decode_hex(text: &str) -> Result<Vec<u8>, CircuitError> {
    let stripped = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(stripped)
        .map_err(|err| CircuitError::MalformedInput(format!("invalid hex '{text}': {err}")))
}

impl fmt::Debug for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes32({})", self.to_hex())
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Bytes32::from_hex(&text).map_err(de::Error::custom)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::from_hex(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_address_left_pads() {
        let address = Address::from_hex("0x6C6d4480EfF90deA15c501367D0d5089C4d5c036").unwrap();
        let word = Bytes32::from_address(&address);
        assert_eq!(&word.0[..12], &[0u8; 12]);
        assert_eq!(&word.0[12..], &address.0);
    }

    #[test]
    fn wrong_width_is_malformed() {
        let err = Bytes32::from_slice(&[1u8; 31]).unwrap_err();
        assert!(matches!(err, CircuitError::MalformedInput(_)));

        let err = Bytes32::from_hex("0x00ff").unwrap_err();
        assert!(matches!(err, CircuitError::MalformedInput(_)));

        let err = Address::from_slice(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, CircuitError::MalformedInput(_)));
    }

    #[test]
    fn hex_without_prefix_is_accepted() {
        let with = Bytes32::from_hex(&format!("0x{}", "ab".repeat(32))).unwrap();
        let without = Bytes32::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn json_rejects_short_values() {
        let short = format!("\"0x{}\"", "11".repeat(20));
        assert!(serde_json::from_str::<Bytes32>(&short).is_err());
        assert!(serde_json::from_str::<Address>(&short).is_ok());
    }

    #[test]
    fn from_u128_is_big_endian() {
        let word = Bytes32::from_u128(1_000_000);
        assert_eq!(&word.0[..29], &[0u8; 29]);
        assert_eq!(&word.0[29..], &[0x0F, 0x42, 0x40]);
    }
}
