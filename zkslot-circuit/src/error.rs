// zkslot/zkslot-circuit/src/error.rs
// Numan Thabit 2025

//! Errors raised while defining the comparison circuit.

use thiserror::Error;

/// Construction-time failures. Every variant aborts circuit definition before any
/// constraint is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// Fewer storage readings than the circuit consumes.
    #[error("insufficient storage readings: circuit needs {required}, got {supplied}")]
    InsufficientInputs { required: usize, supplied: usize },

    /// A reading or public constant has the wrong width or encoding.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Positional access past the end of the reading list.
    #[error("storage reading index {index} out of range for {len} readings")]
    IndexOutOfRange { index: usize, len: usize },
}

impl CircuitError {
    pub(crate) fn width(field: &str, expected: usize, actual: usize) -> Self {
        CircuitError::MalformedInput(format!(
            "{field} must be exactly {expected} bytes, got {actual}"
        ))
    }
}
