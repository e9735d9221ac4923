use std::sync::OnceLock;

use zkslot_circuit::{
    Address, Bytes32, CircuitError, SlotComparisonInput, StorageReading, StorageReadings,
    DEFAULT_K,
};
use zkslot_common::CIRCUIT_VERSION;
use zkslot_prover::{
    prove, prove_bundle, prove_with_public_output, setup, ProverError, ProverParams,
};
use zkslot_verifier::verify_with_public_output;

fn keys() -> &'static ProverParams {
    static KEYS: OnceLock<ProverParams> = OnceLock::new();
    KEYS.get_or_init(|| setup(DEFAULT_K as u32).expect("setup"))
}

fn input(lp: u128, challenger: u128) -> SlotComparisonInput {
    let reading = |value| {
        StorageReading::new(7, Address::default(), Bytes32::ZERO, Bytes32::from_u128(value))
    };
    SlotComparisonInput {
        readings: StorageReadings::new(vec![reading(lp), reading(challenger)]),
        challenger_address: Bytes32::from_address(&Address([0x11; 20])),
        order_hash: Bytes32([0x22; 32]),
    }
}

#[test]
fn proof_carries_natively_evaluated_output() {
    let keys = keys();
    for (lp, challenger, expected) in [(1_000_000, 500_000, true), (500_000, 500_000, false)] {
        let (proof, output) =
            prove_with_public_output(&keys.params, &keys.pk, input(lp, challenger)).unwrap();
        assert_eq!(output.is_greater, expected);
        assert!(verify_with_public_output(&keys.params, &keys.vk, &proof, &output));
    }
}

#[test]
fn bare_proof_verifies_against_expected_output() {
    let keys = keys();
    let input = input(0, 1);
    let expected = input.expected_output().unwrap();
    assert!(!expected.is_greater);

    let proof = prove(&keys.params, &keys.pk, input).unwrap();
    assert!(verify_with_public_output(&keys.params, &keys.vk, &proof, &expected));

    let mut flipped = expected;
    flipped.is_greater = true;
    assert!(!verify_with_public_output(&keys.params, &keys.vk, &proof, &flipped));
}

#[test]
fn bundle_records_circuit_version() {
    let keys = keys();
    let bundle = prove_bundle(&keys.params, &keys.pk, input(3, 2)).unwrap();
    assert_eq!(bundle.circuit_version, CIRCUIT_VERSION);
    assert!(bundle.public_output.is_greater);
    assert!(!bundle.proof.is_empty());
}

#[test]
fn missing_reading_is_rejected_before_proving() {
    let keys = keys();
    let mut short = input(3, 2);
    short.readings = StorageReadings::new(Vec::new());
    let err = prove_with_public_output(&keys.params, &keys.pk, short).unwrap_err();
    assert!(matches!(
        err,
        ProverError::Circuit(CircuitError::InsufficientInputs {
            required: 2,
            supplied: 0
        })
    ));
}
