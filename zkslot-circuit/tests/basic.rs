use std::sync::Arc;

use halo2_proofs_axiom::{dev::MockProver, plonk::Circuit};
use halo2curves_axiom::bn256::Fr;
use hex_literal::hex;
use proptest::prelude::*;
use zkslot_circuit::{
    output::{CHALLENGER_LO_COLUMN, IS_GREATER_COLUMN, ORDER_HASH_HI_COLUMN},
    public_instances, Address, Bytes32, CircuitError, PublicOutput, SlotComparisonCircuit,
    SlotComparisonInput, StorageReading, StorageReadings, TracingObserver,
};

const BLOCK_NUMBER: u64 = 9_470_812;
const TOKEN: [u8; 20] = hex!("2260fac5e5542a773aa44fbcfedf7c193bc2c599");
const CHALLENGER: [u8; 32] = hex!("0000000000000000000000006c6d4480eff90dea15c501367d0d5089c4d5c036");
const ORDER_HASH: [u8; 32] = hex!("5d3b57e7ab843f03264a28c854b91ea85e715c15051775a21aa534f36d54c0e8");

fn reading(value: Bytes32) -> StorageReading {
    StorageReading::new(BLOCK_NUMBER, Address(TOKEN), Bytes32::from_u128(1), value)
}

fn input_with(lp: Bytes32, challenger: Bytes32) -> SlotComparisonInput {
    SlotComparisonInput {
        readings: StorageReadings::new(vec![reading(lp), reading(challenger)]),
        challenger_address: Bytes32(CHALLENGER),
        order_hash: Bytes32(ORDER_HASH),
    }
}

fn expected(is_greater: bool) -> PublicOutput {
    PublicOutput {
        is_greater,
        challenger_address: Bytes32(CHALLENGER),
        order_hash: Bytes32(ORDER_HASH),
    }
}

fn run_mock_prover(input: SlotComparisonInput, output: &PublicOutput) -> MockProver<Fr> {
    let circuit = SlotComparisonCircuit::new(Some(input));
    let k = circuit.params().k as u32;
    match MockProver::run(k, &circuit, public_instances(output)) {
        Ok(prover) => prover,
        Err(err) => panic!("mock prover run failed: {:?}", err),
    }
}

fn assert_proves(lp: Bytes32, challenger: Bytes32, is_greater: bool) {
    let input = input_with(lp, challenger);
    assert_eq!(input.expected_output().unwrap(), expected(is_greater));
    run_mock_prover(input, &expected(is_greater)).assert_satisfied();
}

#[test]
fn lp_above_challenger_is_true() {
    assert_proves(
        Bytes32::from_u128(1_000_000),
        Bytes32::from_u128(500_000),
        true,
    );
}

#[test]
fn equal_balances_are_false() {
    assert_proves(
        Bytes32::from_u128(500_000),
        Bytes32::from_u128(500_000),
        false,
    );
}

#[test]
fn zero_against_max_is_false() {
    assert_proves(Bytes32::ZERO, Bytes32::MAX, false);
}

#[test]
fn max_against_zero_is_true() {
    assert_proves(Bytes32::MAX, Bytes32::ZERO, true);
}

#[test]
fn top_byte_decides_over_low_bytes() {
    let mut high = [0u8; 32];
    high[0] = 0x01;
    let mut low = [0xFF; 32];
    low[0] = 0x00;
    assert_proves(Bytes32(high), Bytes32(low), true);
    assert_proves(Bytes32(low), Bytes32(high), false);
}

#[test]
fn equal_top_byte_falls_through_to_low_bytes() {
    let mut a = [0xAB; 32];
    let mut b = [0xAB; 32];
    a[31] = 0x02;
    b[31] = 0x01;
    assert_proves(Bytes32(a), Bytes32(b), true);
    assert_proves(Bytes32(b), Bytes32(a), false);
}

#[test]
fn flipped_result_instance_fails() {
    let input = input_with(Bytes32::from_u128(10), Bytes32::from_u128(20));
    assert!(run_mock_prover(input, &expected(true)).verify().is_err());
}

#[test]
fn wrong_challenger_instance_fails() {
    let input = input_with(Bytes32::from_u128(10), Bytes32::from_u128(2));
    let mut output = expected(true);
    output.challenger_address = Bytes32::from_u128(0xBEEF);
    assert!(run_mock_prover(input, &output).verify().is_err());
}

#[test]
fn tampered_instance_cells_fail() {
    let input = input_with(Bytes32::from_u128(10), Bytes32::from_u128(2));
    let circuit = SlotComparisonCircuit::new(Some(input));
    let k = circuit.params().k as u32;

    for column in [IS_GREATER_COLUMN, CHALLENGER_LO_COLUMN, ORDER_HASH_HI_COLUMN] {
        let mut instances = public_instances(&expected(true));
        instances[column][0] += Fr::one();
        let prover = MockProver::run(k, &circuit, instances).unwrap();
        assert!(prover.verify().is_err(), "column {column} was not bound");
    }
}

#[test]
fn missing_reading_fails_synthesis() {
    let mut input = input_with(Bytes32::from_u128(10), Bytes32::from_u128(2));
    input.readings = StorageReadings::new(vec![reading(Bytes32::from_u128(10))]);
    assert_eq!(
        input.expected_output(),
        Err(CircuitError::InsufficientInputs {
            required: 2,
            supplied: 1
        })
    );

    let circuit = SlotComparisonCircuit::new(Some(input));
    let k = circuit.params().k as u32;
    let result = MockProver::run(k, &circuit, public_instances(&expected(true)));
    assert!(result.is_err());
}

#[test]
fn extra_readings_are_left_unconstrained() {
    let mut input = input_with(Bytes32::from_u128(10), Bytes32::from_u128(5));
    input.readings = StorageReadings::new(vec![
        reading(Bytes32::from_u128(10)),
        reading(Bytes32::from_u128(5)),
        reading(Bytes32::from_u128(999)),
    ]);
    assert_eq!(input.expected_output().unwrap(), expected(true));
    run_mock_prover(input.clone(), &expected(true)).assert_satisfied();

    // A third reading above the LP's balance changes nothing.
    let mut larger_third = input;
    larger_third.readings = StorageReadings::new(vec![
        reading(Bytes32::from_u128(10)),
        reading(Bytes32::from_u128(5)),
        reading(Bytes32::MAX),
    ]);
    run_mock_prover(larger_third, &expected(true)).assert_satisfied();
}

#[test]
fn repeated_synthesis_is_deterministic() {
    let input = input_with(Bytes32::from_u128(3), Bytes32::from_u128(1));
    let first = input.expected_output().unwrap();
    let second = input.expected_output().unwrap();
    assert_eq!(first, second);
    assert_eq!(public_instances(&first), public_instances(&second));

    run_mock_prover(input.clone(), &first).assert_satisfied();
    run_mock_prover(input, &second).assert_satisfied();
}

#[test]
fn observer_does_not_change_constraints() {
    let input = input_with(Bytes32::from_u128(8), Bytes32::from_u128(9));
    let circuit = SlotComparisonCircuit::new(Some(input)).with_observer(Arc::new(TracingObserver));
    let k = circuit.params().k as u32;
    MockProver::run(k, &circuit, public_instances(&expected(false)))
        .unwrap()
        .assert_satisfied();
}

#[test]
fn input_round_trips_through_json() {
    let input = input_with(Bytes32::from_u128(42), Bytes32::MAX);
    let json = serde_json::to_string(&input).unwrap();
    let decoded: SlotComparisonInput = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, input);
}

fn arb_bytes32() -> impl Strategy<Value = Bytes32> {
    prop::array::uniform32(any::<u8>()).prop_map(Bytes32)
}

proptest! {
    #[test]
    fn native_result_is_big_endian_order(lp in arb_bytes32(), challenger in arb_bytes32()) {
        let output = input_with(lp, challenger).expected_output().unwrap();
        prop_assert_eq!(output.is_greater, lp.0 > challenger.0);
        prop_assert_eq!(output.challenger_address, Bytes32(CHALLENGER));
        prop_assert_eq!(output.order_hash, Bytes32(ORDER_HASH));
    }
}
