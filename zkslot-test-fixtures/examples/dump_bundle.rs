use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use zkslot_common::{output_commitment, serialize_proof_bundle};
use zkslot_test_fixtures::fixtures;

fn main() {
    let fixtures = fixtures();
    let public_output = fixtures.public_output();
    let bundle_bytes = serialize_proof_bundle(fixtures.bundle()).expect("bundle json");

    let payload = json!({
        "bundle": fixtures.bundle(),
        "proof_base64": STANDARD.encode(fixtures.proof()),
        "public_output_packed_base64": STANDARD.encode(public_output.to_packed_bytes()),
        "output_commitment": output_commitment(public_output),
        "input_json": fixtures.input_json(),
        "bundle_json": String::from_utf8(bundle_bytes).expect("bundle string"),
        "circuit_version": fixtures.bundle().circuit_version,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&payload).expect("serialize payload")
    );
}
