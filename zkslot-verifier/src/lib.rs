// zkslot/zkslot-verifier/src/lib.rs
// Numan Thabit 2025

use anyhow::{ensure, Result};
use halo2_proofs_axiom::{
    plonk::{verify_proof, VerifyingKey},
    poly::kzg::{
        commitment::{KZGCommitmentScheme, ParamsKZG},
        multiopen::VerifierGWC,
        strategy::SingleStrategy,
    },
    transcript::{Blake2bRead, Challenge255, TranscriptReadBuffer},
};
use halo2curves_axiom::bn256::{Bn256, Fr, G1Affine};
use zkslot_circuit::PublicOutput;
use zkslot_common::{public_output_to_instances, ProofBundle, CIRCUIT_VERSION};

pub fn verify(
    params: &ParamsKZG<Bn256>,
    vk: &VerifyingKey<G1Affine>,
    proof_bytes: &[u8],
    instances: &[Vec<Fr>],
) -> bool {
    let mut transcript = Blake2bRead::<_, G1Affine, Challenge255<_>>::init(proof_bytes);

    let instance_columns: Vec<&[Fr]> = instances.iter().map(|col| col.as_slice()).collect();
    let prepared_instances = vec![instance_columns.as_slice()];

    let result = verify_proof::<KZGCommitmentScheme<Bn256>, VerifierGWC<'_, Bn256>, _, _, _>(
        params,
        vk,
        SingleStrategy::new(params),
        &prepared_instances,
        &mut transcript,
    );
    if let Err(err) = &result {
        tracing::debug!(?err, "proof rejected");
    }
    result.is_ok()
}

pub fn verify_with_public_output(
    params: &ParamsKZG<Bn256>,
    vk: &VerifyingKey<G1Affine>,
    proof_bytes: &[u8],
    public_output: &PublicOutput,
) -> bool {
    let instances = public_output_to_instances(public_output);
    verify(params, vk, proof_bytes, &instances)
}

/// Checks the bundle's circuit version, then its proof against its own public output.
pub fn verify_bundle(
    params: &ParamsKZG<Bn256>,
    vk: &VerifyingKey<G1Affine>,
    bundle: &ProofBundle,
) -> Result<bool> {
    ensure!(
        bundle.circuit_version == CIRCUIT_VERSION,
        "bundle circuit version {} does not match verifier version {}",
        bundle.circuit_version,
        CIRCUIT_VERSION
    );
    let accepted = verify_with_public_output(params, vk, &bundle.proof, &bundle.public_output);
    tracing::info!(
        accepted,
        is_greater = bundle.public_output.is_greater,
        "verified proof bundle"
    );
    Ok(accepted)
}
