// zkslot/zkslot-prover/src/lib.rs
// Numan Thabit 2025

use std::sync::Arc;

use halo2_proofs_axiom::{
    plonk::{self, create_proof, keygen_pk, keygen_vk},
    poly::kzg::{
        commitment::{KZGCommitmentScheme, ParamsKZG},
        multiopen::ProverGWC,
    },
    transcript::{Blake2bWrite, Challenge255, TranscriptWriterBuffer},
};
use halo2curves_axiom::bn256::{Bn256, Fr, G1Affine};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{info, warn};

use zkslot_circuit::{
    public_instances, CircuitError, PublicOutput, SlotComparisonCircuit, SlotComparisonInput,
    TracingObserver,
};
use zkslot_common::ProofBundle;

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("circuit definition failed: {0}")]
    Circuit(#[from] CircuitError),
    #[error("key generation failed: {0}")]
    Keygen(#[source] plonk::Error),
    #[error("constraints could not be satisfied: {0}")]
    ConstraintUnsatisfiable(#[source] plonk::Error),
}

pub struct ProverParams {
    pub params: ParamsKZG<Bn256>,
    pub vk: plonk::VerifyingKey<G1Affine>,
    pub pk: plonk::ProvingKey<G1Affine>,
}

pub fn setup(k: u32) -> Result<ProverParams, ProverError> {
    info!(k, "generating KZG params and keys");
    let mut rng = OsRng;
    let params = ParamsKZG::<Bn256>::setup(k, &mut rng);
    let empty_circuit = SlotComparisonCircuit::default();
    let vk = keygen_vk(&params, &empty_circuit).map_err(ProverError::Keygen)?;
    let pk = keygen_pk(&params, vk.clone(), &empty_circuit).map_err(ProverError::Keygen)?;
    Ok(ProverParams { params, vk, pk })
}

pub fn prove(
    params: &ParamsKZG<Bn256>,
    pk: &plonk::ProvingKey<G1Affine>,
    input: SlotComparisonInput,
) -> Result<Vec<u8>, ProverError> {
    prove_with_public_output(params, pk, input).map(|(proof, _)| proof)
}

/// Proves `input` and returns the output vector the proof commits to.
///
/// The output is evaluated natively first; a definition error surfaces here, before any
/// proving work.
pub fn prove_with_public_output(
    params: &ParamsKZG<Bn256>,
    pk: &plonk::ProvingKey<G1Affine>,
    input: SlotComparisonInput,
) -> Result<(Vec<u8>, PublicOutput), ProverError> {
    let public_output = input.expected_output()?;
    let proof = create_proof_bytes(params, pk, input, &public_output)?;
    info!(
        is_greater = public_output.is_greater,
        proof_len = proof.len(),
        "slot comparison proof generated"
    );
    Ok((proof, public_output))
}

pub fn prove_bundle(
    params: &ParamsKZG<Bn256>,
    pk: &plonk::ProvingKey<G1Affine>,
    input: SlotComparisonInput,
) -> Result<ProofBundle, ProverError> {
    let (proof, public_output) = prove_with_public_output(params, pk, input)?;
    Ok(ProofBundle::new(proof, public_output))
}

fn create_proof_bytes(
    params: &ParamsKZG<Bn256>,
    pk: &plonk::ProvingKey<G1Affine>,
    input: SlotComparisonInput,
    public_output: &PublicOutput,
) -> Result<Vec<u8>, ProverError> {
    let instance_slices = public_instances(public_output);
    let instance_refs: Vec<&[Fr]> = instance_slices.iter().map(|col| col.as_slice()).collect();

    let circuit = SlotComparisonCircuit::new(Some(input)).with_observer(Arc::new(TracingObserver));

    let mut transcript = Blake2bWrite::<_, G1Affine, Challenge255<_>>::init(vec![]);
    create_proof::<KZGCommitmentScheme<Bn256>, ProverGWC<'_, Bn256>, _, _, _, _>(
        params,
        pk,
        &[circuit],
        &[instance_refs.as_slice()],
        OsRng,
        &mut transcript,
    )
    .map_err(|err| {
        warn!(?err, "proof generation failed");
        ProverError::ConstraintUnsatisfiable(err)
    })?;
    Ok(transcript.finalize())
}
