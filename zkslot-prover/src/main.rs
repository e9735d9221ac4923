// zkslot/zkslot-prover/src/main.rs
// Numan Thabit 2025

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zkslot_circuit::SlotComparisonInput;
use zkslot_common::{
    load_prover_artifacts, manifest_path, output_commitment, serialize_proof_bundle, ProofBundle,
};
use zkslot_prover::prove_with_public_output;

#[derive(Parser)]
struct Args {
    /// Storage readings plus challenger address and order hash, as JSON.
    #[arg(long)]
    input_json: PathBuf,
    #[arg(long)]
    output_proof: PathBuf,
    /// Defaults to `ZKSLOT_MANIFEST_PATH`, then `artifacts/manifest.json`.
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Optional path to write the 65-byte packed public output.
    #[arg(long)]
    public_output_bin: Option<PathBuf>,
    /// Optional path to write a proof bundle (proof + public output + circuit version).
    #[arg(long)]
    bundle_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "zkslot=info".into()),
        )
        .init();

    let args = Args::parse();
    let json = fs::read_to_string(&args.input_json)
        .with_context(|| format!("failed to read {}", args.input_json.display()))?;
    let input: SlotComparisonInput =
        serde_json::from_str(&json).context("failed to parse slot comparison input json")?;

    let manifest = args.manifest.unwrap_or_else(manifest_path);
    let artifacts = load_prover_artifacts(&manifest)
        .with_context(|| format!("failed to load manifest {}", manifest.display()))?;
    let (proof, public_output) = prove_with_public_output(&artifacts.params, &artifacts.pk, input)
        .context("failed to generate proof")?;

    fs::write(&args.output_proof, &proof)
        .with_context(|| format!("failed to write {}", args.output_proof.display()))?;
    tracing::info!(
        is_greater = public_output.is_greater,
        commitment = %output_commitment(&public_output),
        "wrote proof to {}",
        args.output_proof.display()
    );

    if let Some(path) = args.public_output_bin.as_ref() {
        fs::write(path, public_output.to_packed_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(path) = args.bundle_json.as_ref() {
        let bundle = ProofBundle {
            circuit_version: artifacts.manifest.circuit_version,
            proof,
            public_output,
        };
        let json = serialize_proof_bundle(&bundle)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
