use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use hex_literal::hex;
use once_cell::sync::OnceCell;
use zkslot_circuit::{
    Address, Bytes32, PublicOutput, SlotComparisonInput, StorageReading, StorageReadings,
    DEFAULT_K,
};
use zkslot_common::{
    serialize_params, serialize_proving_key, serialize_verifying_key, write_manifest,
    ArtifactFile, ArtifactManifest, ProofBundle, ProverArtifacts, CIRCUIT_VERSION, MANIFEST_FILE,
    MANIFEST_VERSION,
};
use zkslot_prover::{prove_with_public_output, setup, ProverParams};

pub const TEST_K: u32 = DEFAULT_K as u32;
const CREATED_AT_UNIX: u64 = 1_700_000_000;

pub const USDT: [u8; 20] = hex!("dac17f958d2ee523a2206206994597c13d831ec7");
pub const HOLDER_SLOT: [u8; 32] =
    hex!("568f97cb8c4c4a5582f76b76203c3168e6b403a6cad2536bcda6c6a37564ab52");
pub const CHALLENGER: [u8; 20] = hex!("6c6d4480eff90dea15c501367d0d5089c4d5c036");
pub const ORDER_HASH: [u8; 32] =
    hex!("5d3b57e7ab843f03264a28c854b91ea85e715c15051775a21aa534f36d54c0e8");
const LP_BLOCK: u64 = 19_525_436;
const CHALLENGER_BLOCK: u64 = 19_290_434;

static FIXTURES: OnceCell<TestFixtures> = OnceCell::new();

/// Pre-generated proving artifacts, a sample input and its proof, reused across tests.
pub struct TestFixtures {
    artifacts: Arc<ProverArtifacts>,
    params_bytes: Vec<u8>,
    vk_bytes: Vec<u8>,
    pk_bytes: Vec<u8>,
    input_json: String,
    proof: Vec<u8>,
    public_output: PublicOutput,
    bundle: ProofBundle,
}

impl TestFixtures {
    /// Clone the prover artifacts so each test can own an `Arc`.
    pub fn artifacts(&self) -> Arc<ProverArtifacts> {
        Arc::clone(&self.artifacts)
    }

    pub fn input_json(&self) -> &str {
        &self.input_json
    }

    pub fn proof(&self) -> &[u8] {
        &self.proof
    }

    pub fn public_output(&self) -> &PublicOutput {
        &self.public_output
    }

    pub fn bundle(&self) -> &ProofBundle {
        &self.bundle
    }

    /// Writes params, keys and a manifest into `dir`; returns the manifest path.
    pub fn write_artifacts(&self, dir: &Path) -> Result<PathBuf> {
        let manifest = &self.artifacts.manifest;
        for (entry, bytes) in [
            (&manifest.params, &self.params_bytes),
            (&manifest.vk, &self.vk_bytes),
            (&manifest.pk, &self.pk_bytes),
        ] {
            let path = dir.join(&entry.path);
            fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        let manifest_path = dir.join(MANIFEST_FILE);
        write_manifest(&manifest_path, manifest)?;
        Ok(manifest_path)
    }
}

/// Return lazily constructed test fixtures shared across crates.
pub fn fixtures() -> &'static TestFixtures {
    FIXTURES.get_or_init(|| build_fixtures().expect("failed to build zkslot test fixtures"))
}

/// Two USDT balance readings with the LP holding 1,000,000 and the challenger 500,000.
pub fn sample_input() -> SlotComparisonInput {
    scenario_input(Bytes32::from_u128(1_000_000), Bytes32::from_u128(500_000))
}

/// Sample input with the given LP and challenger slot values.
pub fn scenario_input(lp: Bytes32, challenger: Bytes32) -> SlotComparisonInput {
    let slot = Bytes32(HOLDER_SLOT);
    SlotComparisonInput {
        readings: StorageReadings::new(vec![
            StorageReading::new(LP_BLOCK, Address(USDT), slot, lp),
            StorageReading::new(CHALLENGER_BLOCK, Address(USDT), slot, challenger),
        ]),
        challenger_address: Bytes32::from_address(&Address(CHALLENGER)),
        order_hash: Bytes32(ORDER_HASH),
    }
}

fn build_fixtures() -> Result<TestFixtures> {
    let input = sample_input();
    let input_json = serde_json::to_string(&input).context("encode input json")?;
    let ProverParams { params, vk, pk } = setup(TEST_K).context("setup")?;

    let params_bytes = serialize_params(&params).context("serialize params")?;
    let vk_bytes = serialize_verifying_key(&vk).context("serialize vk")?;
    let pk_bytes = serialize_proving_key(&pk).context("serialize pk")?;

    let manifest = ArtifactManifest {
        manifest_version: MANIFEST_VERSION,
        circuit_version: CIRCUIT_VERSION,
        k: TEST_K,
        created_at_unix: CREATED_AT_UNIX,
        params: ArtifactFile::from_bytes("params.bin", &params_bytes),
        vk: ArtifactFile::from_bytes("vk.bin", &vk_bytes),
        pk: ArtifactFile::from_bytes("pk.bin", &pk_bytes),
    };

    let (proof, public_output) =
        prove_with_public_output(&params, &pk, input).context("prove sample input")?;

    Ok(TestFixtures {
        artifacts: Arc::new(ProverArtifacts {
            manifest,
            params,
            vk,
            pk,
        }),
        params_bytes,
        vk_bytes,
        pk_bytes,
        input_json,
        bundle: ProofBundle::new(proof.clone(), public_output),
        proof,
        public_output,
    })
}
