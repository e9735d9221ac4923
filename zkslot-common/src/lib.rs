pub mod slot;

use std::{
    env, fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, ensure, Context, Result};
use halo2_proofs_axiom::{
    plonk::{self, Circuit},
    poly::{commitment::Params, kzg::commitment::ParamsKZG},
    SerdeFormat,
};
use halo2curves_axiom::{
    bn256::{Bn256, Fr, G1Affine},
    ff::PrimeField,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use zkslot_circuit::{
    output::{
        CHALLENGER_HI_COLUMN, CHALLENGER_LO_COLUMN, IS_GREATER_COLUMN, ORDER_HASH_HI_COLUMN,
        ORDER_HASH_LO_COLUMN,
    },
    public_instances,
    word::WORD_BYTES,
    Bytes32, PublicOutput, SlotComparisonCircuit, NUM_INSTANCE_COLUMNS,
};

pub use slot::balance_slot_key;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub circuit_version: u32,
    #[serde(with = "hex_bytes")]
    pub proof: Vec<u8>,
    pub public_output: PublicOutput,
}

pub const CIRCUIT_VERSION: u32 = 1;
pub const MANIFEST_VERSION: u32 = 1;
pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_ENV: &str = "ZKSLOT_MANIFEST_PATH";
pub const DEFAULT_MANIFEST_PATH: &str = "artifacts/manifest.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub path: String,
    pub blake3: String,
    pub size: u64,
}

impl ArtifactFile {
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            blake3: hash_bytes_hex(bytes),
            size: bytes.len() as u64,
        }
    }

    fn resolve_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.path)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub manifest_version: u32,
    pub circuit_version: u32,
    pub k: u32,
    pub created_at_unix: u64,
    pub params: ArtifactFile,
    pub vk: ArtifactFile,
    pub pk: ArtifactFile,
}

#[derive(Clone, Debug)]
pub struct VerifierArtifacts {
    pub manifest: ArtifactManifest,
    pub params: ParamsKZG<Bn256>,
    pub vk: plonk::VerifyingKey<G1Affine>,
}

#[derive(Clone, Debug)]
pub struct ProverArtifacts {
    pub manifest: ArtifactManifest,
    pub params: ParamsKZG<Bn256>,
    pub vk: plonk::VerifyingKey<G1Affine>,
    pub pk: plonk::ProvingKey<G1Affine>,
}

/// Manifest location from `ZKSLOT_MANIFEST_PATH`, falling back to `artifacts/manifest.json`.
pub fn manifest_path() -> PathBuf {
    env::var(MANIFEST_ENV)
        .unwrap_or_else(|_| DEFAULT_MANIFEST_PATH.to_string())
        .into()
}

pub fn serialize_params(params: &ParamsKZG<Bn256>) -> Result<Vec<u8>> {
    let mut buf = vec![];
    params
        .write(&mut buf)
        .context("failed to serialize KZG params")?;
    Ok(buf)
}

pub fn deserialize_params(bytes: &[u8]) -> Result<ParamsKZG<Bn256>> {
    let mut reader = Cursor::new(bytes);
    ParamsKZG::<Bn256>::read(&mut reader).context("failed to deserialize KZG params")
}

pub fn serialize_verifying_key(vk: &plonk::VerifyingKey<G1Affine>) -> Result<Vec<u8>> {
    let mut buf = vec![];
    vk.write(&mut buf, SerdeFormat::Processed)
        .context("failed to serialize verifying key")?;
    Ok(buf)
}

pub fn deserialize_verifying_key(bytes: &[u8]) -> Result<plonk::VerifyingKey<G1Affine>> {
    let params = SlotComparisonCircuit::default().params();
    let mut reader = Cursor::new(bytes);
    plonk::VerifyingKey::read::<_, SlotComparisonCircuit>(
        &mut reader,
        SerdeFormat::Processed,
        params,
    )
    .context("failed to deserialize verifying key")
}

pub fn serialize_proving_key(pk: &plonk::ProvingKey<G1Affine>) -> Result<Vec<u8>> {
    let mut buf = vec![];
    pk.write(&mut buf, SerdeFormat::Processed)
        .context("failed to serialize proving key")?;
    Ok(buf)
}

pub fn deserialize_proving_key(bytes: &[u8]) -> Result<plonk::ProvingKey<G1Affine>> {
    let params = SlotComparisonCircuit::default().params();
    let mut reader = Cursor::new(bytes);
    plonk::ProvingKey::read::<_, SlotComparisonCircuit>(
        &mut reader,
        SerdeFormat::Processed,
        params,
    )
    .context("failed to deserialize proving key")
}

pub fn public_output_to_instances(output: &PublicOutput) -> Vec<Vec<Fr>> {
    public_instances(output)
}

/// Inverse of [`public_output_to_instances`]. Rejects any cell that is not a canonical
/// limb, so an instance set decodes to at most one output.
pub fn instances_to_public_output(instances: &[Vec<Fr>]) -> Result<PublicOutput> {
    ensure!(
        instances.len() == NUM_INSTANCE_COLUMNS,
        "expected {} instance columns, got {}",
        NUM_INSTANCE_COLUMNS,
        instances.len()
    );

    let flag = first_instance(instances, IS_GREATER_COLUMN, "is_greater")?;
    let is_greater = if flag == Fr::zero() {
        false
    } else if flag == Fr::one() {
        true
    } else {
        return Err(anyhow!("is_greater instance is not boolean"));
    };

    Ok(PublicOutput {
        is_greater,
        challenger_address: bytes32_from_limbs(
            instances,
            CHALLENGER_HI_COLUMN,
            CHALLENGER_LO_COLUMN,
            "challenger_address",
        )?,
        order_hash: bytes32_from_limbs(
            instances,
            ORDER_HASH_HI_COLUMN,
            ORDER_HASH_LO_COLUMN,
            "order_hash",
        )?,
    })
}

/// keccak256 over the 65-byte packed output, the digest an EVM consumer recomputes.
pub fn output_commitment(output: &PublicOutput) -> Bytes32 {
    Bytes32(Keccak256::digest(output.to_packed_bytes()).into())
}

pub fn serialize_proof_bundle(bundle: &ProofBundle) -> Result<Vec<u8>> {
    serde_json::to_vec(bundle).context("failed to serialize proof bundle")
}

pub fn deserialize_proof_bundle(bytes: &[u8]) -> Result<ProofBundle> {
    let bundle: ProofBundle =
        serde_json::from_slice(bytes).context("failed to deserialize proof bundle")?;
    ensure!(
        bundle.circuit_version == CIRCUIT_VERSION,
        "proof bundle circuit version {} does not match crate version {}",
        bundle.circuit_version,
        CIRCUIT_VERSION
    );
    Ok(bundle)
}

impl ProofBundle {
    pub fn new(proof: Vec<u8>, public_output: PublicOutput) -> Self {
        Self {
            circuit_version: CIRCUIT_VERSION,
            proof,
            public_output,
        }
    }

    pub fn commitment(&self) -> Bytes32 {
        output_commitment(&self.public_output)
    }
}

pub fn write_manifest(path: impl AsRef<Path>, manifest: &ArtifactManifest) -> Result<()> {
    let json = serde_json::to_vec_pretty(manifest).context("failed to serialize manifest")?;
    fs::write(path.as_ref(), json).context("failed to write manifest")
}

pub fn read_manifest(path: impl AsRef<Path>) -> Result<ArtifactManifest> {
    let bytes = fs::read(path.as_ref()).context("failed to read manifest file")?;
    serde_json::from_slice(&bytes).context("failed to parse manifest json")
}

pub fn load_verifier_artifacts(path: impl AsRef<Path>) -> Result<VerifierArtifacts> {
    let manifest_path = path.as_ref();
    let manifest = read_checked_manifest(manifest_path)?;
    let base_dir = manifest_dir(manifest_path);

    let params = deserialize_params(&read_artifact_file(&base_dir, &manifest.params, "params")?)?;
    let vk = deserialize_verifying_key(&read_artifact_file(
        &base_dir,
        &manifest.vk,
        "verifying key",
    )?)?;

    Ok(VerifierArtifacts {
        manifest,
        params,
        vk,
    })
}

pub fn load_prover_artifacts(path: impl AsRef<Path>) -> Result<ProverArtifacts> {
    let manifest_path = path.as_ref();
    let manifest = read_checked_manifest(manifest_path)?;
    let base_dir = manifest_dir(manifest_path);

    let params = deserialize_params(&read_artifact_file(&base_dir, &manifest.params, "params")?)?;
    let vk = deserialize_verifying_key(&read_artifact_file(
        &base_dir,
        &manifest.vk,
        "verifying key",
    )?)?;
    let pk = deserialize_proving_key(&read_artifact_file(
        &base_dir,
        &manifest.pk,
        "proving key",
    )?)?;

    Ok(ProverArtifacts {
        manifest,
        params,
        vk,
        pk,
    })
}

pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

fn first_instance(instances: &[Vec<Fr>], column: usize, label: &str) -> Result<Fr> {
    let col = instances
        .get(column)
        .with_context(|| format!("missing instance column '{}'", label))?;
    col.first()
        .copied()
        .with_context(|| format!("column '{}' has no rows", label))
}

fn bytes32_from_limbs(
    instances: &[Vec<Fr>],
    hi_column: usize,
    lo_column: usize,
    label: &str,
) -> Result<Bytes32> {
    let hi = first_instance(instances, hi_column, label)?.to_repr();
    let lo = first_instance(instances, lo_column, label)?.to_repr();
    let (hi, lo) = (hi.as_ref(), lo.as_ref());
    ensure!(
        hi[1..].iter().all(|&b| b == 0),
        "{} high limb does not fit in one byte",
        label
    );
    ensure!(
        lo[WORD_BYTES..].iter().all(|&b| b == 0),
        "{} low limb does not fit in {} bytes",
        label,
        WORD_BYTES
    );

    // `to_repr` is little-endian; the word is big-endian.
    let mut bytes = [0u8; 32];
    bytes[0] = hi[0];
    for (dst, src) in bytes[1..].iter_mut().zip(lo[..WORD_BYTES].iter().rev()) {
        *dst = *src;
    }
    Ok(Bytes32(bytes))
}

fn read_checked_manifest(manifest_path: &Path) -> Result<ArtifactManifest> {
    let manifest = read_manifest(manifest_path)?;
    ensure_manifest_compat(&manifest)?;
    Ok(manifest)
}

fn read_artifact_file(base_dir: &Path, entry: &ArtifactFile, label: &str) -> Result<Vec<u8>> {
    let path = entry.resolve_path(base_dir);
    let bytes = fs::read(&path)
        .with_context(|| format!("failed to read {} at {}", label, path.display()))?;
    ensure!(
        bytes.len() as u64 == entry.size,
        "{} size mismatch, manifest recorded {} bytes but found {}",
        label,
        entry.size,
        bytes.len(),
    );
    ensure_hash(&bytes, &entry.blake3, label)?;
    Ok(bytes)
}

fn ensure_hash(bytes: &[u8], expected_hex: &str, label: &str) -> Result<()> {
    let actual = hash_bytes_hex(bytes);
    ensure!(
        actual == expected_hex,
        "{} hash mismatch, expected {} but computed {}",
        label,
        expected_hex,
        actual
    );
    Ok(())
}

fn manifest_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn ensure_manifest_compat(manifest: &ArtifactManifest) -> Result<()> {
    ensure!(
        manifest.manifest_version == MANIFEST_VERSION,
        "unsupported manifest version {}, expected {}",
        manifest.manifest_version,
        MANIFEST_VERSION
    );
    ensure!(
        manifest.circuit_version == CIRCUIT_VERSION,
        "circuit version mismatch: manifest {} vs crate {}",
        manifest.circuit_version,
        CIRCUIT_VERSION
    );
    Ok(())
}

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text.trim_start_matches("0x")).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn sample_output() -> PublicOutput {
        PublicOutput {
            is_greater: true,
            challenger_address: Bytes32(hex!(
                "0000000000000000000000006c6d4480eff90dea15c501367d0d5089c4d5c036"
            )),
            order_hash: Bytes32(hex!(
                "ff3b57e7ab843f03264a28c854b91ea85e715c15051775a21aa534f36d54c0e8"
            )),
        }
    }

    #[test]
    fn public_output_round_trips_through_instances() {
        let output = sample_output();
        let instances = public_output_to_instances(&output);
        assert_eq!(instances.len(), NUM_INSTANCE_COLUMNS);
        assert_eq!(instances_to_public_output(&instances).unwrap(), output);

        let mut negative = output;
        negative.is_greater = false;
        let instances = public_output_to_instances(&negative);
        assert_eq!(instances_to_public_output(&instances).unwrap(), negative);
    }

    #[test]
    fn instances_to_public_output_rejects_wrong_len() {
        let bad_instances = vec![vec![Fr::one()]; NUM_INSTANCE_COLUMNS - 1];
        assert!(instances_to_public_output(&bad_instances).is_err());
    }

    #[test]
    fn instances_to_public_output_rejects_non_boolean_flag() {
        let mut instances = public_output_to_instances(&sample_output());
        instances[IS_GREATER_COLUMN][0] = Fr::from(2u64);
        assert!(instances_to_public_output(&instances).is_err());
    }

    #[test]
    fn instances_to_public_output_rejects_oversized_limbs() {
        let mut instances = public_output_to_instances(&sample_output());
        instances[CHALLENGER_HI_COLUMN][0] = Fr::from(256u64);
        assert!(instances_to_public_output(&instances).is_err());

        let mut instances = public_output_to_instances(&sample_output());
        instances[ORDER_HASH_LO_COLUMN][0] = Fr::from_raw([0, 0, 0, 1 << 56]);
        assert!(instances_to_public_output(&instances).is_err());
    }

    #[test]
    fn commitment_hashes_packed_bytes() {
        let output = sample_output();
        let expected = Keccak256::digest(output.to_packed_bytes());
        assert_eq!(output_commitment(&output).0.as_slice(), expected.as_slice());

        let mut flipped = output;
        flipped.is_greater = false;
        assert_ne!(output_commitment(&flipped), output_commitment(&output));
    }

    #[test]
    fn proof_bundle_json_round_trip() {
        let bundle = ProofBundle::new(vec![0xde, 0xad, 0xbe, 0xef], sample_output());
        let bytes = serialize_proof_bundle(&bundle).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["proof"], "0xdeadbeef");
        assert_eq!(deserialize_proof_bundle(&bytes).unwrap(), bundle);
    }

    #[test]
    fn proof_bundle_rejects_other_circuit_version() {
        let mut bundle = ProofBundle::new(vec![1, 2, 3], sample_output());
        bundle.circuit_version = CIRCUIT_VERSION + 1;
        let bytes = serde_json::to_vec(&bundle).unwrap();
        assert!(deserialize_proof_bundle(&bytes).is_err());
    }

    #[test]
    fn manifest_compat_checks_versions() {
        let file = ArtifactFile::from_bytes("params.bin", b"params");
        let mut manifest = ArtifactManifest {
            manifest_version: MANIFEST_VERSION,
            circuit_version: CIRCUIT_VERSION,
            k: 12,
            created_at_unix: 0,
            params: file.clone(),
            vk: file.clone(),
            pk: file,
        };
        assert!(ensure_manifest_compat(&manifest).is_ok());
        manifest.circuit_version += 1;
        assert!(ensure_manifest_compat(&manifest).is_err());
    }

    #[test]
    fn artifact_hash_mismatch_is_reported() {
        let entry = ArtifactFile::from_bytes("vk.bin", b"expected");
        assert_eq!(entry.size, 8);
        assert!(ensure_hash(b"expected", &entry.blake3, "vk").is_ok());
        assert!(ensure_hash(b"tampered", &entry.blake3, "vk").is_err());
    }
}
