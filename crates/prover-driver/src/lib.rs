//! Drives the external Noir-style `witness-gen`/`prove` pipeline: writes
//! `Prover.toml`, spawns both stages under a hard timeout, and parses the
//! resulting proof and public-inputs artifacts.
//!
//! Every failure here is fatal *for this iteration only* — the driver never
//! retries internally. Proving is deterministic and expensive; a caller that
//! retried would just pay for the same failure twice. The main loop treats
//! [`ProverError`] as "skip this batch, log, try again next poll".

mod input;

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use chain_domain::Order;
use public_inputs::PublicInputs;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

pub use input::{build_prover_input, to_toml_string};

const WITNESS_GEN_TIMEOUT: Duration = Duration::from_secs(120);
const PROVE_TIMEOUT: Duration = Duration::from_secs(300);

/// Size of the public-inputs artifact: 25 slots of 32 bytes each.
pub const PUBLIC_INPUTS_BLOB_LEN: usize = 25 * 32;

const PROVER_TOML: &str = "Prover.toml";
const WITNESS_GEN_BIN: &str = "witness-gen";
const PROVE_BIN: &str = "prove";
const PROOF_PATH: &str = "target/proof/proof";
const PUBLIC_INPUTS_PATH: &str = "target/proof/public_inputs";

#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    #[error("failed to write {path}: {source}")]
    WriteInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn {stage}: {source}")]
    Spawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} timed out after {elapsed:?}")]
    Timeout { stage: &'static str, elapsed: Duration },
    #[error("{stage} exited with {status}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    NonZeroExit {
        stage: &'static str,
        status: std::process::ExitStatus,
        stdout: String,
        stderr: String,
    },
    #[error("public-inputs artifact is {actual} bytes, expected {expected}")]
    MalformedPublicInputsBlob { actual: usize, expected: usize },
}

/// The parsed outputs of a successful proving run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofArtifacts {
    /// Lowercase `0x`-prefixed hex encoding of the raw proof blob.
    pub proof_hex: String,
    /// 25 lowercase `0x`-prefixed 64-character hex strings, one per PI slot.
    pub public_inputs_hex: [String; 25],
}

/// Runs the full prove pipeline for one batch in `circuit_dir`.
///
/// Writes `Prover.toml`, invokes `witness-gen` then `prove`, and parses the
/// resulting artifacts. `circuit_dir` is assumed exclusive to this solver
/// instance for the duration of the call.
pub async fn prove_batch(
    circuit_dir: &Path,
    orders: &[Order],
    public_inputs: &PublicInputs,
) -> Result<ProofArtifacts, ProverError> {
    let prover_input = build_prover_input(orders, public_inputs);
    let toml_text = to_toml_string(&prover_input).expect("ProverInput always serializes");
    write_prover_toml(circuit_dir, &toml_text).await?;

    run_stage(circuit_dir, WITNESS_GEN_BIN, &[], WITNESS_GEN_TIMEOUT).await?;
    run_stage(
        circuit_dir,
        PROVE_BIN,
        &["--scheme", "ultrahonk"],
        PROVE_TIMEOUT,
    )
    .await?;

    let proof_bytes = read_artifact(&circuit_dir.join(PROOF_PATH)).await?;
    let pi_bytes = read_artifact(&circuit_dir.join(PUBLIC_INPUTS_PATH)).await?;

    if pi_bytes.len() != PUBLIC_INPUTS_BLOB_LEN {
        return Err(ProverError::MalformedPublicInputsBlob {
            actual: pi_bytes.len(),
            expected: PUBLIC_INPUTS_BLOB_LEN,
        });
    }

    Ok(ProofArtifacts {
        proof_hex: format!("0x{}", hex::encode(&proof_bytes)),
        public_inputs_hex: split_public_inputs_blob(&pi_bytes),
    })
}

async fn write_prover_toml(circuit_dir: &Path, contents: &str) -> Result<(), ProverError> {
    let path = circuit_dir.join(PROVER_TOML);
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|source| ProverError::WriteInput { path: path.clone(), source })?;
    file.write_all(contents.as_bytes())
        .await
        .map_err(|source| ProverError::WriteInput { path, source })
}

async fn run_stage(
    circuit_dir: &Path,
    program: &'static str,
    args: &[&str],
    stage_timeout: Duration,
) -> Result<(), ProverError> {
    let child = Command::new(program)
        .args(args)
        .current_dir(circuit_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProverError::Spawn { stage: program, source })?;

    let output = match timeout(stage_timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| ProverError::Spawn { stage: program, source })?,
        Err(_) => {
            return Err(ProverError::Timeout {
                stage: program,
                elapsed: stage_timeout,
            });
        }
    };

    if !output.status.success() {
        tracing::warn!(stage = program, status = %output.status, "prover stage failed");
        return Err(ProverError::NonZeroExit {
            stage: program,
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}

async fn read_artifact(path: &Path) -> Result<Vec<u8>, ProverError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ProverError::ReadArtifact { path: path.to_path_buf(), source })
}

fn split_public_inputs_blob(bytes: &[u8]) -> [String; 25] {
    std::array::from_fn(|i| format!("0x{}", hex::encode(&bytes[i * 32..(i + 1) * 32])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_800_byte_blob_into_25_slots() {
        let mut blob = vec![0u8; PUBLIC_INPUTS_BLOB_LEN];
        blob[63] = 0x2a; // last byte of slot 1
        let slots = split_public_inputs_blob(&blob);
        assert_eq!(slots.len(), 25);
        assert_eq!(slots[1], format!("0x{}{:02x}", "0".repeat(62), 0x2a));
        assert_eq!(slots[0], format!("0x{}", "0".repeat(64)));
    }

    #[tokio::test]
    async fn missing_artifact_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(&dir.path().join("target/proof/proof")).await;
        assert!(matches!(err, Err(ProverError::ReadArtifact { .. })));
    }

    #[tokio::test]
    async fn malformed_blob_length_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir_all(dir.path().join("target/proof")).await.unwrap();
        tokio::fs::write(dir.path().join("target/proof/proof"), b"deadbeef").await.unwrap();
        tokio::fs::write(dir.path().join("target/proof/public_inputs"), vec![0u8; 10])
            .await
            .unwrap();

        let proof_bytes = read_artifact(&dir.path().join("target/proof/proof")).await.unwrap();
        let pi_bytes = read_artifact(&dir.path().join("target/proof/public_inputs")).await.unwrap();
        assert!(!proof_bytes.is_empty());
        assert_ne!(pi_bytes.len(), PUBLIC_INPUTS_BLOB_LEN);
    }

    #[tokio::test]
    async fn witness_gen_timeout_is_reported() {
        // `sleep` as a stand-in external program models a hung prover stage;
        // the 1ms timeout forces the branch without waiting 120s in CI.
        let dir = tempfile::tempdir().unwrap();
        let result = run_stage(dir.path(), "sleep", &["5"], Duration::from_millis(1)).await;
        assert!(matches!(result, Err(ProverError::Timeout { stage: "sleep", .. })));
    }

    #[tokio::test]
    async fn non_zero_exit_is_reported_with_captured_output() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_stage(dir.path(), "false", &[], Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ProverError::NonZeroExit { stage: "false", .. })));
    }
}
