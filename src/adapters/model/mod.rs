//! Exported-model adapter: Implementation of PredictorEngine.
//!
//! Loads the five predictor artifacts exported by the offline training
//! pipeline as JSON (linear regressors for the three dimension scores,
//! logistic classifiers for anxiety/depression proneness) and evaluates
//! them on plaintext answer vectors.
//!
//! # Security
//!
//! - Artifact files are bound by a SHA-256 manifest signed with Ed25519
//! - Only artifacts signed by the developer key are loaded
//! - In release builds, ALL artifacts MUST have a valid signature
//!
//! # Key Rotation
//!
//! To rotate the developer public key:
//! 1. Generate new keypair: `cargo run --bin generate_keypair`
//! 2. Replace `DEV_PUBKEY` constant with new public key bytes
//! 3. Re-sign the artifacts with the new private key
//! 4. Securely destroy the old private key

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{AnswerSet, Dimension, QUESTIONS_PER_DIMENSION};
use crate::ports::{ModelError, PredictorEngine};

/// Environment variable to allow loading unsigned artifacts.
///
/// SECURITY: This bypass is compiled only in debug builds.
/// In release builds, it is physically impossible to skip signature checks.
#[cfg(debug_assertions)]
const ALLOW_UNSIGNED_MODELS_ENV: &str = "MINDGAUGE_ALLOW_UNSIGNED_MODELS";

/// Score regressor artifact files, one per dimension.
const SCORE_ARTIFACTS: [(Dimension, &str); 3] = [
    (Dimension::Stress, "stress_model.json"),
    (Dimension::Anxiety, "anxiety_model.json"),
    (Dimension::Depression, "depression_model.json"),
];

/// Proneness classifier artifact files (anxiety and depression only).
const PRONE_ARTIFACTS: [(Dimension, &str); 2] = [
    (Dimension::Anxiety, "anxiety_prone_model.json"),
    (Dimension::Depression, "depression_prone_model.json"),
];

/// Linear score regressor exported by the Python training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedScoreModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Logistic proneness classifier over a single score feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedProneModel {
    pub feature_name: String,
    pub weight: f64,
    pub bias: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct SignedModelManifest {
    version: u32,
    created_at: i64,
    files: BTreeMap<String, String>,
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Adapter evaluating the exported predictor artifacts.
pub struct ExportedModelAdapter {
    scores: HashMap<Dimension, ExportedScoreModel>,
    prone: HashMap<Dimension, ExportedProneModel>,
}

impl ExportedModelAdapter {
    /// Create a new adapter with no artifacts loaded.
    #[must_use]
    pub fn new() -> Self {
        tracing::info!("Initializing ExportedModelAdapter");
        Self {
            scores: HashMap::new(),
            prone: HashMap::new(),
        }
    }

    /// Whether all five artifacts are loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.scores.len() == SCORE_ARTIFACTS.len() && self.prone.len() == PRONE_ARTIFACTS.len()
    }

    /// Load the predictor artifacts from the export directory.
    ///
    /// # Security
    ///
    /// The artifacts must be bound by a signed manifest (`manifest.json` +
    /// `model.sig`) verified against the developer's Ed25519 key.
    ///
    /// # Errors
    /// Returns error if artifact files cannot be loaded or the signature is
    /// invalid.
    pub fn load_models(&mut self, model_dir: &Path) -> Result<(), ModelError> {
        // Verify the signature before trusting any artifact content
        // (unless explicitly bypassed in debug builds).
        let manifest = self.verify_manifest(model_dir)?;

        if let Some(manifest) = &manifest {
            // Every artifact we are about to load must be bound by the manifest.
            for (_, rel) in SCORE_ARTIFACTS.iter().chain(PRONE_ARTIFACTS.iter()) {
                if !manifest.files.contains_key(*rel) {
                    return Err(ModelError::Signature(format!(
                        "manifest.json does not bind required artifact {rel}"
                    )));
                }
            }
        }

        for (dimension, rel) in SCORE_ARTIFACTS {
            let model: ExportedScoreModel = read_artifact(&model_dir.join(rel))?;
            validate_score_model(rel, &model)?;
            self.scores.insert(dimension, model);
        }

        for (dimension, rel) in PRONE_ARTIFACTS {
            let model: ExportedProneModel = read_artifact(&model_dir.join(rel))?;
            validate_prone_model(rel, &model)?;
            self.prone.insert(dimension, model);
        }

        tracing::info!(
            "Loaded {} score models and {} proneness models from {:?}",
            self.scores.len(),
            self.prone.len(),
            model_dir
        );

        Ok(())
    }

    /// Verify the artifact manifest signature using Ed25519.
    ///
    /// Returns `None` only when the debug-build unsigned bypass is active.
    fn verify_manifest(&self, model_dir: &Path) -> Result<Option<SignedModelManifest>, ModelError> {
        #[cfg(debug_assertions)]
        fn allow_unsigned_models_for_debug() -> bool {
            std::env::var(ALLOW_UNSIGNED_MODELS_ENV)
                .map(|v| v == "true")
                .unwrap_or(false)
        }

        let sig_path = model_dir.join("model.sig");
        let manifest_path = model_dir.join("manifest.json");

        // SECURITY: Signature verification is MANDATORY in release builds.
        // In debug builds, can be bypassed ONLY with explicit env var for testing.
        if !sig_path.exists() || !manifest_path.exists() {
            #[cfg(not(debug_assertions))]
            {
                tracing::error!(
                    "Artifact signature not found at {:?}. \
                     Production builds require signed artifacts.",
                    sig_path
                );
                return Err(ModelError::Signature(
                    "Artifact signature required in production".into(),
                ));
            }

            #[cfg(debug_assertions)]
            {
                if allow_unsigned_models_for_debug() {
                    tracing::warn!(
                        "Loading UNSIGNED artifacts ({ALLOW_UNSIGNED_MODELS_ENV}=true). \
                         This is only allowed in debug builds for testing."
                    );
                    return Ok(None);
                }
                tracing::error!(
                    "Artifact signature not found at {:?}. \
                     Set {ALLOW_UNSIGNED_MODELS_ENV}=true to bypass in debug builds.",
                    sig_path
                );
                return Err(ModelError::Signature(format!(
                    "Artifact signature required. Set {ALLOW_UNSIGNED_MODELS_ENV}=true for testing."
                )));
            }
        }

        let sig_bytes = fs::read(&sig_path)
            .map_err(|e| ModelError::Signature(format!("Failed to read signature: {e}")))?;

        if sig_bytes.len() != 64 {
            return Err(ModelError::Signature(
                "Invalid signature length (expected 64 bytes)".into(),
            ));
        }

        let signature = Signature::from_bytes(
            sig_bytes
                .as_slice()
                .try_into()
                .map_err(|_| ModelError::Signature("Invalid signature format".into()))?,
        );

        // The manifest is the signed content.
        let manifest_content = fs::read(&manifest_path)
            .map_err(|e| ModelError::Signature(format!("Failed to read manifest: {e}")))?;

        let public_key = Self::developer_public_key()?;
        public_key
            .verify(&manifest_content, &signature)
            .map_err(|_| ModelError::Signature("Invalid artifact signature".into()))?;

        let manifest: SignedModelManifest = serde_json::from_slice(&manifest_content)
            .map_err(|e| ModelError::Signature(format!("Invalid manifest.json format: {e}")))?;
        if manifest.version != 1 {
            return Err(ModelError::Signature(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }

        // Refuse manifests too far in the future (clock skew allowance: 5 minutes).
        if manifest.created_at > unix_now() + 300 {
            return Err(ModelError::Signature(
                "manifest created_at is in the future".into(),
            ));
        }

        if manifest.files.is_empty() {
            return Err(ModelError::Signature(
                "manifest.json contains no files".into(),
            ));
        }

        // The signed manifest must bind the actual on-disk artifact bytes.
        for (rel, expected_hex) in &manifest.files {
            let path = model_dir.join(rel);
            let bytes = fs::read(&path).map_err(|e| {
                ModelError::Signature(format!(
                    "Manifest references missing/unreadable file {path:?}: {e}"
                ))
            })?;
            if !constant_time_eq_str(&sha256_hex(&bytes), expected_hex) {
                return Err(ModelError::Signature(format!("File hash mismatch for {rel}")));
            }
        }

        tracing::info!("Artifact signature and hashes verified successfully");
        Ok(Some(manifest))
    }

    /// Get the embedded developer public key for artifact verification.
    ///
    /// This key is compiled into the binary and used to verify all artifact
    /// signatures. Deployments can override it from a secret file.
    fn developer_public_key() -> Result<VerifyingKey, ModelError> {
        const PUBKEY_FILE_ENV: &str = "MINDGAUGE_MODEL_SIGNING_PUBKEY_B64_FILE";
        const DOCKER_SECRET_PUBKEY: &str = "/run/secrets/mindgauge_model_signing_pubkey_b64";

        if let Ok(path) = std::env::var(PUBKEY_FILE_ENV) {
            let b64 = fs::read_to_string(path.trim())
                .map_err(|e| ModelError::Signature(format!("Failed reading pubkey file: {e}")))?;
            return Self::verifying_key_from_b64(&b64);
        }

        if Path::new(DOCKER_SECRET_PUBKEY).exists() {
            let b64 = fs::read_to_string(DOCKER_SECRET_PUBKEY).map_err(|e| {
                ModelError::Signature(format!("Failed reading docker pubkey secret: {e}"))
            })?;
            return Self::verifying_key_from_b64(&b64);
        }

        #[cfg(test)]
        {
            // Test-only override: allows unit tests to generate a fresh keypair
            // and validate the signed-artifact workflow without embedding any
            // private key.
            const TEST_PUBKEY_ENV: &str = "MINDGAUGE_TEST_DEV_PUBKEY_B64";
            if let Ok(b64) = std::env::var(TEST_PUBKEY_ENV) {
                return Self::verifying_key_from_b64(&b64);
            }
        }

        // Ed25519 public key (32 bytes)
        // Generated with: cargo run --bin generate_keypair
        const DEV_PUBKEY: [u8; 32] = [
            0x4c, 0x91, 0x0e, 0xb7, 0x3d, 0x5a, 0xe4, 0x21, 0x78, 0xc2, 0x9f, 0x06, 0xb1, 0x5d,
            0x3a, 0x88, 0xe0, 0x17, 0x64, 0xcf, 0x2b, 0x9e, 0x50, 0xd3, 0x42, 0x8a, 0xf5, 0x1c,
            0x69, 0x07, 0xbd, 0x2e,
        ];

        VerifyingKey::from_bytes(&DEV_PUBKEY)
            .map_err(|_| ModelError::Signature("Invalid embedded public key".into()))
    }

    fn verifying_key_from_b64(b64: &str) -> Result<VerifyingKey, ModelError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|_| ModelError::Signature("Invalid public key base64".into()))?;
        if bytes.len() != 32 {
            return Err(ModelError::Signature(
                "Invalid public key length (expected 32 bytes)".into(),
            ));
        }
        let mut pubkey = [0u8; 32];
        pubkey.copy_from_slice(&bytes);
        VerifyingKey::from_bytes(&pubkey)
            .map_err(|_| ModelError::Signature("Invalid verifying key".into()))
    }

    /// Logistic function for the proneness classifiers.
    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
}

fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ModelError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ModelError::InvalidArtifact(format!("Failed to read artifact {path:?}: {e}"))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| ModelError::InvalidArtifact(format!("Invalid artifact {path:?}: {e}")))
}

fn validate_score_model(rel: &str, model: &ExportedScoreModel) -> Result<(), ModelError> {
    let n = model.feature_names.len();
    if n != QUESTIONS_PER_DIMENSION {
        return Err(ModelError::InvalidArtifact(format!(
            "{rel}: expected {QUESTIONS_PER_DIMENSION} features, got {n}"
        )));
    }
    if model.coefficients.len() != n {
        return Err(ModelError::InvalidArtifact(format!(
            "{rel}: coefficient count does not match feature_names length"
        )));
    }
    if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ModelError::InvalidArtifact(format!(
            "{rel}: non-finite model parameters"
        )));
    }
    Ok(())
}

fn validate_prone_model(rel: &str, model: &ExportedProneModel) -> Result<(), ModelError> {
    if !model.weight.is_finite() || !model.bias.is_finite() {
        return Err(ModelError::InvalidArtifact(format!(
            "{rel}: non-finite model parameters"
        )));
    }
    Ok(())
}

impl Default for ExportedModelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorEngine for ExportedModelAdapter {
    fn predict_score(&self, dimension: Dimension, answers: &AnswerSet) -> Result<f64, ModelError> {
        let model = self
            .scores
            .get(&dimension)
            .ok_or_else(|| ModelError::NotLoaded(format!("{dimension} score regressor")))?;

        let features = answers.to_vec();
        if features.len() != model.coefficients.len() {
            return Err(ModelError::Prediction(format!(
                "Feature count mismatch: got {}, expected {}",
                features.len(),
                model.coefficients.len()
            )));
        }

        let score: f64 = features
            .iter()
            .zip(model.coefficients.iter())
            .map(|(x, c)| x * c)
            .sum::<f64>()
            + model.intercept;

        tracing::debug!("Predicted {dimension} score: {score:.2}");
        Ok(score)
    }

    fn predict_proneness(&self, dimension: Dimension, score: f64) -> Result<bool, ModelError> {
        if !dimension.has_prone_classifier() {
            return Err(ModelError::NoProneClassifier(dimension));
        }

        let model = self
            .prone
            .get(&dimension)
            .ok_or_else(|| ModelError::NotLoaded(format!("{dimension} proneness classifier")))?;

        let probability = Self::sigmoid(model.weight * score + model.bias);
        let prone = probability >= 0.5;

        tracing::debug!("Predicted {dimension} proneness: p={probability:.3}, prone={prone}");
        Ok(prone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::RngCore;
    use std::sync::{Mutex, Once};
    use tempfile::tempdir;

    // Signed-artifact tests share the test pubkey env var; serialize them.
    static SIGNED_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn allow_unsigned_models_for_tests() {
        static ONCE: Once = Once::new();
        ONCE.call_once(|| {
            std::env::set_var(ALLOW_UNSIGNED_MODELS_ENV, "true");
        });
    }

    fn write_score_model(dir: &Path, rel: &str, coefficient: f64, intercept: f64) {
        let model = ExportedScoreModel {
            feature_names: (1..=7).map(|i| format!("q{i}")).collect(),
            coefficients: vec![coefficient; 7],
            intercept,
        };
        let json = serde_json::to_string(&model).expect("serialize model");
        std::fs::write(dir.join(rel), json).expect("write model");
    }

    fn write_prone_model(dir: &Path, rel: &str, weight: f64, bias: f64) {
        let model = ExportedProneModel {
            feature_name: "score".into(),
            weight,
            bias,
        };
        let json = serde_json::to_string(&model).expect("serialize model");
        std::fs::write(dir.join(rel), json).expect("write model");
    }

    fn write_all_artifacts(dir: &Path) {
        write_score_model(dir, "stress_model.json", 2.0, 0.0);
        write_score_model(dir, "anxiety_model.json", 2.0, 0.5);
        write_score_model(dir, "depression_model.json", 2.0, -0.5);
        // Prone cut-over at score 12 for anxiety, 15 for depression.
        write_prone_model(dir, "anxiety_prone_model.json", 0.9, -10.8);
        write_prone_model(dir, "depression_prone_model.json", 0.75, -11.25);
    }

    fn write_signed_manifest(dir: &Path, signing_key: &SigningKey) {
        let mut files = BTreeMap::new();
        for (_, rel) in SCORE_ARTIFACTS.iter().chain(PRONE_ARTIFACTS.iter()) {
            let bytes = std::fs::read(dir.join(rel)).expect("read artifact");
            files.insert((*rel).to_string(), sha256_hex(&bytes));
        }

        let manifest = SignedModelManifest {
            version: 1,
            created_at: unix_now(),
            files,
        };
        let manifest_bytes = serde_json::to_vec(&manifest).expect("serialize manifest");
        std::fs::write(dir.join("manifest.json"), &manifest_bytes).expect("write manifest");

        let signature: Signature = signing_key.sign(&manifest_bytes);
        std::fs::write(dir.join("model.sig"), signature.to_bytes()).expect("write signature");
    }

    fn test_signing_key() -> SigningKey {
        let mut sk = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut sk);
        let signing_key = SigningKey::from_bytes(&sk);
        let pubkey_b64 = base64::engine::general_purpose::STANDARD
            .encode(signing_key.verifying_key().to_bytes());
        std::env::set_var("MINDGAUGE_TEST_DEV_PUBKEY_B64", pubkey_b64);
        signing_key
    }

    #[test]
    fn test_load_signed_artifacts() {
        let _guard = SIGNED_TEST_LOCK.lock().expect("lock");
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        write_all_artifacts(dir);
        let signing_key = test_signing_key();
        write_signed_manifest(dir, &signing_key);

        let mut adapter = ExportedModelAdapter::new();
        adapter.load_models(dir).expect("load signed artifacts");
        assert!(adapter.is_loaded());

        std::env::remove_var("MINDGAUGE_TEST_DEV_PUBKEY_B64");
    }

    #[test]
    fn test_load_fails_on_tampered_artifact() {
        let _guard = SIGNED_TEST_LOCK.lock().expect("lock");
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        write_all_artifacts(dir);
        let signing_key = test_signing_key();
        write_signed_manifest(dir, &signing_key);

        // Tamper after signing.
        write_score_model(dir, "stress_model.json", 99.0, 0.0);

        let mut adapter = ExportedModelAdapter::new();
        let err = adapter.load_models(dir).expect_err("must fail");
        assert!(err.to_string().contains("hash mismatch"));

        std::env::remove_var("MINDGAUGE_TEST_DEV_PUBKEY_B64");
    }

    #[test]
    fn test_load_unsigned_in_debug() {
        allow_unsigned_models_for_tests();

        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        write_all_artifacts(dir);

        let mut adapter = ExportedModelAdapter::new();
        adapter.load_models(dir).expect("load unsigned artifacts");
        assert!(adapter.is_loaded());
    }

    #[test]
    fn test_load_rejects_wrong_feature_count() {
        allow_unsigned_models_for_tests();

        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        write_all_artifacts(dir);

        let bad = ExportedScoreModel {
            feature_names: vec!["q1".into()],
            coefficients: vec![2.0],
            intercept: 0.0,
        };
        std::fs::write(
            dir.join("anxiety_model.json"),
            serde_json::to_string(&bad).expect("serialize"),
        )
        .expect("write");

        let mut adapter = ExportedModelAdapter::new();
        let err = adapter.load_models(dir).expect_err("must fail");
        assert!(matches!(err, ModelError::InvalidArtifact(_)));
    }

    #[test]
    fn test_predict_score_is_dot_product() {
        allow_unsigned_models_for_tests();

        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        write_all_artifacts(dir);

        let mut adapter = ExportedModelAdapter::new();
        adapter.load_models(dir).expect("load artifacts");

        let answers = AnswerSet::new([3, 3, 3, 3, 3, 3, 3]);
        let score = adapter
            .predict_score(Dimension::Stress, &answers)
            .expect("predict");
        // 7 answers of 3, coefficient 2.0, intercept 0.
        assert!((score - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_proneness_threshold() {
        allow_unsigned_models_for_tests();

        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        write_all_artifacts(dir);

        let mut adapter = ExportedModelAdapter::new();
        adapter.load_models(dir).expect("load artifacts");

        // Anxiety cut-over is at score 12 (0.9 * 12 - 10.8 = 0).
        assert!(adapter
            .predict_proneness(Dimension::Anxiety, 12.0)
            .expect("predict"));
        assert!(!adapter
            .predict_proneness(Dimension::Anxiety, 8.0)
            .expect("predict"));
    }

    #[test]
    fn test_predict_proneness_rejects_stress() {
        let adapter = ExportedModelAdapter::new();
        let err = adapter
            .predict_proneness(Dimension::Stress, 20.0)
            .expect_err("stress has no prone classifier");
        assert!(matches!(err, ModelError::NoProneClassifier(_)));
    }
}
