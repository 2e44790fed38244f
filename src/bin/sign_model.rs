//! Artifact signing utility for Mindgauge predictor models.
//!
//! Creates a signed manifest (`manifest.json`) and Ed25519 signature
//! (`model.sig`) over the five exported predictor artifacts, enabling
//! cryptographic verification at load time.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sign_model -- <model_dir>
//! ```
//!
//! # Security
//!
//! - Signing key sourced from secure locations (FD, file, Docker secret)
//! - Manifest includes SHA-256 hashes of all bound artifacts
//! - Private key material zeroized after use

use std::collections::BTreeMap;
use std::env;
use std::fs;
#[cfg(unix)]
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey};
use serde::Serialize;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Artifacts the manifest must bind.
const ARTIFACTS: [&str; 5] = [
    "stress_model.json",
    "anxiety_model.json",
    "anxiety_prone_model.json",
    "depression_model.json",
    "depression_prone_model.json",
];

#[derive(Debug, Serialize)]
struct SignedModelManifest {
    version: u32,
    /// Unix timestamp (seconds) when this manifest was created.
    created_at: i64,
    files: BTreeMap<String, String>,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn sha256_hex(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {path:?}: {e}"))?;
    Ok(to_hex(&Sha256::digest(&bytes)))
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Seed([u8; 32]);

fn read_signing_seed_b64() -> Result<Zeroizing<String>, String> {
    const KEY_FD_ENV: &str = "MINDGAUGE_MODEL_SIGNING_KEY_B64_FD";
    const KEY_FILE_ENV: &str = "MINDGAUGE_MODEL_SIGNING_KEY_B64_FILE";
    const DOCKER_SECRET_PATH: &str = "/run/secrets/mindgauge_model_signing_key_b64";

    #[cfg(unix)]
    if let Ok(fd_str) = env::var(KEY_FD_ENV) {
        let fd: i32 = fd_str
            .trim()
            .parse()
            .map_err(|_| "Invalid key FD".to_string())?;
        if fd <= 2 {
            return Err("Refusing to read signing key from stdio FD".to_string());
        }
        // SAFETY: take ownership of FD for one-time secret read.
        let mut file = unsafe { std::fs::File::from_raw_fd(fd) };
        let mut buf = String::new();
        use std::io::Read;
        file.read_to_string(&mut buf)
            .map_err(|e| format!("Failed reading signing key from FD: {e}"))?;
        let secret = buf.trim_end_matches(['\n', '\r']).to_string();
        if secret.is_empty() {
            return Err("Empty signing key".to_string());
        }
        return Ok(Zeroizing::new(secret));
    }

    if let Ok(path) = env::var(KEY_FILE_ENV) {
        let content = fs::read_to_string(path.trim())
            .map_err(|e| format!("Failed reading signing key file: {e}"))?;
        let secret = content.trim_end_matches(['\n', '\r']).to_string();
        if secret.is_empty() {
            return Err("Empty signing key".to_string());
        }
        return Ok(Zeroizing::new(secret));
    }

    if Path::new(DOCKER_SECRET_PATH).exists() {
        let content = fs::read_to_string(DOCKER_SECRET_PATH)
            .map_err(|e| format!("Failed reading docker secret: {e}"))?;
        let secret = content.trim_end_matches(['\n', '\r']).to_string();
        if secret.is_empty() {
            return Err("Empty signing key".to_string());
        }
        return Ok(Zeroizing::new(secret));
    }

    // Dev-only fallback for convenience.
    if cfg!(debug_assertions) {
        if let Ok(v) = env::var("MINDGAUGE_MODEL_SIGNING_KEY_B64") {
            let secret = v.trim_end_matches(['\n', '\r']).to_string();
            if secret.is_empty() {
                return Err("Empty signing key".to_string());
            }
            return Ok(Zeroizing::new(secret));
        }
    }

    Err(
        "Missing signing key. Provide one of: MINDGAUGE_MODEL_SIGNING_KEY_B64_FD, MINDGAUGE_MODEL_SIGNING_KEY_B64_FILE, or /run/secrets/mindgauge_model_signing_key_b64 (env var fallback only in debug builds)."
            .to_string(),
    )
}

fn read_signing_seed() -> Result<Seed, String> {
    let v = read_signing_seed_b64()?;

    let raw = general_purpose::STANDARD
        .decode(v.trim())
        .map_err(|e| format!("Invalid base64 in signing key: {e}"))?;

    if raw.len() != 32 {
        return Err(format!(
            "Signing key seed must be 32 bytes after base64 decode (got {})",
            raw.len()
        ));
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&raw);
    Ok(Seed(seed))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn parse_args() -> Result<PathBuf, String> {
    let usage = "Usage: sign_model <model_dir>".to_string();
    let mut args = env::args().skip(1);

    let model_dir = match args.next() {
        Some(arg) if arg == "-h" || arg == "--help" => return Err(usage),
        Some(arg) => PathBuf::from(arg),
        None => return Err(usage),
    };
    if args.next().is_some() {
        return Err(usage);
    }
    Ok(model_dir)
}

fn main() -> Result<(), String> {
    let model_dir = parse_args()?;

    let model_dir = if model_dir.is_file() {
        model_dir
            .parent()
            .ok_or_else(|| "Model path has no parent directory".to_string())?
            .to_path_buf()
    } else {
        model_dir
    };

    let mut seed = read_signing_seed()?;
    let signing_key = SigningKey::from_bytes(&seed.0);
    let verifying_key = signing_key.verifying_key();

    let mut files: BTreeMap<String, String> = BTreeMap::new();
    for rel in ARTIFACTS {
        let p = model_dir.join(rel);
        if !p.exists() {
            return Err(format!("Missing required artifact {p:?}"));
        }
        files.insert(rel.to_string(), sha256_hex(&p)?);
    }

    let manifest = SignedModelManifest {
        version: 1,
        created_at: unix_now(),
        files,
    };
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize manifest.json: {e}"))?;

    let manifest_path = model_dir.join("manifest.json");
    fs::write(&manifest_path, &manifest_bytes)
        .map_err(|e| format!("Failed to write {manifest_path:?}: {e}"))?;

    let sig: Signature = signing_key.sign(&manifest_bytes);
    let sig_path = model_dir.join("model.sig");
    fs::write(&sig_path, sig.to_bytes())
        .map_err(|e| format!("Failed to write {sig_path:?}: {e}"))?;

    println!("Signed manifest: {manifest_path:?}");
    println!("Wrote signature: {sig_path:?}");
    println!("DEV_PUBKEY (hex)={}", to_hex(verifying_key.as_bytes()));

    // Best-effort: wipe seed from memory.
    seed.zeroize();

    Ok(())
}
