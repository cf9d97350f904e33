//! Ed25519 key management
//!
//! Keys are stored as raw fixed-size blobs: the 32-byte secret seed for the
//! signing key and the 32-byte compressed point for the verifying key. The
//! verifying key also has a base64 text form for pasting into requests.
//! Only the verifying key should ever leave the signing host.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use log::{debug, info};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, WavsealError};

/// Default location of the signing key
pub const DEFAULT_SIGNING_KEY_PATH: &str = "key/signing_key.pem";
/// Default location of the verifying key
pub const DEFAULT_VERIFYING_KEY_PATH: &str = "key/verifying_key.pub";

/// A signing key together with its verifying key
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh pair from the operating system's CSPRNG
    pub fn generate() -> Self {
        KeyPair {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        KeyPair { signing_key }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

/// Write the raw signing key seed to `path`
pub fn export_private(key: &SigningKey, path: &Path) -> Result<()> {
    write_key_file(path, &key.to_bytes())
}

/// Write the raw verifying key to `path`
pub fn export_public(key: &VerifyingKey, path: &Path) -> Result<()> {
    write_key_file(path, key.as_bytes())
}

/// Read a signing key seed from `path`
///
/// # Errors
/// * `FileRead` - if the file cannot be read
/// * `KeyFormat` - if the file is not exactly 32 bytes
pub fn import_private(path: &Path) -> Result<SigningKey> {
    let bytes = read_key_file(path)?;
    signing_key_from_bytes(&bytes)
}

/// Read a verifying key from `path`
///
/// # Errors
/// * `FileRead` - if the file cannot be read
/// * `KeyFormat` - if the file is not 32 bytes or not a valid curve point
pub fn import_public(path: &Path) -> Result<VerifyingKey> {
    let bytes = read_key_file(path)?;
    verifying_key_from_bytes(&bytes)
}

/// Parse a verifying key from its base64 text form
pub fn import_public_from_text(text: &str) -> Result<VerifyingKey> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| WavsealError::KeyFormat {
            reason: format!("public key is not valid base64: {}", e),
        })?;
    verifying_key_from_bytes(&bytes)
}

/// Base64 text form of a verifying key
pub fn public_key_to_text(key: &VerifyingKey) -> String {
    STANDARD.encode(key.as_bytes())
}

/// Lowercase hex SHA-256 of the raw verifying key
pub fn fingerprint(key: &VerifyingKey) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

pub fn signing_key_from_bytes(bytes: &[u8]) -> Result<SigningKey> {
    let seed: [u8; SECRET_KEY_LENGTH] =
        bytes.try_into().map_err(|_| WavsealError::KeyFormat {
            reason: format!(
                "signing key must be {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            ),
        })?;
    Ok(SigningKey::from_bytes(&seed))
}

pub fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey> {
    let raw: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| WavsealError::KeyFormat {
        reason: format!(
            "public key must be {} bytes, got {}",
            PUBLIC_KEY_LENGTH,
            bytes.len()
        ),
    })?;
    VerifyingKey::from_bytes(&raw).map_err(|e| WavsealError::KeyFormat {
        reason: format!("public key is not a valid Ed25519 point: {}", e),
    })
}

fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| WavsealError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_key_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| WavsealError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, bytes).map_err(|e| WavsealError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Wrote {} key bytes to {}", bytes.len(), path.display());
    Ok(())
}

// ============================================================================
// KeyManager
// ============================================================================

/// Where the key pair lives on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPaths {
    pub signing_key_path: PathBuf,
    pub verifying_key_path: PathBuf,
}

impl Default for KeyPaths {
    fn default() -> Self {
        KeyPaths {
            signing_key_path: PathBuf::from(DEFAULT_SIGNING_KEY_PATH),
            verifying_key_path: PathBuf::from(DEFAULT_VERIFYING_KEY_PATH),
        }
    }
}

/// Generates, stores and loads the key pair at configured paths
#[derive(Debug, Clone)]
pub struct KeyManager {
    paths: KeyPaths,
}

impl KeyManager {
    pub fn new(paths: KeyPaths) -> Self {
        KeyManager { paths }
    }

    pub fn paths(&self) -> &KeyPaths {
        &self.paths
    }

    /// Generate a new pair and write both halves
    pub fn generate_and_store(&self) -> Result<KeyPair> {
        let pair = KeyPair::generate();
        export_private(pair.signing_key(), &self.paths.signing_key_path)?;
        export_public(&pair.verifying_key(), &self.paths.verifying_key_path)?;

        info!(
            "Generated key pair {} (signing: {}, verifying: {})",
            &fingerprint(&pair.verifying_key())[..16],
            self.paths.signing_key_path.display(),
            self.paths.verifying_key_path.display()
        );

        Ok(pair)
    }

    pub fn load_signing_key(&self) -> Result<SigningKey> {
        import_private(&self.paths.signing_key_path)
    }

    pub fn load_verifying_key(&self) -> Result<VerifyingKey> {
        import_public(&self.paths.verifying_key_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let private_path = dir.path().join("signing.pem");
        let public_path = dir.path().join("verifying.pub");

        let pair = KeyPair::generate();
        export_private(pair.signing_key(), &private_path).unwrap();
        export_public(&pair.verifying_key(), &public_path).unwrap();

        assert_eq!(fs::read(&private_path).unwrap().len(), 32);
        assert_eq!(fs::read(&public_path).unwrap().len(), 32);

        let signing = import_private(&private_path).unwrap();
        let verifying = import_public(&public_path).unwrap();
        assert_eq!(signing.to_bytes(), pair.signing_key().to_bytes());
        assert_eq!(verifying, pair.verifying_key());
        assert_eq!(signing.verifying_key(), verifying);
    }

    #[test]
    fn test_text_round_trip() {
        let pair = KeyPair::generate();
        let text = public_key_to_text(&pair.verifying_key());

        assert_eq!(text.len(), 44);
        assert_eq!(
            import_public_from_text(&format!("  {}\n", text)).unwrap(),
            pair.verifying_key()
        );
    }

    #[test]
    fn test_wrong_length_is_key_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.pem");
        fs::write(&path, [7u8; 31]).unwrap();

        match import_private(&path) {
            Err(WavsealError::KeyFormat { reason }) => assert!(reason.contains("31")),
            other => panic!("Expected KeyFormat, got: {:?}", other.map(|_| ())),
        }
        assert!(matches!(
            import_public(&path),
            Err(WavsealError::KeyFormat { .. })
        ));
    }

    #[test]
    fn test_malformed_text_is_key_format_error() {
        assert!(matches!(
            import_public_from_text("not base64!"),
            Err(WavsealError::KeyFormat { .. })
        ));
        // Valid base64, wrong length
        assert!(matches!(
            import_public_from_text("AAAA"),
            Err(WavsealError::KeyFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = import_public(Path::new("/nonexistent/verifying.pub")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let key = SigningKey::from_bytes(&[0xABu8; 32]).verifying_key();
        let first = fingerprint(&key);

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(first, fingerprint(&key));
    }

    #[test]
    fn test_key_manager_creates_directories() {
        let dir = tempdir().unwrap();
        let manager = KeyManager::new(KeyPaths {
            signing_key_path: dir.path().join("nested/key/signing_key.pem"),
            verifying_key_path: dir.path().join("nested/key/verifying_key.pub"),
        });

        let pair = manager.generate_and_store().unwrap();

        assert_eq!(manager.load_verifying_key().unwrap(), pair.verifying_key());
        assert_eq!(
            manager.load_signing_key().unwrap().to_bytes(),
            pair.signing_key().to_bytes()
        );
    }
}
