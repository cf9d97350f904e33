//! Configuration
//!
//! Resolved in increasing precedence: built-in defaults, an optional JSON
//! file, `WAVSEAL_*` environment variables, then CLI flags (applied by the
//! caller).

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::crypto::keys::KeyPaths;
use crate::engine::buffer::ByteOrder;
use crate::error::{Result, WavsealError};

pub const ENV_SIGNING_KEY: &str = "WAVSEAL_SIGNING_KEY";
pub const ENV_VERIFYING_KEY: &str = "WAVSEAL_VERIFYING_KEY";
pub const ENV_BYTE_ORDER: &str = "WAVSEAL_BYTE_ORDER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavsealConfig {
    pub keys: KeyPaths,
    /// Which byte of each sample carries the embedded bit
    pub byte_order: ByteOrder,
}

impl WavsealConfig {
    /// Defaults, overlaid with `config_path` if given, then the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|name| std::env::var(name).ok())
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| WavsealError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: WavsealConfig =
            serde_json::from_str(&content).map_err(|e| WavsealError::Config {
                reason: format!("{}: {}", path.display(), e),
            })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_SIGNING_KEY) {
            self.keys.signing_key_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_VERIFYING_KEY) {
            self.keys.verifying_key_path = PathBuf::from(path);
        }
        if let Some(order) = lookup(ENV_BYTE_ORDER) {
            self.byte_order = order.parse()?;
        }
        Ok(self)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| WavsealError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = WavsealConfig::default();
        assert_eq!(config.byte_order, ByteOrder::Little);
        assert_eq!(
            config.keys.signing_key_path,
            PathBuf::from("key/signing_key.pem")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wavseal.json");
        fs::write(&path, r#"{ "byte_order": "native" }"#).unwrap();

        let config = WavsealConfig::from_file(&path).unwrap();

        assert_eq!(config.byte_order, ByteOrder::Native);
        assert_eq!(config.keys, KeyPaths::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wavseal.json");
        let config = WavsealConfig {
            keys: KeyPaths {
                signing_key_path: PathBuf::from("/secure/sk"),
                verifying_key_path: PathBuf::from("/public/pk"),
            },
            byte_order: ByteOrder::Big,
        };

        config.save(&path).unwrap();

        assert_eq!(WavsealConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_VERIFYING_KEY, "/tmp/pk.pub"),
            (ENV_BYTE_ORDER, "big"),
        ]
        .into_iter()
        .collect();

        let config = WavsealConfig::default()
            .with_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.byte_order, ByteOrder::Big);
        assert_eq!(config.keys.verifying_key_path, PathBuf::from("/tmp/pk.pub"));
        assert_eq!(
            config.keys.signing_key_path,
            PathBuf::from("key/signing_key.pem")
        );
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        let err = WavsealConfig::default()
            .with_env(|name| (name == ENV_BYTE_ORDER).then(|| "sideways".to_string()))
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG");

        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(
            WavsealConfig::from_file(&path).unwrap_err().error_code(),
            "CONFIG"
        );
    }
}
