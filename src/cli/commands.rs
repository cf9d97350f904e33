//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{info, warn};

use crate::config::WavsealConfig;
use crate::crypto::keys::{self, KeyManager};
use crate::crypto::protocol;
use crate::engine::io::{decode_audio, encode_audio};
use crate::error::Result;
use crate::stego::lsb;

/// Generate a key pair at the configured paths.
pub fn generate_keys(config: &WavsealConfig) -> Result<()> {
    let manager = KeyManager::new(config.keys.clone());
    let pair = manager.generate_and_store()?;
    let public = pair.verifying_key();

    println!(
        "Signing key:   {}",
        manager.paths().signing_key_path.display()
    );
    println!(
        "Verifying key: {}",
        manager.paths().verifying_key_path.display()
    );
    println!("Public key (base64): {}", keys::public_key_to_text(&public));
    println!("Fingerprint: {}", keys::fingerprint(&public));
    println!();
    println!("Keep the signing key private. Share only the public key.");

    Ok(())
}

/// Print the configured verifying key as base64.
pub fn export_public(config: &WavsealConfig) -> Result<()> {
    let key = keys::import_public(&config.keys.verifying_key_path)?;
    println!("{}", keys::public_key_to_text(&key));
    Ok(())
}

/// Sign `input`, writing to `output` or back over `input`.
pub fn sign(config: &WavsealConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let output = output.unwrap_or(input);
    info!("Signing {} with {}", input.display(), config.keys.signing_key_path.display());

    let key = keys::import_private(&config.keys.signing_key_path)?;
    let outcome = protocol::sign_file(input, output, &key, config.byte_order)?;

    println!("Signed: {}", output.display());
    println!("Samples: {}", outcome.num_samples);
    println!("Signature: {}", hex_prefix(&outcome.signature.to_bytes(), 16));

    Ok(())
}

/// Verify `input` against a base64 key or the configured key file.
///
/// Returns whether the signature is valid.
pub fn verify(config: &WavsealConfig, input: &Path, key_text: Option<&str>) -> Result<bool> {
    let key = match key_text {
        Some(text) => keys::import_public_from_text(text)?,
        None => keys::import_public(&config.keys.verifying_key_path)?,
    };
    info!(
        "Verifying {} against key {}",
        input.display(),
        &keys::fingerprint(&key)[..16]
    );

    let valid = protocol::verify_file(input, &key, config.byte_order)?;
    println!("{}", if valid { "VALID" } else { "INVALID" });

    Ok(valid)
}

/// Hide a UTF-8 message in `input`.
pub fn embed(
    config: &WavsealConfig,
    input: &Path,
    message: &str,
    output: Option<&Path>,
) -> Result<()> {
    let output = output.unwrap_or(input);
    let mut buffer = decode_audio(input, config.byte_order)?;

    if message.as_bytes().contains(&0) {
        warn!("Message contains a NUL byte; extraction will stop there");
    }

    lsb::encode(&mut buffer, message.as_bytes())?;
    encode_audio(&buffer, output)?;

    println!(
        "Embedded {} bytes into {} (capacity {} bytes)",
        message.len(),
        output.display(),
        lsb::capacity(&buffer)
    );

    Ok(())
}

/// Print the zero-terminated message hidden in `input`.
pub fn extract(config: &WavsealConfig, input: &Path) -> Result<()> {
    let buffer = decode_audio(input, config.byte_order)?;
    let message = lsb::decode(&buffer, None)?;

    println!("{}", String::from_utf8_lossy(&message));

    Ok(())
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    let hex: String = bytes.iter().take(len).map(|b| format!("{:02x}", b)).collect();
    if bytes.len() > len {
        format!("{}...", hex)
    } else {
        hex
    }
}
