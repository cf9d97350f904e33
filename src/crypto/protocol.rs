//! Sign-then-embed and extract-then-verify
//!
//! The signed message is the full PCM byte stream with the signature slot
//! (the first 64 payload bytes plus terminator, i.e. 520 samples) blanked to
//! zero bits. Signing blanks the slot, signs, then embeds the signature in
//! the same slot. Verification extracts the signature, blanks the slot again
//! to rebuild the signed message, and checks it.
//!
//! Any change to the audio outside the slot, including lossy re-encoding,
//! makes verification fail.

use std::path::Path;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SIGNATURE_LENGTH};
use log::{debug, info, warn};

use crate::engine::buffer::{ByteOrder, SampleBuffer};
use crate::engine::io::{decode_audio, encode_audio};
use crate::error::{Result, WavsealError};
use crate::stego::lsb;

/// Canonical contents of the signature slot while signing
const LSB_NORMALIZER: [u8; SIGNATURE_LENGTH] = [0u8; SIGNATURE_LENGTH];

/// Samples needed to carry a signature and its terminator
pub const SIGNATURE_SLOT_SAMPLES: usize = (SIGNATURE_LENGTH + 1) * lsb::SAMPLES_PER_BYTE;

/// Result of signing a file
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub signature: Signature,
    /// Samples in the signed audio
    pub num_samples: usize,
}

/// Overwrite the signature slot with zero bits
pub fn blank_signature_region(buffer: &mut SampleBuffer) -> Result<()> {
    lsb::encode(buffer, &LSB_NORMALIZER)
}

/// Sign `buffer` and embed the signature in place
///
/// # Errors
/// * `OutOfCapacity` - if the buffer has fewer than 520 samples; nothing is
///   written in that case
pub fn sign(buffer: &mut SampleBuffer, key: &SigningKey) -> Result<Signature> {
    ensure_slot(buffer)?;

    blank_signature_region(buffer)?;
    let signature = key.sign(buffer.as_bytes());
    lsb::encode(buffer, &signature.to_bytes())?;

    debug!(
        "Signed {} bytes of PCM ({} samples)",
        buffer.byte_len(),
        buffer.num_samples()
    );

    Ok(signature)
}

/// Read the embedded signature without modifying the buffer
pub fn extract_signature(buffer: &SampleBuffer) -> Result<Signature> {
    ensure_slot(buffer)?;

    let bytes = lsb::decode(buffer, Some(SIGNATURE_LENGTH))?;
    let raw: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| WavsealError::InvalidBuffer {
        reason: "embedded signature has the wrong length".to_string(),
    })?;

    Ok(Signature::from_bytes(&raw))
}

/// Check the signature embedded in `buffer` against `key`
///
/// Returns `Ok(false)` when the signature does not match. The caller's
/// buffer is not modified.
///
/// # Errors
/// * `OutOfCapacity` - if the buffer is too short to hold a signature
pub fn verify(buffer: &SampleBuffer, key: &VerifyingKey) -> Result<bool> {
    let signature = extract_signature(buffer)?;

    let mut message = buffer.clone();
    blank_signature_region(&mut message)?;

    let valid = key.verify(message.as_bytes(), &signature).is_ok();
    if !valid {
        debug!("Embedded signature does not match the audio");
    }

    Ok(valid)
}

/// Decode `input`, sign it and write the result to `output`
///
/// `input` and `output` may be the same path.
pub fn sign_file(
    input: &Path,
    output: &Path,
    key: &SigningKey,
    byte_order: ByteOrder,
) -> Result<SignOutcome> {
    let mut buffer = decode_audio(input, byte_order)?;
    let signature = sign(&mut buffer, key)?;
    encode_audio(&buffer, output)?;

    info!(
        "Signed {} -> {} ({:.2}s, {} ch)",
        input.display(),
        output.display(),
        buffer.duration_secs(),
        buffer.channels()
    );

    Ok(SignOutcome {
        signature,
        num_samples: buffer.num_samples(),
    })
}

/// Decode `input` and verify its embedded signature
pub fn verify_file(input: &Path, key: &VerifyingKey, byte_order: ByteOrder) -> Result<bool> {
    let buffer = decode_audio(input, byte_order)?;
    let valid = verify(&buffer, key)?;

    if valid {
        info!("Signature valid: {}", input.display());
    } else {
        warn!("Signature invalid: {}", input.display());
    }

    Ok(valid)
}

fn ensure_slot(buffer: &SampleBuffer) -> Result<()> {
    if buffer.num_samples() < SIGNATURE_SLOT_SAMPLES {
        return Err(WavsealError::OutOfCapacity {
            required_samples: SIGNATURE_SLOT_SAMPLES,
            available_samples: buffer.num_samples(),
        });
    }
    Ok(())
}
