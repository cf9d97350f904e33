//! Cryptography Module
//!
//! Ed25519 keys and the signature protocol that hides signatures in audio.

pub mod keys;
pub mod protocol;

pub use keys::{KeyManager, KeyPair, KeyPaths};
pub use protocol::{
    blank_signature_region, extract_signature, sign, sign_file, verify, verify_file,
    SignOutcome, SIGNATURE_SLOT_SAMPLES,
};
