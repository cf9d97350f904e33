//! Wavseal - Signatures Hidden in Audio
//!
//! Wavseal signs PCM audio with Ed25519 and hides the 64-byte signature in
//! the least significant bits of the first 520 samples. Verification needs
//! only the audio and the signer's public key.
//!
//! # Architecture
//!
//! - `engine`: raw PCM sample buffers and lossless WAV I/O
//! - `stego`: bit-level and message-level LSB codec
//! - `crypto`: key management and the sign/verify protocol
//! - `cli`: the `wavseal` command-line tool

pub mod cli;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod stego;

pub use config::WavsealConfig;
pub use engine::{ByteOrder, PcmSpec, SampleBuffer, SampleWidth};
pub use error::{Result, WavsealError};
