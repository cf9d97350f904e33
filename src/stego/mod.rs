//! Steganography Module
//!
//! Hides byte messages in the least significant bits of PCM samples:
//! - `bit_channel`: one bit in one sample byte
//! - `lsb`: whole messages, MSB first, zero-terminated

pub mod bit_channel;
pub mod lsb;

pub use lsb::{capacity, decode, encode, required_samples, SAMPLES_PER_BYTE};
