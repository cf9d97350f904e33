//! Audio Engine Module
//!
//! The PCM side of Wavseal:
//! - Raw sample buffer and its format
//! - Lossless WAV decode/encode

pub mod buffer;
pub mod io;

pub use buffer::{ByteOrder, PcmSpec, SampleBuffer, SampleWidth};
pub use io::{decode_audio, encode_audio, generate_test_tone};
