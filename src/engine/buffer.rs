//! Sample Buffer Management
//!
//! Raw interleaved PCM bytes as decoded from a container file, together with
//! the format parameters needed to re-encode them unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WavsealError};

// ============================================================================
// Byte order policy
// ============================================================================

/// Which byte of a multi-byte sample carries the embedded bit.
///
/// `Little` writes into the first byte of every sample, `Big` into the last.
/// WAV stores samples little-endian, so `Little` touches the true least
/// significant bit of each sample. `Native` resolves to the byte order of the
/// machine the code was compiled for; files written with it are only
/// readable on hosts of the same endianness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
    Native,
}

impl ByteOrder {
    /// Resolve `Native` against the compile target
    pub fn resolve(self) -> Self {
        match self {
            ByteOrder::Native if cfg!(target_endian = "big") => ByteOrder::Big,
            ByteOrder::Native => ByteOrder::Little,
            other => other,
        }
    }

    /// True when the embeddable byte is the last byte of a sample
    pub fn is_big_endian(self) -> bool {
        self.resolve() == ByteOrder::Big
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ByteOrder::Little => "little",
            ByteOrder::Big => "big",
            ByteOrder::Native => "native",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ByteOrder {
    type Err = WavsealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "little" | "le" => Ok(ByteOrder::Little),
            "big" | "be" => Ok(ByteOrder::Big),
            "native" | "host" => Ok(ByteOrder::Native),
            other => Err(WavsealError::Config {
                reason: format!("unknown byte order '{}'", other),
            }),
        }
    }
}

// ============================================================================
// PCM format
// ============================================================================

/// Width of one sample in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl SampleWidth {
    /// Number of bytes per sample
    #[inline]
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Bits per sample as stored in a WAV header
    pub fn bits(self) -> u16 {
        self as u16 * 8
    }

    pub fn from_bytes(bytes: usize) -> Result<Self> {
        match bytes {
            1 => Ok(SampleWidth::One),
            2 => Ok(SampleWidth::Two),
            3 => Ok(SampleWidth::Three),
            4 => Ok(SampleWidth::Four),
            _ => Err(WavsealError::UnsupportedFormat {
                format: format!("{}-byte samples (only 1 to 4 supported)", bytes),
            }),
        }
    }

    pub fn from_bits(bits: u16) -> Result<Self> {
        if bits % 8 != 0 {
            return Err(WavsealError::UnsupportedFormat {
                format: format!("{}-bit samples (must be byte aligned)", bits),
            });
        }
        Self::from_bytes(bits as usize / 8)
    }
}

/// Format parameters that travel with a sample buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSpec {
    pub sample_width: SampleWidth,
    /// Number of interleaved channels
    pub channels: u16,
    /// Frames per second
    pub frame_rate: u32,
    /// Samples are IEEE floats rather than integers (32-bit only)
    pub is_float: bool,
}

impl PcmSpec {
    pub fn new(sample_width: SampleWidth, channels: u16, frame_rate: u32) -> Self {
        PcmSpec {
            sample_width,
            channels,
            frame_rate,
            is_float: false,
        }
    }

    /// 32-bit float PCM
    pub fn float(channels: u16, frame_rate: u32) -> Self {
        PcmSpec {
            sample_width: SampleWidth::Four,
            channels,
            frame_rate,
            is_float: true,
        }
    }

    /// CD quality: 16-bit stereo at 44.1kHz
    pub fn cd_quality() -> Self {
        PcmSpec::new(SampleWidth::Two, 2, 44100)
    }
}

// ============================================================================
// SampleBuffer
// ============================================================================

/// Interleaved PCM bytes plus their format
///
/// One "sample" is one channel value, so a stereo frame holds two samples.
/// The embedding scheme addresses samples, not frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    data: Vec<u8>,
    spec: PcmSpec,
    byte_order: ByteOrder,
}

impl SampleBuffer {
    /// Wrap raw PCM bytes
    ///
    /// # Errors
    /// * `InvalidBuffer` - if the byte length is not a multiple of the sample
    ///   width, or the channel count or frame rate is zero
    pub fn new(data: Vec<u8>, spec: PcmSpec, byte_order: ByteOrder) -> Result<Self> {
        let width = spec.sample_width.bytes();
        if data.len() % width != 0 {
            return Err(WavsealError::InvalidBuffer {
                reason: format!(
                    "byte length {} is not a multiple of sample width {}",
                    data.len(),
                    width
                ),
            });
        }
        if spec.channels == 0 {
            return Err(WavsealError::InvalidBuffer {
                reason: "channel count must be at least 1".to_string(),
            });
        }
        if spec.frame_rate == 0 {
            return Err(WavsealError::InvalidBuffer {
                reason: "frame rate must be positive".to_string(),
            });
        }
        if spec.is_float && spec.sample_width != SampleWidth::Four {
            return Err(WavsealError::InvalidBuffer {
                reason: "float samples must be 4 bytes wide".to_string(),
            });
        }

        Ok(SampleBuffer {
            data,
            spec,
            byte_order,
        })
    }

    /// A buffer of `num_samples` zero bytes
    pub fn zeroed(num_samples: usize, spec: PcmSpec, byte_order: ByteOrder) -> Result<Self> {
        Self::new(
            vec![0u8; num_samples * spec.sample_width.bytes()],
            spec,
            byte_order,
        )
    }

    pub fn spec(&self) -> PcmSpec {
        self.spec
    }

    pub fn sample_width(&self) -> SampleWidth {
        self.spec.sample_width
    }

    pub fn channels(&self) -> u16 {
        self.spec.channels
    }

    pub fn frame_rate(&self) -> u32 {
        self.spec.frame_rate
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Same bytes, different embedding policy
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Total number of samples across all channels
    pub fn num_samples(&self) -> usize {
        self.data.len() / self.spec.sample_width.bytes()
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.num_samples() / self.spec.channels as usize
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.spec.frame_rate as f64
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw PCM bytes; this is the message that gets signed
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw PCM bytes; the length cannot change
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
