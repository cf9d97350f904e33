//! Audio file I/O for Wavseal
//!
//! Reads WAV files into raw PCM bytes and writes them back unchanged. Unlike
//! a playback pipeline there is no resampling and no float conversion: the
//! bytes handed to the codec are exactly the bytes of the data chunk, and a
//! decode/encode round trip must be lossless or embedded signatures break.
//!
//! Multi-byte samples are laid out little-endian. 8-bit samples keep the
//! unsigned (offset 128) representation WAV uses on disk.

use std::io;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::engine::buffer::{ByteOrder, PcmSpec, SampleBuffer, SampleWidth};
use crate::error::{Result, WavsealError};

/// Decode a WAV file into a sample buffer
///
/// # Arguments
/// * `path` - Path to the WAV file
/// * `byte_order` - Embedding policy recorded on the returned buffer
///
/// # Errors
/// * `FileRead` - If the file does not exist or cannot be read
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the sample format has no lossless byte mapping
pub fn decode_audio(path: &Path, byte_order: ByteOrder) -> Result<SampleBuffer> {
    if !path.exists() {
        return Err(WavsealError::FileRead {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "file does not exist"),
        });
    }

    let mut reader = WavReader::open(path).map_err(|e| read_error(path, e))?;
    let wav_spec = reader.spec();
    let spec = pcm_spec_from_wav(&wav_spec)?;
    let width = spec.sample_width.bytes();

    let mut data = Vec::with_capacity(reader.len() as usize * width);

    match (wav_spec.sample_format, spec.sample_width) {
        (SampleFormat::Float, _) => {
            for sample in reader.samples::<f32>() {
                let sample = sample.map_err(|e| read_error(path, e))?;
                data.extend_from_slice(&sample.to_bits().to_le_bytes());
            }
        }
        (SampleFormat::Int, SampleWidth::One) => {
            for sample in reader.samples::<i8>() {
                let sample = sample.map_err(|e| read_error(path, e))?;
                data.push(signed_to_unsigned_8(sample));
            }
        }
        (SampleFormat::Int, SampleWidth::Two) => {
            for sample in reader.samples::<i16>() {
                let sample = sample.map_err(|e| read_error(path, e))?;
                data.extend_from_slice(&sample.to_le_bytes());
            }
        }
        (SampleFormat::Int, width) => {
            for sample in reader.samples::<i32>() {
                let sample = sample.map_err(|e| read_error(path, e))?;
                data.extend_from_slice(&sample.to_le_bytes()[..width.bytes()]);
            }
        }
    }

    debug!(
        "Decoded {}: {} samples, {}-bit, {} ch, {} Hz",
        path.display(),
        data.len() / width,
        spec.sample_width.bits(),
        spec.channels,
        spec.frame_rate
    );

    SampleBuffer::new(data, spec, byte_order)
}

/// Encode a sample buffer into a WAV file
///
/// The output has the same sample width, channel count and frame rate as
/// the buffer. Existing files are overwritten.
///
/// # Errors
/// * `FileWrite` - If the file cannot be created or written
/// * `InvalidAudio` - If the encoder rejects a sample
pub fn encode_audio(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    let spec = buffer.spec();
    let wav_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.frame_rate,
        bits_per_sample: spec.sample_width.bits(),
        sample_format: if spec.is_float {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, wav_spec).map_err(|e| write_error(path, e))?;
    let width = spec.sample_width.bytes();

    for chunk in buffer.as_bytes().chunks_exact(width) {
        if spec.is_float {
            let bits = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            writer
                .write_sample(f32::from_bits(bits))
                .map_err(|e| write_error(path, e))?;
            continue;
        }

        let written = match spec.sample_width {
            SampleWidth::One => writer.write_sample(unsigned_to_signed_8(chunk[0])),
            SampleWidth::Two => writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]])),
            _ => writer.write_sample(int_from_le_bytes(chunk)),
        };
        written.map_err(|e| write_error(path, e))?;
    }

    writer.finalize().map_err(|e| write_error(path, e))?;

    debug!(
        "Encoded {}: {} samples, {}-bit, {} ch, {} Hz",
        path.display(),
        buffer.num_samples(),
        spec.sample_width.bits(),
        spec.channels,
        spec.frame_rate
    );

    Ok(())
}

/// Generate an integer PCM sine tone, identical in every channel
///
/// Useful for exercising the codec on realistic, non-silent audio.
pub fn generate_test_tone(
    frequency: f32,
    duration_secs: f32,
    spec: PcmSpec,
    byte_order: ByteOrder,
) -> Result<SampleBuffer> {
    let num_frames = (duration_secs * spec.frame_rate as f32) as usize;
    let width = spec.sample_width.bytes();
    let mut data = Vec::with_capacity(num_frames * spec.channels as usize * width);

    let angular_freq = 2.0 * std::f32::consts::PI * frequency / spec.frame_rate as f32;

    for i in 0..num_frames {
        // Half scale so the tone never clips
        let value = 0.5 * (angular_freq * i as f32).sin();

        for _ in 0..spec.channels {
            if spec.is_float {
                data.extend_from_slice(&value.to_bits().to_le_bytes());
                continue;
            }
            match spec.sample_width {
                SampleWidth::One => {
                    data.push(signed_to_unsigned_8((value * 127.0) as i8));
                }
                SampleWidth::Two => {
                    data.extend_from_slice(&((value * 32767.0) as i16).to_le_bytes());
                }
                SampleWidth::Three => {
                    data.extend_from_slice(&((value * 8388607.0) as i32).to_le_bytes()[..3]);
                }
                SampleWidth::Four => {
                    data.extend_from_slice(&((value as f64 * 2147483647.0) as i32).to_le_bytes());
                }
            }
        }
    }

    SampleBuffer::new(data, spec, byte_order)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn pcm_spec_from_wav(wav_spec: &WavSpec) -> Result<PcmSpec> {
    let sample_width = SampleWidth::from_bits(wav_spec.bits_per_sample)?;

    match wav_spec.sample_format {
        SampleFormat::Float if sample_width != SampleWidth::Four => {
            Err(WavsealError::UnsupportedFormat {
                format: format!("{}-bit float audio", wav_spec.bits_per_sample),
            })
        }
        SampleFormat::Float => Ok(PcmSpec::float(wav_spec.channels, wav_spec.sample_rate)),
        SampleFormat::Int => Ok(PcmSpec::new(
            sample_width,
            wav_spec.channels,
            wav_spec.sample_rate,
        )),
    }
}

/// hound exposes 8-bit samples as signed; on disk they are offset by 128
#[inline]
fn signed_to_unsigned_8(sample: i8) -> u8 {
    (sample as u8) ^ 0x80
}

#[inline]
fn unsigned_to_signed_8(byte: u8) -> i8 {
    (byte ^ 0x80) as i8
}

/// Sign-extend a 3 or 4 byte little-endian integer
fn int_from_le_bytes(chunk: &[u8]) -> i32 {
    let mut bytes = [0u8; 4];
    bytes[..chunk.len()].copy_from_slice(chunk);
    if chunk.len() < 4 && chunk[chunk.len() - 1] & 0x80 != 0 {
        for byte in &mut bytes[chunk.len()..] {
            *byte = 0xFF;
        }
    }
    i32::from_le_bytes(bytes)
}

fn read_error(path: &Path, e: hound::Error) -> WavsealError {
    match e {
        hound::Error::IoError(source) => WavsealError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        hound::Error::Unsupported => WavsealError::UnsupportedFormat {
            format: format!("{} uses a WAV feature the decoder does not support", path.display()),
        },
        other => WavsealError::InvalidAudio {
            reason: format!("Failed to read WAV file {}: {}", path.display(), other),
            source: Some(other),
        },
    }
}

fn write_error(path: &Path, e: hound::Error) -> WavsealError {
    match e {
        hound::Error::IoError(source) => WavsealError::FileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => WavsealError::InvalidAudio {
            reason: format!("Failed to write WAV file {}: {}", path.display(), other),
            source: Some(other),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
