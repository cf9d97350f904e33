//! LSB message codec
//!
//! A message byte occupies 8 consecutive samples, most significant bit
//! first, starting at sample 0. After the last byte, 8 more samples are
//! cleared as a zero terminator so the message can be decoded without
//! knowing its length.
//!
//! Terminator-delimited decoding stops at the first all-zero byte. A message
//! that itself contains a zero byte comes back truncated at that byte; pass
//! an explicit length when the payload is binary.

use log::debug;

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, WavsealError};
use crate::stego::bit_channel;

/// Samples consumed per payload byte
pub const SAMPLES_PER_BYTE: usize = 8;

/// Samples needed to embed `message_len` bytes plus the terminator
pub fn required_samples(message_len: usize) -> usize {
    if message_len == 0 {
        0
    } else {
        (message_len + 1) * SAMPLES_PER_BYTE
    }
}

/// Longest message that fits in `buffer` together with its terminator
pub fn capacity(buffer: &SampleBuffer) -> usize {
    (buffer.num_samples() / SAMPLES_PER_BYTE).saturating_sub(1)
}

/// Embed `message` into the LSB plane of `buffer`
///
/// # Errors
/// * `OutOfCapacity` - if the buffer holds fewer than `(len + 1) * 8`
///   samples; the buffer is left untouched
pub fn encode(buffer: &mut SampleBuffer, message: &[u8]) -> Result<()> {
    let required = required_samples(message.len());
    let available = buffer.num_samples();
    if required > available {
        return Err(WavsealError::OutOfCapacity {
            required_samples: required,
            available_samples: available,
        });
    }

    let width = buffer.sample_width();
    let order = buffer.byte_order();
    let data = buffer.as_bytes_mut();

    for (i, &byte) in message.iter().enumerate() {
        for j in 0..8 {
            let index = bit_channel::locate(i * SAMPLES_PER_BYTE + j, width, order);
            let bit = byte & (1 << (7 - j)) != 0;
            data[index] = bit_channel::write_bit(data[index], bit);
        }
    }

    if !message.is_empty() {
        let start = message.len() * SAMPLES_PER_BYTE;
        for sample in start..start + SAMPLES_PER_BYTE {
            let index = bit_channel::locate(sample, width, order);
            data[index] = bit_channel::clear_bit(data[index]);
        }
    }

    debug!(
        "Embedded {} bytes across {} samples ({} byte order)",
        message.len(),
        required,
        order
    );

    Ok(())
}

/// Extract a message from the LSB plane of `buffer`
///
/// With `Some(length)` exactly `length` bytes are read. With `None`, bytes
/// are read until an all-zero byte (not included) or until the buffer has
/// fewer than 8 samples left.
///
/// # Errors
/// * `OutOfCapacity` - if `length` bytes would run past the end of the buffer
pub fn decode(buffer: &SampleBuffer, length: Option<usize>) -> Result<Vec<u8>> {
    let available_bytes = buffer.num_samples() / SAMPLES_PER_BYTE;

    if let Some(length) = length {
        if length > available_bytes {
            return Err(WavsealError::OutOfCapacity {
                required_samples: length * SAMPLES_PER_BYTE,
                available_samples: buffer.num_samples(),
            });
        }
    }

    let limit = length.unwrap_or(available_bytes);
    let mut message = Vec::with_capacity(limit);

    for i in 0..limit {
        let byte = read_byte(buffer, i);
        if length.is_none() && byte == 0 {
            break;
        }
        message.push(byte);
    }

    Ok(message)
}

/// Reassemble payload byte `index` from its 8 samples
fn read_byte(buffer: &SampleBuffer, index: usize) -> u8 {
    let width = buffer.sample_width();
    let order = buffer.byte_order();
    let data = buffer.as_bytes();

    (0..SAMPLES_PER_BYTE).fold(0u8, |acc, j| {
        let sample_byte = data[bit_channel::locate(index * SAMPLES_PER_BYTE + j, width, order)];
        (acc << 1) | bit_channel::read_bit(sample_byte) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::{ByteOrder, PcmSpec, SampleWidth};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn buffer(num_samples: usize, width: SampleWidth, order: ByteOrder) -> SampleBuffer {
        SampleBuffer::zeroed(num_samples, PcmSpec::new(width, 1, 44100), order).unwrap()
    }

    /// Buffer whose bytes are all set, so cleared bits are visible
    fn noisy_buffer(num_samples: usize, width: SampleWidth, order: ByteOrder) -> SampleBuffer {
        let data = vec![0xFFu8; num_samples * width.bytes()];
        SampleBuffer::new(data, PcmSpec::new(width, 1, 44100), order).unwrap()
    }

    #[test]
    fn test_concrete_scenario_16bit_little_endian() {
        let mut buf = buffer(600, SampleWidth::Two, ByteOrder::Little);
        let message = [0xABu8; 64];

        encode(&mut buf, &message).unwrap();

        // 0xAB = 1010_1011, MSB first
        let data = buf.as_bytes();
        assert_eq!(data[0] & 1, 1);
        assert_eq!(data[2] & 1, 0);
        assert_eq!(data[4] & 1, 1);
        assert_eq!(data[1], 0, "high byte of a sample must not change");

        assert_eq!(decode(&buf, Some(64)).unwrap(), message.to_vec());
    }

    #[test_case(SampleWidth::One, ByteOrder::Little)]
    #[test_case(SampleWidth::Two, ByteOrder::Little)]
    #[test_case(SampleWidth::Two, ByteOrder::Big)]
    #[test_case(SampleWidth::Three, ByteOrder::Big)]
    #[test_case(SampleWidth::Four, ByteOrder::Little)]
    fn test_round_trip_with_length(width: SampleWidth, order: ByteOrder) {
        let message: Vec<u8> = (0..=255u8).collect();
        let mut buf = noisy_buffer(required_samples(message.len()), width, order);

        encode(&mut buf, &message).unwrap();

        assert_eq!(decode(&buf, Some(message.len())).unwrap(), message);
    }

    #[test]
    fn test_round_trip_terminated() {
        let message = b"a very secret message";
        let mut buf = noisy_buffer(4096, SampleWidth::Two, ByteOrder::Little);

        encode(&mut buf, message).unwrap();

        assert_eq!(decode(&buf, None).unwrap(), message.to_vec());
    }

    #[test]
    fn test_terminated_decode_truncates_at_zero_byte() {
        let message = [0x41, 0x42, 0x00, 0x43];
        let mut buf = noisy_buffer(64, SampleWidth::One, ByteOrder::Little);

        encode(&mut buf, &message).unwrap();

        assert_eq!(decode(&buf, None).unwrap(), vec![0x41, 0x42]);
        assert_eq!(decode(&buf, Some(4)).unwrap(), message.to_vec());
    }

    #[test]
    fn test_terminated_decode_stops_at_buffer_end() {
        // No zero byte anywhere: decoding runs to the last whole byte
        let buf = noisy_buffer(20, SampleWidth::One, ByteOrder::Little);
        assert_eq!(decode(&buf, None).unwrap(), vec![0xFF, 0xFF]);
    }

    #[test]
    fn test_terminator_clears_following_samples() {
        let mut buf = noisy_buffer(40, SampleWidth::Two, ByteOrder::Big);
        encode(&mut buf, &[0xFF]).unwrap();

        let data = buf.as_bytes();
        for sample in 8..16 {
            assert_eq!(data[sample * 2 + 1] & 1, 0, "terminator sample {}", sample);
            assert_eq!(data[sample * 2], 0xFF, "little byte must be untouched");
        }
        // Past the terminator nothing changes
        assert_eq!(data[16 * 2 + 1], 0xFF);
    }

    #[test]
    fn test_big_endian_touches_last_byte() {
        let mut buf = buffer(16, SampleWidth::Three, ByteOrder::Big);
        encode(&mut buf, &[0x80]).unwrap();

        let data = buf.as_bytes();
        assert_eq!(&data[0..3], &[0x00, 0x00, 0x01]);
        assert!(data[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_capacity_boundary() {
        let message = [0x5Au8; 64];

        let mut short = buffer((64 + 1) * 8 - 1, SampleWidth::Two, ByteOrder::Little);
        let before = short.clone();
        match encode(&mut short, &message) {
            Err(WavsealError::OutOfCapacity {
                required_samples,
                available_samples,
            }) => {
                assert_eq!(required_samples, 520);
                assert_eq!(available_samples, 519);
            }
            other => panic!("Expected OutOfCapacity, got: {:?}", other),
        }
        assert_eq!(short, before, "failed encode must not mutate the buffer");

        let mut exact = buffer((64 + 1) * 8, SampleWidth::Two, ByteOrder::Little);
        encode(&mut exact, &message).unwrap();
        assert_eq!(decode(&exact, Some(64)).unwrap(), message.to_vec());
    }

    #[test]
    fn test_decode_length_past_end() {
        let buf = buffer(63, SampleWidth::One, ByteOrder::Little);
        assert!(matches!(
            decode(&buf, Some(8)),
            Err(WavsealError::OutOfCapacity { .. })
        ));
        assert_eq!(decode(&buf, Some(7)).unwrap().len(), 7);
    }

    #[test]
    fn test_empty_message_writes_nothing() {
        let mut buf = noisy_buffer(8, SampleWidth::One, ByteOrder::Little);
        encode(&mut buf, &[]).unwrap();
        assert!(buf.as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(&buffer(0, SampleWidth::Two, ByteOrder::Little)), 0);
        assert_eq!(capacity(&buffer(15, SampleWidth::Two, ByteOrder::Little)), 0);
        assert_eq!(capacity(&buffer(16, SampleWidth::Two, ByteOrder::Little)), 1);
        assert_eq!(capacity(&buffer(520, SampleWidth::Two, ByteOrder::Little)), 64);
    }
}
