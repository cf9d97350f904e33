//! Single-bit access to the LSB plane of a sample buffer
//!
//! Embeddable bit `i` lives in sample `i`. Within that sample only one byte
//! is touched: the first byte under [`ByteOrder::Little`], the last under
//! [`ByteOrder::Big`].

use crate::engine::buffer::{ByteOrder, SampleWidth};

const LSB_MASK: u8 = 0b0000_0001;

/// Byte index holding embeddable bit `bit_index`
#[inline]
pub fn locate(bit_index: usize, sample_width: SampleWidth, byte_order: ByteOrder) -> usize {
    let width = sample_width.bytes();
    let base = bit_index * width;

    if byte_order.is_big_endian() {
        base + width - 1
    } else {
        base
    }
}

#[inline]
pub fn set_bit(byte: u8) -> u8 {
    byte | LSB_MASK
}

#[inline]
pub fn clear_bit(byte: u8) -> u8 {
    byte & !LSB_MASK
}

#[inline]
pub fn read_bit(byte: u8) -> bool {
    byte & LSB_MASK == LSB_MASK
}

#[inline]
pub fn write_bit(byte: u8, bit: bool) -> u8 {
    if bit {
        set_bit(byte)
    } else {
        clear_bit(byte)
    }
}
