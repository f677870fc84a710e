//! Ethernet CRC-32 over a buffer of 32-bit words, read through the active layout mode.

use crate::{
    bits::{self, reverse_bits_n},
    errors::Result,
    layout::LayoutMode,
};

const POLY: u32 = 0x04C1_1DB7;

fn crc32_add(mut crc: u32, byte: u8) -> u32 {
    crc ^= reverse_bits_n(byte as u64, 32) as u32;

    for _ in 0..8 {
        if crc & (1 << 31) != 0 {
            crc = (crc << 1) ^ POLY;
        } else {
            crc <<= 1;
        }
    }

    crc
}

/// CRC-32 of `buf`, processed one 32-bit word at a time, low byte of each word first.
///
/// Every word is read as `[31:0]` of its own 4-byte window under `layout`, so
/// the result depends on the mode. A trailing partial word is zero-padded.
pub fn crc32(buf: &[u8], layout: LayoutMode) -> Result<u32> {
    let mut crc = u32::MAX;

    for chunk in buf.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);

        let value = bits::unpack(&word, 31, 0, layout)?;
        for byte in 0..4 {
            crc = crc32_add(crc, (value >> (8 * byte)) as u8);
        }
    }

    Ok(reverse_bits_n(!crc as u64, 32) as u32)
}
