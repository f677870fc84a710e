//! Read and write an arbitrary inclusive bit range `[msb:lsb]` of a byte buffer.
//!
//! Bits are numbered from the end of the logical buffer: bit 0 is the least
//! significant bit of the last byte, bit `8 * len - 1` the most significant bit
//! of the first byte. The active [`LayoutMode`] then decides where each logical
//! byte physically lives and in which order its bits are stored.

use tracing::warn;

use crate::{
    errors::{Error, Result, Warning},
    layout::LayoutMode,
};

/// Which way [`access`] moves bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Value to buffer.
    Pack,
    /// Buffer to value.
    Unpack,
}

/// The part of a field that falls inside one physical byte.
#[derive(Debug, Clone, Copy)]
struct Span {
    /// Physical byte address after the layout transforms.
    addr: usize,
    /// Lowest physical bit of the span inside the byte.
    shift: usize,
    width: usize,
    /// Where the span's lowest logical bit lands in the value.
    value_shift: usize,
    mirrored: bool,
}

/// Fails with [`Error::InvalidFieldSpec`] unless `[msb:lsb]` can be accessed in a
/// `len`-byte buffer under `layout`.
pub fn check_range(msb: usize, lsb: usize, len: usize, layout: LayoutMode) -> Result<()> {
    let invalid = Error::InvalidFieldSpec { msb, lsb, len };

    if msb < lsb || msb - lsb + 1 > 64 || msb >= len * 8 {
        return Err(invalid);
    }

    if layout.is_word_based() && len % 4 != 0 {
        return Err(invalid);
    }

    Ok(())
}

/// Splits `[msb:lsb]` into per-byte spans, walking from the byte holding `msb`
/// down to the byte holding `lsb`. Shared by both directions.
fn walk(
    msb: usize,
    lsb: usize,
    len: usize,
    layout: LayoutMode,
) -> Result<impl Iterator<Item = Span>> {
    check_range(msb, lsb, len, layout)?;

    let first = msb / 8;
    let last = lsb / 8;

    Ok((last..=first).rev().map(move |byte| {
        let start = if byte == first { msb % 8 } else { 7 };
        let end = if byte == last { lsb % 8 } else { 0 };

        Span {
            addr: layout.physical_address(len - byte - 1, len),
            shift: if layout.msb_on_the_right { 7 - start } else { end },
            width: start - end + 1,
            value_shift: byte * 8 + end - lsb,
            mirrored: layout.msb_on_the_right,
        }
    }))
}

/// Mask covering the low `width` bits.
pub fn low_mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Reverses the low `n` bits of `x` (LSB becomes MSB of the result).
pub fn reverse_bits_n(mut x: u64, n: usize) -> u64 {
    let mut r = 0u64;
    for _ in 0..n {
        r = (r << 1) | (x & 1);
        x >>= 1;
    }

    r
}

/// Reads `[msb:lsb]` of `buf` as an unsigned value.
pub fn unpack(buf: &[u8], msb: usize, lsb: usize, layout: LayoutMode) -> Result<u64> {
    let mut value = 0u64;

    for span in walk(msb, lsb, buf.len(), layout)? {
        let mut part = (buf[span.addr] as u64 >> span.shift) & low_mask(span.width);
        if span.mirrored {
            part = reverse_bits_n(part, span.width);
        }

        value |= part << span.value_shift;
    }

    Ok(value)
}

/// Writes `value` into `[msb:lsb]` of `buf`, leaving every other bit untouched.
///
/// A value wider than the field is masked to the field width and a
/// [`Warning::ValueTruncated`] is logged; this is not an error.
pub fn pack(buf: &mut [u8], value: u64, msb: usize, lsb: usize, layout: LayoutMode) -> Result<()> {
    let spans = walk(msb, lsb, buf.len(), layout)?;

    let width = msb - lsb + 1;
    let mut value = value;
    if value & !low_mask(width) != 0 {
        warn!("{}", Warning::ValueTruncated { value, msb, lsb });
        value &= low_mask(width);
    }

    for span in spans {
        let mut part = (value >> span.value_shift) & low_mask(span.width);
        if span.mirrored {
            part = reverse_bits_n(part, span.width);
        }

        let byte_mask = (low_mask(span.width) << span.shift) as u8;
        buf[span.addr] = (buf[span.addr] & !byte_mask) | ((part << span.shift) as u8);
    }

    Ok(())
}

/// Direction-tagged form of [`pack`] / [`unpack`]: on `Pack` writes `*value`
/// into the buffer, on `Unpack` overwrites `*value` with the buffer content.
pub fn access(
    buf: &mut [u8],
    value: &mut u64,
    msb: usize,
    lsb: usize,
    direction: Direction,
    layout: LayoutMode,
) -> Result<()> {
    match direction {
        Direction::Pack => pack(buf, *value, msb, lsb, layout),
        Direction::Unpack => {
            *value = unpack(buf, msb, lsb, layout)?;
            Ok(())
        }
    }
}
