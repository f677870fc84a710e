//! Splits a packed image into word-addressed pieces that fit one link message.

use crate::errors::{Error, Result};

/// One contiguous piece of an image and the word address it goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Address in 32-bit words.
    pub address: u32,
    pub data: &'a [u8],
}

/// Iterator over the chunks of a buffer, in order. Built by [chunks].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a [u8],
    address: u32,
    max: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (data, rest) = self.rest.split_at(self.max.min(self.rest.len()));
        let chunk = Chunk {
            address: self.address,
            data,
        };

        self.rest = rest;
        // Only the step past the final chunk can leave the u32 range.
        self.address = self.address.wrapping_add((data.len() / 4) as u32);
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.len().div_ceil(self.max);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

/// Chunks of at most `max` bytes covering `buf`, the first one at `address`.
///
/// `max` must be a non-zero multiple of 4 so every chunk but the last starts
/// on a word boundary, and every word of `buf` must have an address below
/// 2^32. An empty buffer yields no chunks.
pub fn chunks(buf: &[u8], address: u32, max: usize) -> Result<Chunks<'_>> {
    if max == 0 || max % 4 != 0 {
        return Err(Error::InvalidChunkSize(max));
    }

    let words = buf.len().div_ceil(4);
    if words > 0 && address as u64 + words as u64 - 1 > u32::MAX as u64 {
        return Err(Error::AddressOverflow { address, words });
    }

    Ok(Chunks {
        rest: buf,
        address,
        max,
    })
}

/// Collected form of [chunks].
pub fn split(buf: &[u8], address: u32, max: usize) -> Result<Vec<Chunk<'_>>> {
    Ok(chunks(buf, address, max)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_addresses() {
        let buf: Vec<u8> = (0..20).collect();
        let parts = split(&buf, 0x20000, 8).unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].address, 0x20000);
        assert_eq!(parts[1].address, 0x20002);
        assert_eq!(parts[2].address, 0x20004);
        assert_eq!(parts[2].data, &[16, 17, 18, 19]);
    }

    #[test]
    fn test_exact_multiple() {
        let buf = [0u8; 16];
        let parts = split(&buf, 0, 8).unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|chunk| chunk.data.len() == 8));
    }

    #[test]
    fn test_smaller_than_one_chunk() {
        let buf = [1u8; 6];
        let parts = split(&buf, 0x10, 256).unwrap();
        assert_eq!(
            parts,
            vec![Chunk {
                address: 0x10,
                data: &buf[..],
            }]
        );
    }

    #[test]
    fn test_empty_buffer() {
        assert!(split(&[], 0, 4).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_size() {
        for max in [0, 3, 6, 257] {
            assert!(matches!(
                chunks(&[0u8; 8], 0, max),
                Err(Error::InvalidChunkSize(m)) if m == max
            ));
        }
    }

    #[test]
    fn test_region_ending_at_last_address() {
        let parts = split(&[0u8; 4], u32::MAX, 4).unwrap();
        assert_eq!(
            parts,
            vec![Chunk {
                address: u32::MAX,
                data: &[0u8; 4][..],
            }]
        );

        let buf = [0u8; 16];
        let parts = split(&buf, u32::MAX - 3, 8).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].address, u32::MAX - 3);
        assert_eq!(parts[1].address, u32::MAX - 1);

        let parts = split(&[0u8; 5], u32::MAX - 1, 4).unwrap();
        assert_eq!(parts[1].address, u32::MAX);
    }

    #[test]
    fn test_region_past_last_address() {
        assert!(matches!(
            split(&[0u8; 8], u32::MAX, 4),
            Err(Error::AddressOverflow {
                address: u32::MAX,
                words: 2
            })
        ));
        assert!(matches!(
            chunks(&[0u8; 9], u32::MAX - 1, 256),
            Err(Error::AddressOverflow { words: 3, .. })
        ));
    }

    #[test]
    fn test_len_is_exact() {
        let buf = [0u8; 43];
        let iter = chunks(&buf, 0, 4).unwrap();
        assert_eq!(iter.len(), 11);
        assert_eq!(iter.count(), 11);
    }
}
