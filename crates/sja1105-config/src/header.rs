//! The 12-byte header preceding every table of an image.

use crate::{
    bits,
    crc::crc32,
    errors::{Error, Result},
    layout::LayoutMode,
};

/// Block id and length of one table, followed by a CRC over those 8 bytes.
///
/// A header with `len_words == 0` terminates the image; its CRC field holds a
/// placeholder rather than a real checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    pub block_id: u8,
    /// Length of the table's entries in 32-bit words.
    pub len_words: u32,
    pub crc: u32,
}

impl TableHeader {
    /// Packed size in bytes.
    pub const SIZE: usize = 12;
    /// Bytes covered by the header CRC.
    const COVERED: usize = 8;

    pub fn new(block_id: u8, len_words: u32) -> Self {
        Self {
            block_id,
            len_words,
            crc: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.len_words == 0
    }

    /// Writes all three fields as they are into the first [Self::SIZE] bytes of `buf`.
    pub fn pack(&self, buf: &mut [u8], layout: LayoutMode) -> Result<()> {
        let header = header_mut(buf)?;
        header.fill(0);

        let (covered, crc) = header.split_at_mut(Self::COVERED);
        bits::pack(covered, self.block_id as u64, 31, 24, layout)?;
        bits::pack(covered, self.len_words as u64, 55, 32, layout)?;
        bits::pack(crc, self.crc as u64, 31, 0, layout)
    }

    /// Like [Self::pack], but first replaces `self.crc` with the CRC of the
    /// freshly written block id and length.
    pub fn pack_with_crc(&mut self, buf: &mut [u8], layout: LayoutMode) -> Result<()> {
        self.pack(buf, layout)?;
        self.crc = Self::compute_crc(buf, layout)?;
        self.pack(buf, layout)
    }

    /// Reads a header from the first [Self::SIZE] bytes of `buf`. The CRC is
    /// returned as stored, not checked.
    pub fn unpack(buf: &[u8], layout: LayoutMode) -> Result<Self> {
        let header = header(buf)?;
        let (covered, crc) = header.split_at(Self::COVERED);

        Ok(Self {
            block_id: bits::unpack(covered, 31, 24, layout)? as u8,
            len_words: bits::unpack(covered, 55, 32, layout)? as u32,
            crc: bits::unpack(crc, 31, 0, layout)? as u32,
        })
    }

    /// CRC of the block id and length bytes of a packed header.
    pub fn compute_crc(buf: &[u8], layout: LayoutMode) -> Result<u32> {
        crc32(&header(buf)?[..Self::COVERED], layout)
    }
}

fn header(buf: &[u8]) -> Result<&[u8]> {
    buf.get(..TableHeader::SIZE).ok_or(Error::UnexpectedEnd {
        offset: buf.len(),
        needed: TableHeader::SIZE - buf.len(),
    })
}

fn header_mut(buf: &mut [u8]) -> Result<&mut [u8]> {
    let available = buf.len();
    buf.get_mut(..TableHeader::SIZE).ok_or(Error::UnexpectedEnd {
        offset: available,
        needed: TableHeader::SIZE - available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_byte_positions() {
        let mut buf = [0u8; 12];
        TableHeader {
            block_id: 0x06,
            len_words: 0x0A_0B0C,
            crc: 0x1122_3344,
        }
        .pack(&mut buf, LayoutMode::SJA1105)
        .unwrap();

        assert_eq!(
            buf,
            [0x06, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x0B, 0x0C, 0x11, 0x22, 0x33, 0x44]
        );
    }

    #[test]
    fn test_crc_covers_first_eight_bytes() {
        let mut header = TableHeader::new(0x09, 35);
        let mut buf = [0u8; 12];
        header.pack_with_crc(&mut buf, LayoutMode::SJA1105).unwrap();

        assert_eq!(header.crc, crc32(&buf[..8], LayoutMode::SJA1105).unwrap());
        assert_eq!(TableHeader::unpack(&buf, LayoutMode::SJA1105).unwrap(), header);
    }

    #[test]
    fn test_terminal_header() {
        let mut buf = [0u8; 12];
        let terminal = TableHeader {
            block_id: 0,
            len_words: 0,
            crc: 0xDEAD_BEEF,
        };
        terminal.pack(&mut buf, LayoutMode::SJA1105).unwrap();

        let read = TableHeader::unpack(&buf, LayoutMode::SJA1105).unwrap();
        assert!(read.is_terminal());
        assert_eq!(read.crc, 0xDEAD_BEEF);
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            TableHeader::unpack(&[0u8; 7], LayoutMode::SJA1105),
            Err(Error::UnexpectedEnd {
                offset: 7,
                needed: 5
            })
        ));
    }
}
