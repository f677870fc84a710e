//! The 4-byte header in front of every link message.
//!
//! ```text
//!  31   30    25 24                    4 3  0
//! +---+---------+-----------------------+----+
//! | W | rd_cnt  |  word address         | 0  |
//! +---+---------+-----------------------+----+
//! ```

use sja1105_config::{LayoutMode, bits};

use crate::errors::{Error, Result};

/// Largest payload of one message, in 32-bit words.
pub const MAX_PAYLOAD_WORDS: usize = 64;
/// Highest word address the header can carry.
pub const MAX_ADDRESS: u32 = (1 << 21) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub access: Access,
    /// Words to read. Ignored for writes, whose length is the payload's.
    pub read_count: usize,
    /// Target address in 32-bit words.
    pub address: u32,
}

impl MessageHeader {
    pub const SIZE: usize = 4;

    pub fn write(address: u32) -> Self {
        Self {
            access: Access::Write,
            read_count: 0,
            address,
        }
    }

    pub fn read(address: u32, words: usize) -> Self {
        Self {
            access: Access::Read,
            read_count: words,
            address,
        }
    }

    /// A read count of [`MAX_PAYLOAD_WORDS`] is sent as 0, the only way the
    /// 6-bit field can express it.
    pub fn pack(&self) -> Result<[u8; Self::SIZE]> {
        if self.address > MAX_ADDRESS {
            return Err(Error::AddressOutOfRange(self.address));
        }

        let mut buf = [0u8; Self::SIZE];
        let layout = LayoutMode::BIG_ENDIAN;

        match self.access {
            Access::Write => bits::pack(&mut buf, 1, 31, 31, layout)?,
            Access::Read => {
                if self.read_count == 0 || self.read_count > MAX_PAYLOAD_WORDS {
                    return Err(Error::InvalidReadCount(self.read_count));
                }
                let count = (self.read_count % MAX_PAYLOAD_WORDS) as u64;
                bits::pack(&mut buf, count, 30, 25, layout)?;
            }
        }
        bits::pack(&mut buf, self.address as u64, 24, 4, layout)?;

        Ok(buf)
    }

    pub fn unpack(buf: &[u8; Self::SIZE]) -> Result<Self> {
        let layout = LayoutMode::BIG_ENDIAN;

        let access = match bits::unpack(buf, 31, 31, layout)? {
            0 => Access::Read,
            _ => Access::Write,
        };
        let read_count = match (access, bits::unpack(buf, 30, 25, layout)? as usize) {
            (Access::Write, _) => 0,
            (Access::Read, 0) => MAX_PAYLOAD_WORDS,
            (Access::Read, count) => count,
        };

        Ok(Self {
            access,
            read_count,
            address: bits::unpack(buf, 24, 4, layout)? as u32,
        })
    }
}
