//! Boundary to the physical command link.

use std::io;

/// A full-duplex, byte-exact transfer: `tx` is clocked out while `rx` of the
/// same length is clocked in.
///
/// Implementations wrap whatever carries the bytes (an SPI device node, a
/// USB bridge, a simulator). They must not split or reorder a transfer.
pub trait Link {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> io::Result<()>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::io;

    use super::Link;
    use crate::message::{Access, MessageHeader};

    /// Word-addressed memory behind a link that can be told to fail.
    pub struct MockLink {
        pub memory: Vec<u8>,
        /// Number of upcoming transfers to fail.
        pub fail_next: usize,
        pub transfers: Vec<MessageHeader>,
    }

    impl MockLink {
        pub fn new(words: usize) -> Self {
            Self {
                memory: vec![0; words * 4],
                fail_next: 0,
                transfers: Vec::new(),
            }
        }

        pub fn with_word(mut self, address: u32, value: u32) -> Self {
            let at = address as usize * 4;
            self.memory[at..at + 4].copy_from_slice(&value.to_be_bytes());
            self
        }
    }

    impl Link for MockLink {
        fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> io::Result<()> {
            assert_eq!(tx.len(), rx.len());

            if self.fail_next > 0 {
                self.fail_next -= 1;
                return Err(io::Error::new(io::ErrorKind::TimedOut, "no response"));
            }

            let mut raw = [0u8; MessageHeader::SIZE];
            raw.copy_from_slice(&tx[..MessageHeader::SIZE]);
            let header = MessageHeader::unpack(&raw)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            self.transfers.push(header);

            let at = header.address as usize * 4;
            let payload = &tx[MessageHeader::SIZE..];
            match header.access {
                Access::Write => self.memory[at..at + payload.len()].copy_from_slice(payload),
                Access::Read => {
                    let len = header.read_count * 4;
                    rx[MessageHeader::SIZE..MessageHeader::SIZE + len]
                        .copy_from_slice(&self.memory[at..at + len]);
                }
            }

            Ok(())
        }
    }
}
