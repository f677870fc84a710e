//! Error type of the upload sequence.

use std::io;

use sja1105_config::DeviceId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Packing, validating or chunking the configuration failed.
    #[error(transparent)]
    Config(#[from] sja1105_config::Error),

    /// A single link transfer failed. Chunk writes retry these before giving up.
    #[error("link transfer failed")]
    Link(#[from] io::Error),

    #[error("address {0:#x} does not fit in the 21-bit message address")]
    AddressOutOfRange(u32),

    #[error("cannot read {0} words in one message, expected 1..=64")]
    InvalidReadCount(usize),

    /// Every attempt to transfer one chunk failed.
    #[error("chunk at word address {address:#x} failed after {attempts} attempts")]
    ChunkFailed {
        address: u32,
        attempts: usize,
        #[source]
        source: io::Error,
    },

    /// The device answered with an id of another family than the configuration's.
    #[error("device reports id {found:#010x}, configuration is for {expected}")]
    DeviceMismatch { expected: DeviceId, found: u32 },
}
