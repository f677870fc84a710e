//! Error and warning types for the bit accessor, the table codec and the image framer.

use std::fmt;

use thiserror::Error;

use crate::tables::TableKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Any of these aborts the pack/unpack/validate call that produced it.
#[derive(Debug, Error)]
pub enum Error {
    /// Bit range is inverted, wider than 64 bits, outside the buffer, or the
    /// buffer length is incompatible with the active layout mode.
    #[error("invalid field spec [{msb}:{lsb}] for a {len}-byte buffer")]
    InvalidFieldSpec { msb: usize, lsb: usize, len: usize },

    /// A table header names a block id that no table uses.
    #[error("unknown block id {0:#04x}")]
    UnknownBlockId(u8),

    /// Stored table header CRC does not match the computed one.
    #[error("table header CRC mismatch: computed {computed:#010x}, stored {stored:#010x}")]
    HeaderCrcMismatch { computed: u32, stored: u32 },

    /// Stored CRC of a table's entries does not match the computed one.
    #[error("{table} data CRC mismatch: computed {computed:#010x}, stored {stored:#010x}")]
    DataCrcMismatch {
        table: TableKind,
        computed: u32,
        stored: u32,
    },

    /// A table holds (or an image declares) more entries than the hardware allows.
    #[error("{table} holds more than {max} entries")]
    EntryCountExceeded { table: TableKind, max: usize },

    /// The first word of an image is not a known device identifier.
    #[error("unknown device id {0:#010x}")]
    InvalidDeviceId(u32),

    /// A cross-table rule is violated; the configuration must not be uploaded.
    #[error("invalid static configuration: {0}")]
    ConfigValidationFailure(#[from] ValidationError),

    /// The image ends before a header, table or CRC it announces.
    #[error("image truncated at offset {offset}: {needed} more bytes needed")]
    UnexpectedEnd { offset: usize, needed: usize },

    /// Chunk size must be a non-zero multiple of the 4-byte word.
    #[error("invalid chunk size {0}: must be a non-zero multiple of 4")]
    InvalidChunkSize(usize),

    /// A buffer starting at `address` would run past the last 32-bit word address.
    #[error("{words} words starting at word address {address:#x} overflow the address space")]
    AddressOverflow { address: u32, words: usize },

    #[error("{table} has no field named {name:?}")]
    UnknownField { table: TableKind, name: String },

    #[error("{table} has no entry {index} (holds {len})")]
    EntryIndexOutOfRange {
        table: TableKind,
        index: usize,
        len: usize,
    },

    /// Reading or writing the staging area failed.
    #[error("staging area I/O failed")]
    Io(#[from] std::io::Error),
}

/// Sub-reason of [`Error::ConfigValidationFailure`]: which cross-table rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("time-triggered schedule is not supported by this device")]
    TtEthernetNotSupported,
    #[error("schedule requires entry points and exactly one schedule/entry-point parameter entry")]
    IncorrectTtEthernetConfiguration,
    #[error("critical virtual links require the VL policing and forwarding tables")]
    IncorrectVirtualLinkConfiguration,
    #[error("VL lookup entries only support format 0, general parameters select {0}")]
    UnsupportedVlLookupFormat(u64),
    #[error("L2 policing table is empty")]
    MissingL2PolicingTable,
    #[error("VLAN lookup table is empty")]
    MissingVlanTable,
    #[error("L2 forwarding table must hold exactly {0} entries")]
    MissingL2ForwardingTable(usize),
    #[error("MAC configuration table must hold exactly {0} entries")]
    MissingMacTable(usize),
    #[error("L2 forwarding parameters table must hold exactly one entry")]
    MissingL2ForwardingParamsTable,
    #[error("general parameters table must hold exactly one entry")]
    MissingGeneralParamsTable,
    #[error("xMII parameters table must hold exactly one entry")]
    MissingXmiiTable,
    #[error("partition spaces use {used} frame memory blocks, budget is {budget}")]
    OvercommittedFrameMemory { used: u64, budget: u64 },
}

/// Non-fatal conditions. They are logged and, where a report exists, handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A value was masked to the width of its field while packing.
    ValueTruncated { value: u64, msb: usize, lsb: usize },
    /// The entries decoded from a table did not add up to its declared length;
    /// the read cursor was moved to the declared boundary.
    TableLengthMismatch {
        table: TableKind,
        declared: usize,
        consumed: usize,
    },
    /// VL lookup entries were decoded with the format 0 layout although the
    /// general parameters select another format.
    UnsupportedVlLookupFormat { format: u64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ValueTruncated { value, msb, lsb } => write!(
                f,
                "value {value:#x} does not fit in [{msb}:{lsb}], truncating"
            ),
            Warning::TableLengthMismatch {
                table,
                declared,
                consumed,
            } => write!(
                f,
                "{table}: unpacked {consumed} bytes, header declares {declared}"
            ),
            Warning::UnsupportedVlLookupFormat { format } => write!(
                f,
                "VL lookup entries decoded as format 0, general parameters select {format}"
            ),
        }
    }
}
