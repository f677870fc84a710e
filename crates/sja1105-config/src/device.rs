//! Device identifiers and the two hardware families they select.

use std::fmt;

use crate::errors::Error;

/// Silicon generation. Selects entry sizes and field layouts of the tables that differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// SJA1105E and SJA1105T.
    Et,
    /// SJA1105P, SJA1105Q, SJA1105R and SJA1105S.
    Pqrs,
}

/// The 32-bit identifier at the start of every static configuration image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceId {
    Sja1105E,
    Sja1105T,
    /// P and R share one identifier; they differ only in part number.
    Sja1105PR,
    /// Q and S share one identifier.
    Sja1105QS,
}

impl DeviceId {
    pub const ALL: [DeviceId; 4] = [
        DeviceId::Sja1105E,
        DeviceId::Sja1105T,
        DeviceId::Sja1105PR,
        DeviceId::Sja1105QS,
    ];

    pub const fn value(self) -> u32 {
        match self {
            DeviceId::Sja1105E => 0x9C00_000C,
            DeviceId::Sja1105T => 0x9E00_030E,
            DeviceId::Sja1105PR => 0xAF00_030E,
            DeviceId::Sja1105QS => 0xAE00_030E,
        }
    }

    pub const fn family(self) -> Family {
        match self {
            DeviceId::Sja1105E | DeviceId::Sja1105T => Family::Et,
            DeviceId::Sja1105PR | DeviceId::Sja1105QS => Family::Pqrs,
        }
    }

    /// Whether the part implements the time-triggered schedule tables.
    pub const fn supports_schedule(self) -> bool {
        matches!(self, DeviceId::Sja1105T | DeviceId::Sja1105QS)
    }

    /// Frame memory blocks shared by all partitions. Retagging reserves part of it.
    pub const fn frame_memory_budget(self, retagging: bool) -> u64 {
        if retagging { 910 } else { 929 }
    }
}

impl TryFrom<u32> for DeviceId {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        DeviceId::ALL
            .into_iter()
            .find(|id| id.value() == value)
            .ok_or(Error::InvalidDeviceId(value))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceId::Sja1105E => "SJA1105E",
            DeviceId::Sja1105T => "SJA1105T",
            DeviceId::Sja1105PR => "SJA1105P/R",
            DeviceId::Sja1105QS => "SJA1105Q/S",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids() {
        for id in DeviceId::ALL {
            assert_eq!(DeviceId::try_from(id.value()).unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_id() {
        assert!(matches!(
            DeviceId::try_from(0x1234_5678),
            Err(Error::InvalidDeviceId(0x1234_5678))
        ));
    }

    #[test]
    fn test_family() {
        assert_eq!(DeviceId::Sja1105T.family(), Family::Et);
        assert_eq!(DeviceId::Sja1105QS.family(), Family::Pqrs);
    }
}
