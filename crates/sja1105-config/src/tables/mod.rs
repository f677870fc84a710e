//! Table kinds of the static configuration and the entry types that fill them.
//!
//! Every entry type is a plain struct of `u64` slots plus one declarative
//! field list per [`Family`]. The lists are the single source of truth for bit
//! positions; [`crate::codec::RecordCodec`] runs them in both directions.

use std::fmt;

use crate::{config::StaticConfig, device::Family, field::FieldSpec};

/// Implements [`Entry`] given the entry type, its table kind, the
/// [`StaticConfig`] member holding it and the field list function.
macro_rules! impl_entry {
    ($entry:ty, $kind:ident, $member:ident, $fields:path) => {
        impl $crate::tables::Entry for $entry {
            const KIND: $crate::tables::TableKind = $crate::tables::TableKind::$kind;

            fn fields(
                family: $crate::device::Family,
            ) -> Vec<$crate::field::FieldSpec<Self>> {
                $fields(family)
            }

            fn table(config: &$crate::config::StaticConfig) -> &Vec<Self> {
                &config.$member
            }

            fn table_mut(config: &mut $crate::config::StaticConfig) -> &mut Vec<Self> {
                &mut config.$member
            }
        }
    };
}

pub(crate) use impl_entry;

mod general;
mod l2;
mod port;
mod schedule;
mod vl;
mod vlan;

pub use general::{AvbParamsEntry, GeneralParamsEntry};
pub use l2::{
    L2ForwardingEntry, L2ForwardingParamsEntry, L2LookupEntry, L2LookupParamsEntry,
    L2PolicingEntry,
};
pub use port::{MacConfigEntry, XmiiParamsEntry};
pub use schedule::{
    ScheduleEntry, ScheduleEntryPointsEntry, ScheduleEntryPointsParamsEntry, ScheduleParamsEntry,
};
pub use vl::{VlForwardingEntry, VlForwardingParamsEntry, VlLookupEntry, VlPolicingEntry};
pub use vlan::{RetaggingEntry, VlanLookupEntry};

/// Number of ports on the switch.
pub const NUM_PORTS: usize = 5;
/// Number of traffic classes (egress queues) per port.
pub const NUM_TC: usize = 8;

/// One fixed-size record type of the static configuration.
pub trait Entry: Clone + Default + PartialEq + fmt::Debug + 'static {
    /// Table this entry type belongs to.
    const KIND: TableKind;

    /// Field layout of the packed entry on the given family.
    fn fields(family: Family) -> Vec<FieldSpec<Self>>;

    /// The table holding entries of this type.
    fn table(config: &StaticConfig) -> &Vec<Self>;

    fn table_mut(config: &mut StaticConfig) -> &mut Vec<Self>;
}

/// The tables of a static configuration, in the order they appear in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableKind {
    Schedule,
    ScheduleEntryPoints,
    VlLookup,
    VlPolicing,
    VlForwarding,
    L2Lookup,
    L2Policing,
    VlanLookup,
    L2Forwarding,
    MacConfig,
    ScheduleParams,
    ScheduleEntryPointsParams,
    VlForwardingParams,
    L2LookupParams,
    L2ForwardingParams,
    AvbParams,
    GeneralParams,
    Retagging,
    XmiiParams,
}

impl TableKind {
    /// Canonical packing order. Never reordered.
    pub const ALL: [TableKind; 19] = [
        TableKind::Schedule,
        TableKind::ScheduleEntryPoints,
        TableKind::VlLookup,
        TableKind::VlPolicing,
        TableKind::VlForwarding,
        TableKind::L2Lookup,
        TableKind::L2Policing,
        TableKind::VlanLookup,
        TableKind::L2Forwarding,
        TableKind::MacConfig,
        TableKind::ScheduleParams,
        TableKind::ScheduleEntryPointsParams,
        TableKind::VlForwardingParams,
        TableKind::L2LookupParams,
        TableKind::L2ForwardingParams,
        TableKind::AvbParams,
        TableKind::GeneralParams,
        TableKind::Retagging,
        TableKind::XmiiParams,
    ];

    /// Block id written in the table header.
    pub const fn block_id(self) -> u8 {
        match self {
            TableKind::Schedule => 0x00,
            TableKind::ScheduleEntryPoints => 0x01,
            TableKind::VlLookup => 0x02,
            TableKind::VlPolicing => 0x03,
            TableKind::VlForwarding => 0x04,
            TableKind::L2Lookup => 0x05,
            TableKind::L2Policing => 0x06,
            TableKind::VlanLookup => 0x07,
            TableKind::L2Forwarding => 0x08,
            TableKind::MacConfig => 0x09,
            TableKind::ScheduleParams => 0x0A,
            TableKind::ScheduleEntryPointsParams => 0x0B,
            TableKind::VlForwardingParams => 0x0C,
            TableKind::L2LookupParams => 0x0D,
            TableKind::L2ForwardingParams => 0x0E,
            TableKind::AvbParams => 0x10,
            TableKind::GeneralParams => 0x11,
            TableKind::Retagging => 0x12,
            TableKind::XmiiParams => 0x4E,
        }
    }

    pub fn from_block_id(block_id: u8) -> Option<TableKind> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.block_id() == block_id)
    }

    /// Hardware capacity of the table.
    pub const fn max_entry_count(self) -> usize {
        match self {
            TableKind::Schedule => 1024,
            TableKind::ScheduleEntryPoints => 2048,
            TableKind::VlLookup => 1024,
            TableKind::VlPolicing => 1024,
            TableKind::VlForwarding => 1024,
            TableKind::L2Lookup => 1024,
            TableKind::L2Policing => 45,
            TableKind::VlanLookup => 4096,
            TableKind::L2Forwarding => 13,
            TableKind::MacConfig => 5,
            TableKind::Retagging => 32,
            TableKind::ScheduleParams
            | TableKind::ScheduleEntryPointsParams
            | TableKind::VlForwardingParams
            | TableKind::L2LookupParams
            | TableKind::L2ForwardingParams
            | TableKind::AvbParams
            | TableKind::GeneralParams
            | TableKind::XmiiParams => 1,
        }
    }

    /// Size in bytes of one packed entry.
    pub const fn entry_size(self, family: Family) -> usize {
        match (self, family) {
            (TableKind::Schedule, _) => 8,
            (TableKind::ScheduleEntryPoints, _) => 4,
            (TableKind::VlLookup, _) => 12,
            (TableKind::VlPolicing, _) => 8,
            (TableKind::VlForwarding, _) => 4,
            (TableKind::L2Lookup, Family::Et) => 12,
            (TableKind::L2Lookup, Family::Pqrs) => 20,
            (TableKind::L2Policing, _) => 8,
            (TableKind::VlanLookup, _) => 8,
            (TableKind::L2Forwarding, _) => 8,
            (TableKind::MacConfig, Family::Et) => 28,
            (TableKind::MacConfig, Family::Pqrs) => 32,
            (TableKind::ScheduleParams, _) => 12,
            (TableKind::ScheduleEntryPointsParams, _) => 4,
            (TableKind::VlForwardingParams, _) => 12,
            (TableKind::L2LookupParams, Family::Et) => 4,
            (TableKind::L2LookupParams, Family::Pqrs) => 16,
            (TableKind::L2ForwardingParams, _) => 12,
            (TableKind::AvbParams, Family::Et) => 12,
            (TableKind::AvbParams, Family::Pqrs) => 16,
            (TableKind::GeneralParams, Family::Et) => 40,
            (TableKind::GeneralParams, Family::Pqrs) => 44,
            (TableKind::Retagging, _) => 8,
            (TableKind::XmiiParams, _) => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TableKind::Schedule => "schedule-table",
            TableKind::ScheduleEntryPoints => "schedule-entry-points-table",
            TableKind::VlLookup => "vl-lookup-table",
            TableKind::VlPolicing => "vl-policing-table",
            TableKind::VlForwarding => "vl-forwarding-table",
            TableKind::L2Lookup => "l2-lookup-table",
            TableKind::L2Policing => "l2-policing-table",
            TableKind::VlanLookup => "vlan-lookup-table",
            TableKind::L2Forwarding => "l2-forwarding-table",
            TableKind::MacConfig => "mac-configuration-table",
            TableKind::ScheduleParams => "schedule-parameters-table",
            TableKind::ScheduleEntryPointsParams => "schedule-entry-points-parameters-table",
            TableKind::VlForwardingParams => "vl-forwarding-parameters-table",
            TableKind::L2LookupParams => "l2-lookup-parameters-table",
            TableKind::L2ForwardingParams => "l2-forwarding-parameters-table",
            TableKind::AvbParams => "avb-parameters-table",
            TableKind::GeneralParams => "general-parameters-table",
            TableKind::Retagging => "retagging-table",
            TableKind::XmiiParams => "xmii-mode-parameters-table",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::RecordCodec, layout::LayoutMode};

    #[test]
    fn test_block_ids_round_trip() {
        for kind in TableKind::ALL {
            assert_eq!(TableKind::from_block_id(kind.block_id()), Some(kind));
        }
        assert_eq!(TableKind::from_block_id(0x0F), None);
    }

    #[test]
    fn test_canonical_order_is_sorted() {
        let mut sorted = TableKind::ALL;
        sorted.sort();
        assert_eq!(sorted, TableKind::ALL);
    }

    #[test]
    fn test_entry_sizes_are_whole_words() {
        for kind in TableKind::ALL {
            for family in [Family::Et, Family::Pqrs] {
                assert_eq!(kind.entry_size(family) % 4, 0, "{kind}");
            }
        }
    }

    fn compiles<E: Entry>() {
        for family in [Family::Et, Family::Pqrs] {
            let codec = RecordCodec::<E>::compile(family, LayoutMode::SJA1105).unwrap();
            assert_eq!(codec.size(), E::KIND.entry_size(family));

            let mut used = vec![false; codec.size() * 8];
            for field in E::fields(family) {
                for i in 0..field.element_count() {
                    let (msb, lsb) = field.range(i);
                    for bit in lsb..=msb {
                        assert!(!used[bit], "{} {}: bit {bit} aliased", E::KIND, field.name());
                        used[bit] = true;
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_schema_fits_its_record() {
        compiles::<ScheduleEntry>();
        compiles::<ScheduleEntryPointsEntry>();
        compiles::<VlLookupEntry>();
        compiles::<VlPolicingEntry>();
        compiles::<VlForwardingEntry>();
        compiles::<L2LookupEntry>();
        compiles::<L2PolicingEntry>();
        compiles::<VlanLookupEntry>();
        compiles::<L2ForwardingEntry>();
        compiles::<MacConfigEntry>();
        compiles::<ScheduleParamsEntry>();
        compiles::<ScheduleEntryPointsParamsEntry>();
        compiles::<VlForwardingParamsEntry>();
        compiles::<L2LookupParamsEntry>();
        compiles::<L2ForwardingParamsEntry>();
        compiles::<AvbParamsEntry>();
        compiles::<GeneralParamsEntry>();
        compiles::<RetaggingEntry>();
        compiles::<XmiiParamsEntry>();
    }
}
