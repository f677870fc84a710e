//! VLAN membership and retagging tables.

use crate::{
    device::Family,
    field::{FieldSpec, scalar},
    tables::impl_entry,
};

/// Port membership of one VLAN. All port fields are bitmaps over the five ports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlanLookupEntry {
    pub ving_mirr: u64,
    pub vegr_mirr: u64,
    pub vmemb_port: u64,
    pub vlan_bc: u64,
    pub tag_port: u64,
    pub vlanid: u64,
}

fn vlan_lookup_fields(_: Family) -> Vec<FieldSpec<VlanLookupEntry>> {
    vec![
        scalar!(VlanLookupEntry, ving_mirr, 63, 59),
        scalar!(VlanLookupEntry, vegr_mirr, 58, 54),
        scalar!(VlanLookupEntry, vmemb_port, 53, 49),
        scalar!(VlanLookupEntry, vlan_bc, 48, 44),
        scalar!(VlanLookupEntry, tag_port, 43, 39),
        scalar!(VlanLookupEntry, vlanid, 38, 27),
    ]
}

impl_entry!(VlanLookupEntry, VlanLookup, vlan_lookup, vlan_lookup_fields);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetaggingEntry {
    pub egr_port: u64,
    pub ing_port: u64,
    pub vlan_ing: u64,
    pub vlan_egr: u64,
    pub do_not_learn: u64,
    pub use_dest_ports: u64,
    pub destports: u64,
}

fn retagging_fields(_: Family) -> Vec<FieldSpec<RetaggingEntry>> {
    vec![
        scalar!(RetaggingEntry, egr_port, 63, 59),
        scalar!(RetaggingEntry, ing_port, 58, 54),
        scalar!(RetaggingEntry, vlan_ing, 53, 42),
        scalar!(RetaggingEntry, vlan_egr, 41, 30),
        scalar!(RetaggingEntry, do_not_learn, 29, 29),
        scalar!(RetaggingEntry, use_dest_ports, 28, 28),
        scalar!(RetaggingEntry, destports, 27, 23),
    ]
}

impl_entry!(RetaggingEntry, Retagging, retagging, retagging_fields);
