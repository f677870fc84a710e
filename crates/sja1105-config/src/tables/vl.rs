//! Virtual link tables: lookup, policing and forwarding of critical traffic.

use crate::{
    device::Family,
    field::{FieldSpec, array, scalar},
    tables::impl_entry,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlLookupEntry {
    pub destports: u64,
    /// Non-zero marks the virtual link as critical (policed and forwarded by VL tables).
    pub iscritical: u64,
    pub macaddr: u64,
    pub vlanid: u64,
    pub port: u64,
    pub vlanprior: u64,
}

fn vl_lookup_fields(_: Family) -> Vec<FieldSpec<VlLookupEntry>> {
    vec![
        scalar!(VlLookupEntry, destports, 95, 91),
        scalar!(VlLookupEntry, iscritical, 90, 90),
        scalar!(VlLookupEntry, macaddr, 89, 42),
        scalar!(VlLookupEntry, vlanid, 41, 30),
        scalar!(VlLookupEntry, port, 29, 27),
        scalar!(VlLookupEntry, vlanprior, 26, 24),
    ]
}

impl_entry!(VlLookupEntry, VlLookup, vl_lookup, vl_lookup_fields);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlPolicingEntry {
    pub r#type: u64,
    pub maxlen: u64,
    pub sharindx: u64,
    /// Only meaningful for rate-constrained links (`type == 0`).
    pub bag: u64,
    /// Only meaningful for rate-constrained links (`type == 0`).
    pub jitter: u64,
}

fn vl_policing_fields(_: Family) -> Vec<FieldSpec<VlPolicingEntry>> {
    vec![
        scalar!(VlPolicingEntry, r#type, 63, 63),
        scalar!(VlPolicingEntry, maxlen, 62, 52),
        scalar!(VlPolicingEntry, sharindx, 51, 42),
        scalar!(VlPolicingEntry, bag, 41, 28),
        scalar!(VlPolicingEntry, jitter, 27, 18),
    ]
}

impl_entry!(VlPolicingEntry, VlPolicing, vl_policing, vl_policing_fields);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlForwardingEntry {
    pub r#type: u64,
    pub priority: u64,
    pub partition: u64,
    pub destports: u64,
}

fn vl_forwarding_fields(_: Family) -> Vec<FieldSpec<VlForwardingEntry>> {
    vec![
        scalar!(VlForwardingEntry, r#type, 31, 31),
        scalar!(VlForwardingEntry, priority, 30, 28),
        scalar!(VlForwardingEntry, partition, 27, 25),
        scalar!(VlForwardingEntry, destports, 24, 20),
    ]
}

impl_entry!(VlForwardingEntry, VlForwarding, vl_forwarding, vl_forwarding_fields);

/// Frame memory reserved for virtual link traffic, per partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlForwardingParamsEntry {
    pub partspc: [u64; 8],
    pub debugen: u64,
}

fn vl_forwarding_params_fields(_: Family) -> Vec<FieldSpec<VlForwardingParamsEntry>> {
    vec![
        array!(VlForwardingParamsEntry, partspc, 8, 10, 16, 10),
        scalar!(VlForwardingParamsEntry, debugen, 15, 15),
    ]
}

impl_entry!(
    VlForwardingParamsEntry,
    VlForwardingParams,
    vl_forwarding_params,
    vl_forwarding_params_fields
);
