//! Layer 2 address lookup, policing and forwarding tables.

use crate::{
    device::Family,
    field::{FieldSpec, array, scalar},
    tables::{NUM_PORTS, NUM_TC, impl_entry},
};

/// Static FDB entry. The mask and ageing fields only exist on P/Q/R/S.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L2LookupEntry {
    pub vlanid: u64,
    pub macaddr: u64,
    pub destports: u64,
    pub enfport: u64,
    pub index: u64,
    pub touched: u64,
    pub age: u64,
    pub mask_iotag: u64,
    pub mask_vlanid: u64,
    pub mask_macaddr: u64,
    pub iotag: u64,
}

fn l2_lookup_fields(family: Family) -> Vec<FieldSpec<L2LookupEntry>> {
    match family {
        Family::Et => vec![
            scalar!(L2LookupEntry, vlanid, 95, 84),
            scalar!(L2LookupEntry, macaddr, 83, 36),
            scalar!(L2LookupEntry, destports, 35, 31),
            scalar!(L2LookupEntry, enfport, 30, 30),
            scalar!(L2LookupEntry, index, 29, 20),
        ],
        Family::Pqrs => vec![
            scalar!(L2LookupEntry, touched, 159, 159),
            scalar!(L2LookupEntry, age, 158, 144),
            scalar!(L2LookupEntry, mask_iotag, 143, 143),
            scalar!(L2LookupEntry, mask_vlanid, 142, 131),
            scalar!(L2LookupEntry, mask_macaddr, 130, 83),
            scalar!(L2LookupEntry, iotag, 82, 82),
            scalar!(L2LookupEntry, vlanid, 81, 70),
            scalar!(L2LookupEntry, macaddr, 69, 22),
            scalar!(L2LookupEntry, destports, 21, 17),
            scalar!(L2LookupEntry, enfport, 16, 16),
            scalar!(L2LookupEntry, index, 15, 6),
        ],
    }
}

impl_entry!(L2LookupEntry, L2Lookup, l2_lookup, l2_lookup_fields);

/// Token bucket policer, one per port/traffic class plus broadcast policers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L2PolicingEntry {
    pub sharindx: u64,
    pub smax: u64,
    pub rate: u64,
    pub maxlen: u64,
    pub partition: u64,
}

fn l2_policing_fields(_: Family) -> Vec<FieldSpec<L2PolicingEntry>> {
    vec![
        scalar!(L2PolicingEntry, sharindx, 63, 58),
        scalar!(L2PolicingEntry, smax, 57, 42),
        scalar!(L2PolicingEntry, rate, 41, 26),
        scalar!(L2PolicingEntry, maxlen, 25, 15),
        scalar!(L2PolicingEntry, partition, 14, 12),
    ]
}

impl_entry!(L2PolicingEntry, L2Policing, l2_policing, l2_policing_fields);

/// The first [`NUM_PORTS`] entries describe ports, the remaining [`NUM_TC`]
/// map each ingress priority to an egress priority per port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L2ForwardingEntry {
    pub bc_domain: u64,
    pub reach_port: u64,
    pub fl_domain: u64,
    pub vlan_pmap: [u64; NUM_TC],
}

fn l2_forwarding_fields(_: Family) -> Vec<FieldSpec<L2ForwardingEntry>> {
    vec![
        scalar!(L2ForwardingEntry, bc_domain, 63, 59),
        scalar!(L2ForwardingEntry, reach_port, 58, 54),
        scalar!(L2ForwardingEntry, fl_domain, 53, 49),
        array!(L2ForwardingEntry, vlan_pmap, NUM_TC, 3, 25, 3),
    ]
}

impl_entry!(L2ForwardingEntry, L2Forwarding, l2_forwarding, l2_forwarding_fields);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L2LookupParamsEntry {
    /// Ageing time in units of 10 ms.
    pub maxage: u64,
    pub dyn_tbsz: u64,
    pub poly: u64,
    pub shared_learn: u64,
    pub no_enf_hostprt: u64,
    pub no_mgmt_learn: u64,
    pub maxaddrp: [u64; NUM_PORTS],
    pub start_dynspc: u64,
    pub drpnolearn: u64,
    pub use_static: u64,
    pub owr_dyn: u64,
    pub learn_once: u64,
}

fn l2_lookup_params_fields(family: Family) -> Vec<FieldSpec<L2LookupParamsEntry>> {
    match family {
        Family::Et => vec![
            scalar!(L2LookupParamsEntry, maxage, 31, 17),
            scalar!(L2LookupParamsEntry, dyn_tbsz, 16, 14),
            scalar!(L2LookupParamsEntry, poly, 13, 6),
            scalar!(L2LookupParamsEntry, shared_learn, 5, 5),
            scalar!(L2LookupParamsEntry, no_enf_hostprt, 4, 4),
            scalar!(L2LookupParamsEntry, no_mgmt_learn, 3, 3),
        ],
        Family::Pqrs => vec![
            array!(L2LookupParamsEntry, maxaddrp, NUM_PORTS, 11, 58, 11),
            scalar!(L2LookupParamsEntry, maxage, 57, 43),
            scalar!(L2LookupParamsEntry, start_dynspc, 42, 33),
            scalar!(L2LookupParamsEntry, drpnolearn, 32, 28),
            scalar!(L2LookupParamsEntry, shared_learn, 27, 27),
            scalar!(L2LookupParamsEntry, no_enf_hostprt, 26, 26),
            scalar!(L2LookupParamsEntry, no_mgmt_learn, 25, 25),
            scalar!(L2LookupParamsEntry, use_static, 24, 24),
            scalar!(L2LookupParamsEntry, owr_dyn, 23, 23),
            scalar!(L2LookupParamsEntry, learn_once, 22, 22),
        ],
    }
}

impl_entry!(
    L2LookupParamsEntry,
    L2LookupParams,
    l2_lookup_params,
    l2_lookup_params_fields
);

/// Frame memory partitioning for best-effort traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L2ForwardingParamsEntry {
    pub max_dynp: u64,
    pub part_spc: [u64; 8],
}

fn l2_forwarding_params_fields(_: Family) -> Vec<FieldSpec<L2ForwardingParamsEntry>> {
    vec![
        scalar!(L2ForwardingParamsEntry, max_dynp, 95, 93),
        array!(L2ForwardingParamsEntry, part_spc, 8, 10, 13, 10),
    ]
}

impl_entry!(
    L2ForwardingParamsEntry,
    L2ForwardingParams,
    l2_forwarding_params,
    l2_forwarding_params_fields
);
