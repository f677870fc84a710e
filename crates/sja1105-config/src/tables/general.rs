//! Switch-wide parameters: general settings and AVB metadata addresses.

use crate::{
    device::Family,
    field::{FieldSpec, scalar},
    tables::impl_entry,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneralParamsEntry {
    pub vllupformat: u64,
    pub mirr_ptacu: u64,
    pub switchid: u64,
    pub hostprio: u64,
    pub mac_fltres1: u64,
    pub mac_fltres0: u64,
    pub mac_flt1: u64,
    pub mac_flt0: u64,
    pub incl_srcpt1: u64,
    pub incl_srcpt0: u64,
    pub send_meta1: u64,
    pub send_meta0: u64,
    pub casc_port: u64,
    pub host_port: u64,
    pub mirr_port: u64,
    pub vlmarker: u64,
    pub vlmask: u64,
    pub tpid: u64,
    pub ignore2stf: u64,
    pub tpid2: u64,
    pub queue_ts: u64,
    pub egrmirrvid: u64,
    pub egrmirrpcp: u64,
    pub egrmirrdei: u64,
    pub replay_port: u64,
}

fn general_params_fields(family: Family) -> Vec<FieldSpec<GeneralParamsEntry>> {
    // Leading fields are identical except that P/Q/R/S places them 32 bits higher.
    let up = match family {
        Family::Et => 0,
        Family::Pqrs => 32,
    };

    let mut fields = vec![
        scalar!(GeneralParamsEntry, vllupformat, 319 + up, 319 + up),
        scalar!(GeneralParamsEntry, mirr_ptacu, 318 + up, 318 + up),
        scalar!(GeneralParamsEntry, switchid, 317 + up, 315 + up),
        scalar!(GeneralParamsEntry, hostprio, 314 + up, 312 + up),
        scalar!(GeneralParamsEntry, mac_fltres1, 311 + up, 264 + up),
        scalar!(GeneralParamsEntry, mac_fltres0, 263 + up, 216 + up),
        scalar!(GeneralParamsEntry, mac_flt1, 215 + up, 168 + up),
        scalar!(GeneralParamsEntry, mac_flt0, 167 + up, 120 + up),
        scalar!(GeneralParamsEntry, incl_srcpt1, 119 + up, 119 + up),
        scalar!(GeneralParamsEntry, incl_srcpt0, 118 + up, 118 + up),
        scalar!(GeneralParamsEntry, send_meta1, 117 + up, 117 + up),
        scalar!(GeneralParamsEntry, send_meta0, 116 + up, 116 + up),
        scalar!(GeneralParamsEntry, casc_port, 115 + up, 113 + up),
        scalar!(GeneralParamsEntry, host_port, 112 + up, 110 + up),
        scalar!(GeneralParamsEntry, mirr_port, 109 + up, 107 + up),
        scalar!(GeneralParamsEntry, vlmarker, 106 + up, 75 + up),
        scalar!(GeneralParamsEntry, vlmask, 74 + up, 43 + up),
    ];

    fields.extend(match family {
        Family::Et => vec![
            scalar!(GeneralParamsEntry, tpid, 42, 27),
            scalar!(GeneralParamsEntry, ignore2stf, 26, 26),
            scalar!(GeneralParamsEntry, tpid2, 25, 10),
        ],
        Family::Pqrs => vec![
            scalar!(GeneralParamsEntry, tpid2, 74, 59),
            scalar!(GeneralParamsEntry, ignore2stf, 58, 58),
            scalar!(GeneralParamsEntry, tpid, 57, 42),
            scalar!(GeneralParamsEntry, queue_ts, 41, 41),
            scalar!(GeneralParamsEntry, egrmirrvid, 40, 29),
            scalar!(GeneralParamsEntry, egrmirrpcp, 28, 26),
            scalar!(GeneralParamsEntry, egrmirrdei, 25, 25),
            scalar!(GeneralParamsEntry, replay_port, 24, 22),
        ],
    });

    fields
}

impl_entry!(
    GeneralParamsEntry,
    GeneralParams,
    general_params,
    general_params_fields
);

/// Source and destination MAC addresses of AVB/PTP metadata frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvbParamsEntry {
    pub cas_master: u64,
    pub destmeta: u64,
    pub srcmeta: u64,
}

fn avb_params_fields(family: Family) -> Vec<FieldSpec<AvbParamsEntry>> {
    match family {
        Family::Et => vec![
            scalar!(AvbParamsEntry, destmeta, 95, 48),
            scalar!(AvbParamsEntry, srcmeta, 47, 0),
        ],
        Family::Pqrs => vec![
            scalar!(AvbParamsEntry, cas_master, 126, 126),
            scalar!(AvbParamsEntry, destmeta, 125, 78),
            scalar!(AvbParamsEntry, srcmeta, 77, 30),
        ],
    }
}

impl_entry!(AvbParamsEntry, AvbParams, avb_params, avb_params_fields);
