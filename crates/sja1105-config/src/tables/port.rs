//! Per-port MAC settings and xMII interface modes.

use crate::{
    device::Family,
    field::{FieldSpec, array, scalar},
    tables::{NUM_PORTS, NUM_TC, impl_entry},
};

/// MAC configuration of one port: per-queue buffer windows followed by port flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacConfigEntry {
    pub top: [u64; NUM_TC],
    pub base: [u64; NUM_TC],
    pub enabled: [u64; NUM_TC],
    pub ifg: u64,
    pub speed: u64,
    pub tp_delin: u64,
    pub tp_delout: u64,
    pub maxage: u64,
    pub vlanprio: u64,
    pub vlanid: u64,
    pub ing_mirr: u64,
    pub egr_mirr: u64,
    pub drpnona664: u64,
    pub drpdtag: u64,
    pub drpuntag: u64,
    pub retag: u64,
    pub dyn_learn: u64,
    pub egress: u64,
    pub ingress: u64,
}

fn mac_config_fields(family: Family) -> Vec<FieldSpec<MacConfigEntry>> {
    // Queue windows are interleaved: 19 bits per queue, starting above the flags.
    let queues = match family {
        Family::Et => 72,
        Family::Pqrs => 104,
    };

    let mut fields = vec![
        array!(MacConfigEntry, enabled, NUM_TC, 1, queues, 19),
        array!(MacConfigEntry, base, NUM_TC, 9, queues + 1, 19),
        array!(MacConfigEntry, top, NUM_TC, 9, queues + 10, 19),
    ];

    fields.extend(match family {
        Family::Et => vec![
            scalar!(MacConfigEntry, ifg, 71, 67),
            scalar!(MacConfigEntry, speed, 66, 65),
            scalar!(MacConfigEntry, tp_delin, 64, 49),
            scalar!(MacConfigEntry, tp_delout, 48, 33),
            scalar!(MacConfigEntry, maxage, 32, 25),
            scalar!(MacConfigEntry, vlanprio, 24, 22),
            scalar!(MacConfigEntry, vlanid, 21, 10),
            scalar!(MacConfigEntry, ing_mirr, 9, 9),
            scalar!(MacConfigEntry, egr_mirr, 8, 8),
            scalar!(MacConfigEntry, drpnona664, 7, 7),
            scalar!(MacConfigEntry, drpdtag, 6, 6),
            scalar!(MacConfigEntry, drpuntag, 5, 5),
            scalar!(MacConfigEntry, retag, 4, 4),
            scalar!(MacConfigEntry, dyn_learn, 3, 3),
            scalar!(MacConfigEntry, egress, 2, 2),
            scalar!(MacConfigEntry, ingress, 1, 1),
        ],
        Family::Pqrs => vec![
            scalar!(MacConfigEntry, ifg, 103, 99),
            scalar!(MacConfigEntry, speed, 98, 97),
            scalar!(MacConfigEntry, tp_delin, 96, 81),
            scalar!(MacConfigEntry, tp_delout, 80, 65),
            scalar!(MacConfigEntry, maxage, 64, 57),
            scalar!(MacConfigEntry, vlanprio, 56, 54),
            scalar!(MacConfigEntry, vlanid, 53, 42),
            scalar!(MacConfigEntry, ing_mirr, 41, 41),
            scalar!(MacConfigEntry, egr_mirr, 40, 40),
            scalar!(MacConfigEntry, drpnona664, 39, 39),
            scalar!(MacConfigEntry, drpdtag, 38, 38),
            scalar!(MacConfigEntry, drpuntag, 35, 35),
            scalar!(MacConfigEntry, retag, 34, 34),
            scalar!(MacConfigEntry, dyn_learn, 33, 33),
            scalar!(MacConfigEntry, egress, 32, 32),
            scalar!(MacConfigEntry, ingress, 31, 31),
        ],
    });

    fields
}

impl_entry!(MacConfigEntry, MacConfig, mac_config, mac_config_fields);

/// Interface mode of every port. `xmii_mode`: 0 = MII, 1 = RMII, 2 = RGMII, 3 = SGMII.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmiiParamsEntry {
    pub xmii_mode: [u64; NUM_PORTS],
    /// 0 = MAC role, 1 = PHY role.
    pub phy_mac: [u64; NUM_PORTS],
}

fn xmii_params_fields(_: Family) -> Vec<FieldSpec<XmiiParamsEntry>> {
    vec![
        array!(XmiiParamsEntry, xmii_mode, NUM_PORTS, 2, 17, 3),
        array!(XmiiParamsEntry, phy_mac, NUM_PORTS, 1, 19, 3),
    ]
}

impl_entry!(XmiiParamsEntry, XmiiParams, xmii_params, xmii_params_fields);
