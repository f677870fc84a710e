//! A minimal configuration that forwards between all ports and passes validation.

use crate::{
    config::StaticConfig,
    device::{DeviceId, Family},
    tables::*,
};

/// Frame memory blocks handed to partition 0 when nothing else claims memory.
const DEFAULT_PARTITION_SPACE: u64 = 929;
/// Queue buffer window of one traffic class, in 8-byte blocks.
const QUEUE_WINDOW: u64 = 0x40;
const XMII_MODE_RGMII: u64 = 2;
const DEFAULT_VLAN: u64 = 1;
/// 300 s in units of 10 ms.
const AGEING_TIME: u64 = 30000;
const ALL_PORTS: u64 = (1 << NUM_PORTS) - 1;

impl StaticConfig {
    /// Learning switch on VLAN 1 with every port RGMII, port 4 as host port
    /// and all frame memory in partition 0. No schedule, no virtual links.
    pub fn default_for(device_id: DeviceId) -> Self {
        let mut config = StaticConfig::new(device_id);

        config.l2_policing = (0..NUM_PORTS as u64)
            .map(|port| L2PolicingEntry {
                sharindx: port,
                smax: 65535,
                rate: 64000,
                maxlen: 1518,
                partition: 0,
            })
            .collect();

        config.vlan_lookup = vec![VlanLookupEntry {
            vmemb_port: ALL_PORTS,
            vlan_bc: ALL_PORTS,
            vlanid: DEFAULT_VLAN,
            ..Default::default()
        }];

        config.l2_forwarding = l2_forwarding();
        config.mac_config = vec![mac_config(); NUM_PORTS];

        config.l2_lookup_params = vec![match device_id.family() {
            Family::Et => L2LookupParamsEntry {
                maxage: AGEING_TIME,
                dyn_tbsz: 4,
                poly: 0x97,
                shared_learn: 1,
                ..Default::default()
            },
            Family::Pqrs => L2LookupParamsEntry {
                maxage: AGEING_TIME,
                maxaddrp: [1024 / NUM_PORTS as u64; NUM_PORTS],
                shared_learn: 1,
                use_static: 1,
                owr_dyn: 1,
                ..Default::default()
            },
        }];

        let mut part_spc = [0; 8];
        part_spc[0] = DEFAULT_PARTITION_SPACE;
        config.l2_forwarding_params = vec![L2ForwardingParamsEntry {
            max_dynp: 0,
            part_spc,
        }];

        config.general_params = vec![GeneralParamsEntry {
            mac_fltres0: 0x0180_C200_0000,
            mac_flt0: 0xFFFF_FF00_0000,
            mac_fltres1: 0x011B_1900_0000,
            mac_flt1: 0xFFFF_FF00_0000,
            incl_srcpt0: 1,
            incl_srcpt1: 1,
            host_port: 4,
            casc_port: NUM_PORTS as u64,
            mirr_port: NUM_PORTS as u64,
            tpid: 0x88A8,
            tpid2: 0x8100,
            ..Default::default()
        }];

        config.xmii_params = vec![XmiiParamsEntry {
            xmii_mode: [XMII_MODE_RGMII; NUM_PORTS],
            phy_mac: [0; NUM_PORTS],
        }];

        config
    }
}

/// One entry per port that floods to every other port, then one per ingress
/// priority that keeps the priority on egress.
fn l2_forwarding() -> Vec<L2ForwardingEntry> {
    let ports = (0..NUM_PORTS).map(|port| {
        let others = ALL_PORTS & !(1 << port);
        L2ForwardingEntry {
            bc_domain: others,
            reach_port: others,
            fl_domain: others,
            vlan_pmap: std::array::from_fn(|prio| prio as u64),
        }
    });

    let priorities = (0..NUM_TC).map(|prio| {
        let mut vlan_pmap = [0; NUM_TC];
        vlan_pmap[..NUM_PORTS].fill(prio as u64);
        L2ForwardingEntry {
            vlan_pmap,
            ..Default::default()
        }
    });

    ports.chain(priorities).collect()
}

fn mac_config() -> MacConfigEntry {
    MacConfigEntry {
        base: std::array::from_fn(|queue| queue as u64 * QUEUE_WINDOW),
        top: std::array::from_fn(|queue| (queue as u64 + 1) * QUEUE_WINDOW - 1),
        enabled: [1; NUM_TC],
        vlanid: DEFAULT_VLAN,
        maxage: 0xFF,
        dyn_learn: 1,
        ingress: 1,
        egress: 1,
        ..Default::default()
    }
}
