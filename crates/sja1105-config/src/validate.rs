//! Cross-table rules a configuration must satisfy before it is uploaded.

use crate::{
    config::StaticConfig,
    errors::ValidationError,
    tables::{
        GeneralParamsEntry, L2ForwardingParamsEntry, TableKind, VlForwardingParamsEntry,
        VlLookupEntry,
    },
};

/// Checks the tables of `config` against each other. The first rule that
/// fails is returned.
pub fn check_valid(config: &StaticConfig) -> Result<(), ValidationError> {
    let count = |kind| config.entry_count(kind);
    let full = |kind: TableKind| count(kind) == kind.max_entry_count();

    if count(TableKind::Schedule) > 0 {
        if !config.device_id().supports_schedule() {
            return Err(ValidationError::TtEthernetNotSupported);
        }
        if count(TableKind::ScheduleEntryPoints) == 0
            || !full(TableKind::ScheduleParams)
            || !full(TableKind::ScheduleEntryPointsParams)
        {
            return Err(ValidationError::IncorrectTtEthernetConfiguration);
        }
    }

    let critical = config
        .entries::<VlLookupEntry>()
        .iter()
        .any(|entry| entry.iscritical != 0);
    if critical
        && (count(TableKind::VlPolicing) == 0
            || count(TableKind::VlForwarding) == 0
            || !full(TableKind::VlForwardingParams))
    {
        return Err(ValidationError::IncorrectVirtualLinkConfiguration);
    }
    if let Some(format) = vl_lookup_format(config) {
        return Err(ValidationError::UnsupportedVlLookupFormat(format));
    }

    if count(TableKind::L2Policing) == 0 {
        return Err(ValidationError::MissingL2PolicingTable);
    }
    if count(TableKind::VlanLookup) == 0 {
        return Err(ValidationError::MissingVlanTable);
    }
    if !full(TableKind::L2Forwarding) {
        return Err(ValidationError::MissingL2ForwardingTable(
            TableKind::L2Forwarding.max_entry_count(),
        ));
    }
    if !full(TableKind::MacConfig) {
        return Err(ValidationError::MissingMacTable(
            TableKind::MacConfig.max_entry_count(),
        ));
    }
    if !full(TableKind::L2ForwardingParams) {
        return Err(ValidationError::MissingL2ForwardingParamsTable);
    }
    if !full(TableKind::GeneralParams) {
        return Err(ValidationError::MissingGeneralParamsTable);
    }
    if !full(TableKind::XmiiParams) {
        return Err(ValidationError::MissingXmiiTable);
    }

    let used = frame_memory_used(config);
    let budget = config
        .device_id()
        .frame_memory_budget(count(TableKind::Retagging) > 0);
    if used > budget {
        return Err(ValidationError::OvercommittedFrameMemory { used, budget });
    }

    Ok(())
}

/// The VL lookup format selected by the general parameters, when it is not the
/// only one the VL lookup schema describes and the table is in use.
pub(crate) fn vl_lookup_format(config: &StaticConfig) -> Option<u64> {
    if config.entry_count(TableKind::VlLookup) == 0 {
        return None;
    }

    config
        .entries::<GeneralParamsEntry>()
        .iter()
        .map(|params| params.vllupformat)
        .find(|&format| format != 0)
}

/// Frame memory blocks claimed by the L2 and VL partition spaces.
pub fn frame_memory_used(config: &StaticConfig) -> u64 {
    let l2: u64 = config
        .entries::<L2ForwardingParamsEntry>()
        .iter()
        .flat_map(|params| params.part_spc)
        .sum();
    let vl: u64 = config
        .entries::<VlForwardingParamsEntry>()
        .iter()
        .flat_map(|params| params.partspc)
        .sum();

    l2 + vl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        device::DeviceId,
        tables::{
            RetaggingEntry, ScheduleEntry, ScheduleEntryPointsEntry, ScheduleEntryPointsParamsEntry,
            ScheduleParamsEntry,
        },
    };

    fn valid(device: DeviceId) -> StaticConfig {
        StaticConfig::default_for(device)
    }

    #[test]
    fn test_default_passes() {
        for device in DeviceId::ALL {
            assert_eq!(check_valid(&valid(device)), Ok(()), "{device}");
        }
    }

    #[test]
    fn test_schedule_without_entry_points() {
        let mut config = valid(DeviceId::Sja1105T);
        config.push(ScheduleEntry::default()).unwrap();
        config.push(ScheduleParamsEntry::default()).unwrap();
        config.push(ScheduleEntryPointsParamsEntry::default()).unwrap();
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::IncorrectTtEthernetConfiguration)
        );

        config.push(ScheduleEntryPointsEntry::default()).unwrap();
        assert_eq!(check_valid(&config), Ok(()));
    }

    #[test]
    fn test_schedule_on_unsupported_device() {
        let mut config = valid(DeviceId::Sja1105PR);
        config.push(ScheduleEntry::default()).unwrap();
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::TtEthernetNotSupported)
        );
    }

    #[test]
    fn test_critical_virtual_link_needs_vl_tables() {
        let mut config = valid(DeviceId::Sja1105QS);
        config
            .push(VlLookupEntry {
                iscritical: 1,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::IncorrectVirtualLinkConfiguration)
        );
    }

    #[test]
    fn test_alternate_vl_lookup_format() {
        let mut config = valid(DeviceId::Sja1105T);
        config.entries_mut::<GeneralParamsEntry>()[0].vllupformat = 1;
        assert_eq!(check_valid(&config), Ok(()));

        config.push(VlLookupEntry::default()).unwrap();
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::UnsupportedVlLookupFormat(1))
        );

        config.entries_mut::<GeneralParamsEntry>()[0].vllupformat = 0;
        assert_eq!(check_valid(&config), Ok(()));
    }

    #[test]
    fn test_required_tables() {
        let cases = [
            (TableKind::L2Policing, ValidationError::MissingL2PolicingTable),
            (TableKind::VlanLookup, ValidationError::MissingVlanTable),
            (TableKind::L2Forwarding, ValidationError::MissingL2ForwardingTable(13)),
            (TableKind::MacConfig, ValidationError::MissingMacTable(5)),
            (
                TableKind::L2ForwardingParams,
                ValidationError::MissingL2ForwardingParamsTable,
            ),
            (TableKind::GeneralParams, ValidationError::MissingGeneralParamsTable),
            (TableKind::XmiiParams, ValidationError::MissingXmiiTable),
        ];

        for (kind, expected) in cases {
            let mut config = valid(DeviceId::Sja1105E);
            config.clear(kind);
            assert_eq!(check_valid(&config), Err(expected), "{kind}");
        }

        let mut config = valid(DeviceId::Sja1105E);
        config.set_entry_count(TableKind::L2Forwarding, 12).unwrap();
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::MissingL2ForwardingTable(13))
        );
    }

    #[test]
    fn test_frame_memory_budget() {
        let mut config = valid(DeviceId::Sja1105E);
        assert_eq!(frame_memory_used(&config), 929);

        config.entries_mut::<L2ForwardingParamsEntry>()[0].part_spc[1] = 1;
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::OvercommittedFrameMemory {
                used: 930,
                budget: 929
            })
        );
    }

    #[test]
    fn test_retagging_reduces_budget() {
        let mut config = valid(DeviceId::Sja1105T);
        config.entries_mut::<L2ForwardingParamsEntry>()[0].part_spc[0] = 910;
        config.push(RetaggingEntry::default()).unwrap();
        assert_eq!(check_valid(&config), Ok(()));

        config.entries_mut::<L2ForwardingParamsEntry>()[0].part_spc[0] = 911;
        assert_eq!(
            check_valid(&config),
            Err(ValidationError::OvercommittedFrameMemory {
                used: 911,
                budget: 910
            })
        );
    }

    #[test]
    fn test_vl_partitions_count_towards_budget() {
        let mut config = valid(DeviceId::Sja1105T);
        config.entries_mut::<L2ForwardingParamsEntry>()[0].part_spc[0] = 900;
        config
            .push(VlForwardingParamsEntry {
                partspc: [10, 10, 0, 0, 0, 0, 0, 0],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(frame_memory_used(&config), 920);
        assert_eq!(check_valid(&config), Ok(()));
    }
}
