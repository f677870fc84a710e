//! Time-triggered schedule tables.

use crate::{
    device::Family,
    field::{FieldSpec, array, scalar},
    tables::impl_entry,
};

/// One window of the time-triggered schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntry {
    pub winstindex: u64,
    pub winend: u64,
    pub winst: u64,
    pub destports: u64,
    pub setvalid: u64,
    pub txen: u64,
    pub resmedia_en: u64,
    pub resmedia: u64,
    pub vlindex: u64,
    pub delta: u64,
}

fn schedule_fields(_: Family) -> Vec<FieldSpec<ScheduleEntry>> {
    vec![
        scalar!(ScheduleEntry, winstindex, 63, 54),
        scalar!(ScheduleEntry, winend, 53, 53),
        scalar!(ScheduleEntry, winst, 52, 52),
        scalar!(ScheduleEntry, destports, 51, 47),
        scalar!(ScheduleEntry, setvalid, 46, 46),
        scalar!(ScheduleEntry, txen, 45, 45),
        scalar!(ScheduleEntry, resmedia_en, 44, 44),
        scalar!(ScheduleEntry, resmedia, 43, 36),
        scalar!(ScheduleEntry, vlindex, 35, 26),
        scalar!(ScheduleEntry, delta, 25, 8),
    ]
}

impl_entry!(ScheduleEntry, Schedule, schedule, schedule_fields);

/// Where a subschedule starts and after which delay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntryPointsEntry {
    pub subschindx: u64,
    pub delta: u64,
    pub address: u64,
}

fn schedule_entry_points_fields(_: Family) -> Vec<FieldSpec<ScheduleEntryPointsEntry>> {
    vec![
        scalar!(ScheduleEntryPointsEntry, subschindx, 31, 29),
        scalar!(ScheduleEntryPointsEntry, delta, 28, 11),
        scalar!(ScheduleEntryPointsEntry, address, 10, 1),
    ]
}

impl_entry!(
    ScheduleEntryPointsEntry,
    ScheduleEntryPoints,
    schedule_entry_points,
    schedule_entry_points_fields
);

/// Last schedule index of each of the eight subschedules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleParamsEntry {
    pub subscheind: [u64; 8],
}

fn schedule_params_fields(_: Family) -> Vec<FieldSpec<ScheduleParamsEntry>> {
    vec![array!(ScheduleParamsEntry, subscheind, 8, 10, 16, 10)]
}

impl_entry!(
    ScheduleParamsEntry,
    ScheduleParams,
    schedule_params,
    schedule_params_fields
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntryPointsParamsEntry {
    pub clksrc: u64,
    pub actsubsch: u64,
}

fn schedule_entry_points_params_fields(
    _: Family,
) -> Vec<FieldSpec<ScheduleEntryPointsParamsEntry>> {
    vec![
        scalar!(ScheduleEntryPointsParamsEntry, clksrc, 31, 30),
        scalar!(ScheduleEntryPointsParamsEntry, actsubsch, 29, 27),
    ]
}

impl_entry!(
    ScheduleEntryPointsParamsEntry,
    ScheduleEntryPointsParams,
    schedule_entry_points_params,
    schedule_entry_points_params_fields
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::RecordCodec, layout::LayoutMode};

    #[test]
    fn test_schedule_entry_layout() {
        let codec =
            RecordCodec::<ScheduleEntry>::compile(Family::Et, LayoutMode::BIG_ENDIAN).unwrap();
        let entry = ScheduleEntry {
            winstindex: 0x3FF,
            delta: 0x3FFFF,
            ..Default::default()
        };
        let mut buf = [0u8; 8];
        codec.encode(&entry, &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xC0, 0x00, 0x00, 0x03, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn test_schedule_params_subschedules() {
        let codec =
            RecordCodec::<ScheduleParamsEntry>::compile(Family::Pqrs, LayoutMode::SJA1105).unwrap();
        let entry = ScheduleParamsEntry {
            subscheind: [1, 2, 3, 4, 5, 6, 7, 1023],
        };
        let mut buf = [0u8; 12];
        codec.encode(&entry, &mut buf).unwrap();
        assert_eq!(codec.decode(&buf).unwrap(), entry);
    }
}
