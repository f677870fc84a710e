//! The in-memory static configuration and the image framer that packs it.
//!
//! An image is the device id word, then every non-empty table in
//! [`TableKind::ALL`] order as `header | entries | data CRC`, then one terminal
//! header with zero length and a CRC placeholder.

use tracing::{debug, warn};

use crate::{
    bits,
    codec::{self, RecordCodec},
    crc::crc32,
    device::{DeviceId, Family},
    errors::{Error, Result, Warning},
    header::TableHeader,
    layout::LayoutMode,
    tables::*,
    validate,
};

/// CRC written into the terminal header until the uploader patches in the
/// whole-image checksum.
pub const FINAL_HEADER_CRC_PLACEHOLDER: u32 = 0xDEAD_BEEF;

/// Every table of one switch configuration, owned by the caller.
///
/// Entries are edited through [`StaticConfig::push`], [`StaticConfig::entries_mut`]
/// and the name-based [`StaticConfig::set_field`]; all of them keep each table
/// within its hardware capacity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticConfig {
    device_id: DeviceId,
    pub(crate) schedule: Vec<ScheduleEntry>,
    pub(crate) schedule_entry_points: Vec<ScheduleEntryPointsEntry>,
    pub(crate) vl_lookup: Vec<VlLookupEntry>,
    pub(crate) vl_policing: Vec<VlPolicingEntry>,
    pub(crate) vl_forwarding: Vec<VlForwardingEntry>,
    pub(crate) l2_lookup: Vec<L2LookupEntry>,
    pub(crate) l2_policing: Vec<L2PolicingEntry>,
    pub(crate) vlan_lookup: Vec<VlanLookupEntry>,
    pub(crate) l2_forwarding: Vec<L2ForwardingEntry>,
    pub(crate) mac_config: Vec<MacConfigEntry>,
    pub(crate) schedule_params: Vec<ScheduleParamsEntry>,
    pub(crate) schedule_entry_points_params: Vec<ScheduleEntryPointsParamsEntry>,
    pub(crate) vl_forwarding_params: Vec<VlForwardingParamsEntry>,
    pub(crate) l2_lookup_params: Vec<L2LookupParamsEntry>,
    pub(crate) l2_forwarding_params: Vec<L2ForwardingParamsEntry>,
    pub(crate) avb_params: Vec<AvbParamsEntry>,
    pub(crate) general_params: Vec<GeneralParamsEntry>,
    pub(crate) retagging: Vec<RetaggingEntry>,
    pub(crate) xmii_params: Vec<XmiiParamsEntry>,
}

/// Table operations that do not depend on the concrete entry type.
trait AnyTable {
    fn count(&self) -> usize;

    fn resize(&mut self, count: usize);

    fn clear(&mut self);

    /// Appends every entry, packed, to `out`.
    fn pack_into(&self, family: Family, layout: LayoutMode, out: &mut Vec<u8>) -> Result<()>;

    /// Decodes as many whole entries as `region` holds and returns the bytes consumed.
    fn unpack_from(&mut self, family: Family, layout: LayoutMode, region: &[u8]) -> Result<usize>;

    fn get_field(&self, family: Family, index: usize, path: &str) -> Result<u64>;

    fn set_field(&mut self, family: Family, index: usize, path: &str, value: u64) -> Result<()>;
}

impl<E: Entry> AnyTable for Vec<E> {
    fn count(&self) -> usize {
        self.len()
    }

    fn resize(&mut self, count: usize) {
        Vec::resize(self, count, E::default());
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn pack_into(&self, family: Family, layout: LayoutMode, out: &mut Vec<u8>) -> Result<()> {
        let codec = RecordCodec::<E>::compile(family, layout)?;

        let mut at = out.len();
        out.resize(at + self.len() * codec.size(), 0);
        for entry in self {
            codec.encode(entry, &mut out[at..])?;
            at += codec.size();
        }

        Ok(())
    }

    fn unpack_from(&mut self, family: Family, layout: LayoutMode, region: &[u8]) -> Result<usize> {
        let codec = RecordCodec::<E>::compile(family, layout)?;

        let count = region.len() / codec.size();
        if self.len() + count > E::KIND.max_entry_count() {
            return Err(Error::EntryCountExceeded {
                table: E::KIND,
                max: E::KIND.max_entry_count(),
            });
        }

        self.reserve(count);
        for record in region.chunks_exact(codec.size()) {
            self.push(codec.decode(record)?);
        }

        Ok(count * codec.size())
    }

    fn get_field(&self, family: Family, index: usize, path: &str) -> Result<u64> {
        let entry = self.get(index).ok_or(Error::EntryIndexOutOfRange {
            table: E::KIND,
            index,
            len: self.len(),
        })?;

        codec::get_field(family, entry, path)
    }

    fn set_field(&mut self, family: Family, index: usize, path: &str, value: u64) -> Result<()> {
        let len = self.len();
        let entry = self.get_mut(index).ok_or(Error::EntryIndexOutOfRange {
            table: E::KIND,
            index,
            len,
        })?;

        codec::set_field(family, entry, path, value)
    }
}

impl StaticConfig {
    /// A configuration for `device_id` with every table empty.
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            device_id,
            schedule: Vec::new(),
            schedule_entry_points: Vec::new(),
            vl_lookup: Vec::new(),
            vl_policing: Vec::new(),
            vl_forwarding: Vec::new(),
            l2_lookup: Vec::new(),
            l2_policing: Vec::new(),
            vlan_lookup: Vec::new(),
            l2_forwarding: Vec::new(),
            mac_config: Vec::new(),
            schedule_params: Vec::new(),
            schedule_entry_points_params: Vec::new(),
            vl_forwarding_params: Vec::new(),
            l2_lookup_params: Vec::new(),
            l2_forwarding_params: Vec::new(),
            avb_params: Vec::new(),
            general_params: Vec::new(),
            retagging: Vec::new(),
            xmii_params: Vec::new(),
        }
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn family(&self) -> Family {
        self.device_id.family()
    }

    fn table(&self, kind: TableKind) -> &dyn AnyTable {
        match kind {
            TableKind::Schedule => &self.schedule,
            TableKind::ScheduleEntryPoints => &self.schedule_entry_points,
            TableKind::VlLookup => &self.vl_lookup,
            TableKind::VlPolicing => &self.vl_policing,
            TableKind::VlForwarding => &self.vl_forwarding,
            TableKind::L2Lookup => &self.l2_lookup,
            TableKind::L2Policing => &self.l2_policing,
            TableKind::VlanLookup => &self.vlan_lookup,
            TableKind::L2Forwarding => &self.l2_forwarding,
            TableKind::MacConfig => &self.mac_config,
            TableKind::ScheduleParams => &self.schedule_params,
            TableKind::ScheduleEntryPointsParams => &self.schedule_entry_points_params,
            TableKind::VlForwardingParams => &self.vl_forwarding_params,
            TableKind::L2LookupParams => &self.l2_lookup_params,
            TableKind::L2ForwardingParams => &self.l2_forwarding_params,
            TableKind::AvbParams => &self.avb_params,
            TableKind::GeneralParams => &self.general_params,
            TableKind::Retagging => &self.retagging,
            TableKind::XmiiParams => &self.xmii_params,
        }
    }

    fn table_mut(&mut self, kind: TableKind) -> &mut dyn AnyTable {
        match kind {
            TableKind::Schedule => &mut self.schedule,
            TableKind::ScheduleEntryPoints => &mut self.schedule_entry_points,
            TableKind::VlLookup => &mut self.vl_lookup,
            TableKind::VlPolicing => &mut self.vl_policing,
            TableKind::VlForwarding => &mut self.vl_forwarding,
            TableKind::L2Lookup => &mut self.l2_lookup,
            TableKind::L2Policing => &mut self.l2_policing,
            TableKind::VlanLookup => &mut self.vlan_lookup,
            TableKind::L2Forwarding => &mut self.l2_forwarding,
            TableKind::MacConfig => &mut self.mac_config,
            TableKind::ScheduleParams => &mut self.schedule_params,
            TableKind::ScheduleEntryPointsParams => &mut self.schedule_entry_points_params,
            TableKind::VlForwardingParams => &mut self.vl_forwarding_params,
            TableKind::L2LookupParams => &mut self.l2_lookup_params,
            TableKind::L2ForwardingParams => &mut self.l2_forwarding_params,
            TableKind::AvbParams => &mut self.avb_params,
            TableKind::GeneralParams => &mut self.general_params,
            TableKind::Retagging => &mut self.retagging,
            TableKind::XmiiParams => &mut self.xmii_params,
        }
    }

    /// Number of entries currently held by `kind`.
    pub fn entry_count(&self, kind: TableKind) -> usize {
        self.table(kind).count()
    }

    pub fn entries<E: Entry>(&self) -> &[E] {
        E::table(self)
    }

    /// Mutable view of the entries of `E`'s table. The table cannot grow
    /// through it; use [`StaticConfig::push`] or [`StaticConfig::set_entry_count`].
    pub fn entries_mut<E: Entry>(&mut self) -> &mut [E] {
        E::table_mut(self)
    }

    /// Appends `entry` to its table.
    pub fn push<E: Entry>(&mut self, entry: E) -> Result<()> {
        let table = E::table_mut(self);
        if table.len() >= E::KIND.max_entry_count() {
            return Err(Error::EntryCountExceeded {
                table: E::KIND,
                max: E::KIND.max_entry_count(),
            });
        }

        table.push(entry);
        Ok(())
    }

    /// Inserts `entry` at `index`, shifting later entries up.
    pub fn insert<E: Entry>(&mut self, index: usize, entry: E) -> Result<()> {
        let table = E::table_mut(self);
        if index > table.len() {
            return Err(Error::EntryIndexOutOfRange {
                table: E::KIND,
                index,
                len: table.len(),
            });
        }
        if table.len() >= E::KIND.max_entry_count() {
            return Err(Error::EntryCountExceeded {
                table: E::KIND,
                max: E::KIND.max_entry_count(),
            });
        }

        table.insert(index, entry);
        Ok(())
    }

    /// Removes and returns the entry at `index`.
    pub fn remove<E: Entry>(&mut self, index: usize) -> Result<E> {
        let table = E::table_mut(self);
        if index >= table.len() {
            return Err(Error::EntryIndexOutOfRange {
                table: E::KIND,
                index,
                len: table.len(),
            });
        }

        Ok(table.remove(index))
    }

    pub fn clear(&mut self, kind: TableKind) {
        self.table_mut(kind).clear();
    }

    /// Grows `kind` with default entries or truncates it to `count`.
    pub fn set_entry_count(&mut self, kind: TableKind, count: usize) -> Result<()> {
        if count > kind.max_entry_count() {
            return Err(Error::EntryCountExceeded {
                table: kind,
                max: kind.max_entry_count(),
            });
        }

        self.table_mut(kind).resize(count);
        Ok(())
    }

    /// Reads field `path` (`"name"` or `"name[i]"`) of entry `index` of `kind`.
    pub fn get_field(&self, kind: TableKind, index: usize, path: &str) -> Result<u64> {
        self.table(kind).get_field(self.family(), index, path)
    }

    pub fn set_field(
        &mut self,
        kind: TableKind,
        index: usize,
        path: &str,
        value: u64,
    ) -> Result<()> {
        let family = self.family();
        self.table_mut(kind).set_field(family, index, path, value)
    }

    /// Runs the cross-table checks an image must pass before upload.
    pub fn check_valid(&self) -> Result<()> {
        validate::check_valid(self)?;
        Ok(())
    }

    /// Packs with the native layout and the default terminal placeholder.
    pub fn pack(&self) -> Result<Vec<u8>> {
        Codec::default().pack(self)
    }

    /// Unpacks an image in the native layout.
    pub fn unpack(image: &[u8]) -> Result<Self> {
        Codec::default().unpack(image)
    }
}

/// Packs and unpacks images under one layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    layout: LayoutMode,
    placeholder: u32,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(LayoutMode::SJA1105)
    }
}

impl Codec {
    pub const fn new(layout: LayoutMode) -> Self {
        Self {
            layout,
            placeholder: FINAL_HEADER_CRC_PLACEHOLDER,
        }
    }

    /// Value written into the CRC field of the terminal header.
    pub const fn with_placeholder(mut self, crc: u32) -> Self {
        self.placeholder = crc;
        self
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Serializes `config` without validating it.
    pub fn pack(&self, config: &StaticConfig) -> Result<Vec<u8>> {
        let family = config.family();
        let mut image = Vec::new();

        self.push_word(&mut image, config.device_id().value())?;

        for kind in TableKind::ALL {
            let table = config.table(kind);
            if table.count() == 0 {
                continue;
            }
            if table.count() > kind.max_entry_count() {
                return Err(Error::EntryCountExceeded {
                    table: kind,
                    max: kind.max_entry_count(),
                });
            }

            let header_at = image.len();
            let data_at = header_at + TableHeader::SIZE;
            image.resize(data_at, 0);
            table.pack_into(family, self.layout, &mut image)?;

            let data_len = image.len() - data_at;
            TableHeader::new(kind.block_id(), (data_len / 4) as u32)
                .pack_with_crc(&mut image[header_at..data_at], self.layout)?;

            let crc = crc32(&image[data_at..], self.layout)?;
            self.push_word(&mut image, crc)?;

            debug!(table = %kind, entries = table.count(), bytes = data_len, "packed table");
        }

        let at = image.len();
        image.resize(at + TableHeader::SIZE, 0);
        TableHeader {
            block_id: 0,
            len_words: 0,
            crc: self.placeholder,
        }
        .pack(&mut image[at..], self.layout)?;

        debug!(device = %config.device_id(), bytes = image.len(), "packed static config");
        Ok(image)
    }

    /// Validates `config` and serializes it. An invalid configuration is never packed.
    pub fn pack_for_upload(&self, config: &StaticConfig) -> Result<Vec<u8>> {
        validate::check_valid(config)?;
        self.pack(config)
    }

    /// Parses an image, discarding non-fatal warnings (they are still logged).
    pub fn unpack(&self, image: &[u8]) -> Result<StaticConfig> {
        self.unpack_with_warnings(image).map(|(config, _)| config)
    }

    /// Parses an image and returns the non-fatal conditions met on the way.
    ///
    /// The terminal header ends parsing; its CRC field is not checked. When the
    /// entries decoded from a table do not fill its declared length, the cursor
    /// is moved to the declared end and a [`Warning::TableLengthMismatch`] is
    /// reported.
    pub fn unpack_with_warnings(&self, image: &[u8]) -> Result<(StaticConfig, Vec<Warning>)> {
        let device_id = DeviceId::try_from(self.read_word(image, 0)?)?;
        let family = device_id.family();

        let mut config = StaticConfig::new(device_id);
        let mut warnings = Vec::new();
        let mut offset = 4;

        loop {
            let header_bytes = region(image, offset, TableHeader::SIZE)?;
            let header = TableHeader::unpack(header_bytes, self.layout)?;
            if header.is_terminal() {
                break;
            }

            let computed = TableHeader::compute_crc(header_bytes, self.layout)?;
            if computed != header.crc {
                return Err(Error::HeaderCrcMismatch {
                    computed,
                    stored: header.crc,
                });
            }

            let kind = TableKind::from_block_id(header.block_id)
                .ok_or(Error::UnknownBlockId(header.block_id))?;
            offset += TableHeader::SIZE;

            let declared = header.len_words as usize * 4;
            let entries = region(image, offset, declared)?;
            let consumed = config
                .table_mut(kind)
                .unpack_from(family, self.layout, entries)?;

            if consumed != declared {
                let warning = Warning::TableLengthMismatch {
                    table: kind,
                    declared,
                    consumed,
                };
                warn!("{warning}");
                warnings.push(warning);
            }

            let stored = self.read_word(image, offset + declared)?;
            let computed = crc32(entries, self.layout)?;
            if computed != stored {
                return Err(Error::DataCrcMismatch {
                    table: kind,
                    computed,
                    stored,
                });
            }

            offset += declared + 4;
            debug!(table = %kind, entries = config.entry_count(kind), "unpacked table");
        }

        if let Some(format) = validate::vl_lookup_format(&config) {
            let warning = Warning::UnsupportedVlLookupFormat { format };
            warn!("{warning}");
            warnings.push(warning);
        }

        Ok((config, warnings))
    }

    fn push_word(&self, image: &mut Vec<u8>, word: u32) -> Result<()> {
        let at = image.len();
        image.resize(at + 4, 0);
        bits::pack(&mut image[at..], word as u64, 31, 0, self.layout)
    }

    fn read_word(&self, image: &[u8], offset: usize) -> Result<u32> {
        Ok(bits::unpack(region(image, offset, 4)?, 31, 0, self.layout)? as u32)
    }
}

/// `len` bytes of `image` starting at `offset`, or how many are missing.
fn region(image: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    image.get(offset..offset + len).ok_or(Error::UnexpectedEnd {
        offset,
        needed: (offset + len).saturating_sub(image.len()),
    })
}
