//! Sequencing of a static configuration upload over a [`Link`].

use sja1105_config::{Codec, DeviceId, StaticConfig, bits, chunk, crc::crc32};
use tracing::{debug, info, warn};

use crate::{
    errors::{Error, Result},
    link::Link,
    message::{MAX_ADDRESS, MAX_PAYLOAD_WORDS, MessageHeader},
};

/// Word address of the static configuration area.
pub const STATIC_CONFIG_BASE: u32 = 0x20000;
/// Word address of the device id register.
pub const DEVICE_ID_ADDRESS: u32 = 0x0;
const DEFAULT_RETRIES: usize = 3;

/// Packs `config` for upload: validates it, then replaces the terminal
/// header's placeholder with the CRC of every byte before it.
pub fn prepare_for_upload(config: &StaticConfig, codec: &Codec) -> Result<Vec<u8>> {
    let mut image = codec.pack_for_upload(config)?;

    let body = image.len() - 4;
    let crc = crc32(&image[..body], codec.layout())?;
    bits::pack(&mut image[body..], crc as u64, 31, 0, codec.layout())?;

    Ok(image)
}

/// Drives a [`Link`]: chunked writes with per-chunk retries, chunked reads and
/// the full configuration upload.
#[derive(Debug)]
pub struct Uploader<L> {
    link: L,
    codec: Codec,
    base_address: u32,
    chunk_words: usize,
    retries: usize,
}

impl<L: Link> Uploader<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            codec: Codec::default(),
            base_address: STATIC_CONFIG_BASE,
            chunk_words: MAX_PAYLOAD_WORDS,
            retries: DEFAULT_RETRIES,
        }
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_base_address(mut self, address: u32) -> Self {
        self.base_address = address;
        self
    }

    /// Payload words per message, at most [`MAX_PAYLOAD_WORDS`].
    pub fn with_chunk_words(mut self, words: usize) -> Self {
        self.chunk_words = words;
        self
    }

    /// Extra attempts for a chunk whose transfer failed.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    fn chunk_bytes(&self) -> Result<usize> {
        if self.chunk_words == 0 || self.chunk_words > MAX_PAYLOAD_WORDS {
            return Err(sja1105_config::Error::InvalidChunkSize(self.chunk_words * 4).into());
        }
        Ok(self.chunk_words * 4)
    }

    /// One transfer, repeated up to `retries` more times on link errors.
    fn transfer_with_retries(&mut self, address: u32, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        let attempts = self.retries + 1;
        let mut attempt = 1;

        loop {
            match self.link.transfer(tx, rx) {
                Ok(()) => return Ok(()),
                Err(source) if attempt >= attempts => {
                    return Err(Error::ChunkFailed {
                        address,
                        attempts,
                        source,
                    });
                }
                Err(e) => {
                    warn!(address, attempt, error = %e, "transfer failed, retrying");
                    attempt += 1;
                }
            }
        }
    }

    /// Writes `data` starting at word `address`, one message per chunk.
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        check_span(address, data.len())?;
        for piece in chunk::chunks(data, address, self.chunk_bytes()?)? {
            let mut tx = Vec::with_capacity(MessageHeader::SIZE + piece.data.len());
            tx.extend_from_slice(&MessageHeader::write(piece.address).pack()?);
            tx.extend_from_slice(piece.data);
            let mut rx = vec![0u8; tx.len()];

            self.transfer_with_retries(piece.address, &tx, &mut rx)?;
            debug!(address = piece.address, bytes = piece.data.len(), "wrote chunk");
        }

        Ok(())
    }

    /// Reads `len` bytes (a multiple of 4) starting at word `address`.
    pub fn read(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        if len % 4 != 0 {
            return Err(Error::InvalidReadCount(len));
        }
        check_span(address, len)?;

        let mut out = vec![0u8; len];
        let step = self.chunk_bytes()?;
        let mut at = 0;

        while at < len {
            let n = step.min(len - at);
            let word_address = address + (at / 4) as u32;

            let mut tx = vec![0u8; MessageHeader::SIZE + n];
            tx[..MessageHeader::SIZE]
                .copy_from_slice(&MessageHeader::read(word_address, n / 4).pack()?);
            let mut rx = vec![0u8; tx.len()];

            self.transfer_with_retries(word_address, &tx, &mut rx)?;
            out[at..at + n].copy_from_slice(&rx[MessageHeader::SIZE..]);
            debug!(address = word_address, bytes = n, "read chunk");

            at += n;
        }

        Ok(out)
    }

    /// Raw value of the device id register.
    pub fn read_device_id(&mut self) -> Result<u32> {
        let word = self.read(DEVICE_ID_ADDRESS, 4)?;
        Ok(bits::unpack(&word, 31, 0, self.codec.layout())? as u32)
    }

    /// Fails unless the device belongs to the same family as `expected`.
    pub fn check_device(&mut self, expected: DeviceId) -> Result<()> {
        let found = self.read_device_id()?;
        match DeviceId::try_from(found) {
            Ok(id) if id.family() == expected.family() => Ok(()),
            _ => Err(Error::DeviceMismatch { expected, found }),
        }
    }

    /// Probes the device, then validates, packs and writes `config` to the
    /// static configuration area. Returns the image that was sent.
    pub fn upload(&mut self, config: &StaticConfig) -> Result<Vec<u8>> {
        self.check_device(config.device_id())?;

        let image = prepare_for_upload(config, &self.codec)?;
        self.write(self.base_address, &image)?;

        info!(device = %config.device_id(), bytes = image.len(), "uploaded static config");
        Ok(image)
    }
}

/// Fails unless every word of a `len`-byte transfer at `address` is reachable
/// by a message header.
fn check_span(address: u32, len: usize) -> Result<()> {
    let words = len.div_ceil(4) as u64;
    if words > 0 && address as u64 + words - 1 > MAX_ADDRESS as u64 {
        return Err(Error::AddressOutOfRange(address));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{link::mock::MockLink, message::Access};
    use sja1105_config::{FINAL_HEADER_CRC_PLACEHOLDER, LayoutMode, TableKind};

    const MEMORY_WORDS: usize = STATIC_CONFIG_BASE as usize + 0x2000;

    fn device(id: DeviceId) -> MockLink {
        MockLink::new(MEMORY_WORDS).with_word(DEVICE_ID_ADDRESS, id.value())
    }

    #[test]
    fn test_prepare_patches_terminal_crc() {
        let config = StaticConfig::default_for(DeviceId::Sja1105T);
        let codec = Codec::default();

        let plain = codec.pack(&config).unwrap();
        let image = prepare_for_upload(&config, &codec).unwrap();
        let body = image.len() - 4;

        assert_eq!(image[..body], plain[..body]);
        let crc = crc32(&image[..body], codec.layout()).unwrap();
        assert_eq!(image[body..], crc.to_be_bytes());
        assert_ne!(crc, FINAL_HEADER_CRC_PLACEHOLDER);
    }

    #[test]
    fn test_prepare_rejects_invalid_config() {
        let mut config = StaticConfig::default_for(DeviceId::Sja1105E);
        config.clear(TableKind::MacConfig);
        assert!(matches!(
            prepare_for_upload(&config, &Codec::default()),
            Err(Error::Config(sja1105_config::Error::ConfigValidationFailure(_)))
        ));
    }

    #[test]
    fn test_upload_writes_image_in_chunks() {
        let config = StaticConfig::default_for(DeviceId::Sja1105QS);
        let mut uploader = Uploader::new(device(DeviceId::Sja1105QS));

        let image = uploader.upload(&config).unwrap();
        let link = uploader.into_inner();

        let at = STATIC_CONFIG_BASE as usize * 4;
        assert_eq!(link.memory[at..at + image.len()], image[..]);

        let writes: Vec<_> = link
            .transfers
            .iter()
            .filter(|header| header.access == Access::Write)
            .collect();
        assert_eq!(writes.len(), image.len().div_ceil(MAX_PAYLOAD_WORDS * 4));
        assert_eq!(writes[0].address, STATIC_CONFIG_BASE);
        assert_eq!(writes[1].address, STATIC_CONFIG_BASE + MAX_PAYLOAD_WORDS as u32);
    }

    #[test]
    fn test_upload_rejects_other_family() {
        let config = StaticConfig::default_for(DeviceId::Sja1105E);
        let mut uploader = Uploader::new(device(DeviceId::Sja1105QS));
        assert!(matches!(
            uploader.upload(&config),
            Err(Error::DeviceMismatch {
                expected: DeviceId::Sja1105E,
                found: 0xAE00_030E
            })
        ));
    }

    #[test]
    fn test_same_family_is_accepted() {
        let mut uploader = Uploader::new(device(DeviceId::Sja1105PR));
        uploader.check_device(DeviceId::Sja1105QS).unwrap();
    }

    #[test]
    fn test_chunk_retried() {
        let mut link = device(DeviceId::Sja1105T);
        link.fail_next = 2;
        let mut uploader = Uploader::new(link).with_retries(2);

        uploader.write(0x100, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(uploader.read(0x100, 8).unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_chunk_gives_up() {
        let mut link = device(DeviceId::Sja1105T);
        link.fail_next = 3;
        let mut uploader = Uploader::new(link).with_retries(2);

        assert!(matches!(
            uploader.write(0x100, &[0u8; 4]),
            Err(Error::ChunkFailed {
                address: 0x100,
                attempts: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_read_back_spans_chunks() {
        let data: Vec<u8> = (0..40).collect();
        let mut uploader = Uploader::new(device(DeviceId::Sja1105E)).with_chunk_words(4);

        uploader.write(0x200, &data).unwrap();
        assert_eq!(uploader.read(0x200, data.len()).unwrap(), data);

        let reads: Vec<_> = uploader
            .link()
            .transfers
            .iter()
            .filter(|header| header.access == Access::Read)
            .map(|header| (header.address, header.read_count))
            .collect();
        assert_eq!(reads, vec![(0x200, 4), (0x204, 4), (0x208, 2)]);
    }

    #[test]
    fn test_oversized_chunk_setting() {
        let mut uploader = Uploader::new(device(DeviceId::Sja1105E)).with_chunk_words(65);
        assert!(matches!(
            uploader.write(0, &[0u8; 4]),
            Err(Error::Config(sja1105_config::Error::InvalidChunkSize(260)))
        ));
    }

    #[test]
    fn test_custom_base_and_layout() {
        let config = StaticConfig::default_for(DeviceId::Sja1105E);
        let codec = Codec::new(LayoutMode::BIG_ENDIAN.with_little_endian(true));
        let link = MockLink::new(MEMORY_WORDS)
            .with_word(DEVICE_ID_ADDRESS, DeviceId::Sja1105E.value().swap_bytes());
        let mut uploader = Uploader::new(link).with_codec(codec).with_base_address(0x1000);

        let image = uploader.upload(&config).unwrap();
        assert_eq!(uploader.read(0x1000, image.len()).unwrap(), image);
        assert_eq!(codec.unpack(&image).unwrap(), config);
    }

    #[test]
    fn test_zero_chunk_words() {
        let mut uploader = Uploader::new(device(DeviceId::Sja1105E)).with_chunk_words(0);
        assert!(matches!(
            uploader.read(0, 8),
            Err(Error::Config(sja1105_config::Error::InvalidChunkSize(0)))
        ));
    }

    #[test]
    fn test_transfer_past_last_address() {
        let mut uploader = Uploader::new(device(DeviceId::Sja1105E)).with_chunk_words(1);

        assert!(matches!(
            uploader.read(u32::MAX, 8),
            Err(Error::AddressOutOfRange(u32::MAX))
        ));
        assert!(matches!(
            uploader.write(u32::MAX - 3, &[0u8; 16]),
            Err(Error::AddressOutOfRange(_))
        ));
        assert!(matches!(
            uploader.read(MAX_ADDRESS, 8),
            Err(Error::AddressOutOfRange(MAX_ADDRESS))
        ));
        assert!(uploader.link().transfers.is_empty());
    }

    #[test]
    fn test_read_device_id() {
        let mut uploader = Uploader::new(device(DeviceId::Sja1105T));
        assert_eq!(uploader.read_device_id().unwrap(), 0x9E00_030E);
    }
}
