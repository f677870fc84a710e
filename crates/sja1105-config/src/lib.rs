//! # sja1105-config
//!
//! Codec for the static configuration image of the NXP SJA1105 family of
//! automotive Ethernet switches.
//!
//! Tables are plain structs described by declarative bit-field lists, one per
//! device family. The image framer packs every non-empty table in canonical
//! order with a header and two CRCs, and unpacks images back into tables. A
//! chunk splitter cuts the result into word-addressed pieces for the link.
//!
//! ## Example
//!
//! ```
//! use sja1105_config::{DeviceId, StaticConfig, TableKind, chunk};
//!
//! let mut config = StaticConfig::default_for(DeviceId::Sja1105T);
//! config.set_field(TableKind::MacConfig, 0, "vlanid", 100).unwrap();
//!
//! let image = config.pack().unwrap();
//! let back = StaticConfig::unpack(&image).unwrap();
//! assert_eq!(back.get_field(TableKind::MacConfig, 0, "vlanid").unwrap(), 100);
//!
//! let pieces = chunk::split(&image, 0x20000, 256).unwrap();
//! assert_eq!(pieces.iter().map(|c| c.data.len()).sum::<usize>(), image.len());
//! ```

pub mod bits;
pub mod chunk;
pub mod codec;
pub mod config;
pub mod crc;
pub mod defaults;
pub mod device;
pub mod errors;
pub mod field;
pub mod header;
pub mod layout;
pub mod staging;
pub mod tables;
pub mod validate;

pub use config::{Codec, FINAL_HEADER_CRC_PLACEHOLDER, StaticConfig};
pub use device::{DeviceId, Family};
pub use errors::{Error, Result, ValidationError, Warning};
pub use layout::LayoutMode;
pub use tables::{Entry, TableKind};
