//! # sja1105-upload
//!
//! Moves a packed static configuration onto an SJA1105 switch over a
//! word-addressed command link. The link itself is supplied by the caller
//! through the [`Link`] trait; this crate frames messages, splits the image,
//! retries failed chunks and patches the whole-image CRC into the terminal
//! header before sending.
//!
//! ## Example
//!
//! ```
//! use std::io;
//!
//! use sja1105_config::{DeviceId, StaticConfig};
//! use sja1105_upload::{Link, Uploader};
//!
//! /// Answers every read with the SJA1105T id and swallows writes.
//! struct Loopback;
//!
//! impl Link for Loopback {
//!     fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> io::Result<()> {
//!         if tx[0] & 0x80 == 0 {
//!             rx[4..8].copy_from_slice(&DeviceId::Sja1105T.value().to_be_bytes());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let config = StaticConfig::default_for(DeviceId::Sja1105T);
//! let image = Uploader::new(Loopback).upload(&config).unwrap();
//! assert_eq!(StaticConfig::unpack(&image).unwrap(), config);
//! ```

pub mod errors;
pub mod link;
pub mod message;
pub mod upload;

pub use errors::{Error, Result};
pub use link::Link;
pub use message::{Access, MessageHeader};
pub use upload::{Uploader, prepare_for_upload};
