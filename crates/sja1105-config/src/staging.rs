//! The staging area: a packed image stored byte for byte in a file.

use std::{fs, path::Path};

use tracing::debug;

use crate::{config::StaticConfig, errors::Result};

/// Reads and unpacks the image stored at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<StaticConfig> {
    let path = path.as_ref();
    let image = fs::read(path)?;
    debug!(path = %path.display(), bytes = image.len(), "loaded staging area");

    StaticConfig::unpack(&image)
}

/// Packs `config` and writes the image to `path`, replacing any previous content.
///
/// The configuration is not validated; an incomplete one can be staged and
/// finished later.
pub fn save(config: &StaticConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let image = config.pack()?;
    fs::write(path, &image)?;
    debug!(path = %path.display(), bytes = image.len(), "saved staging area");

    Ok(())
}
