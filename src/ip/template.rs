//! Base images the header and logo are written over

use super::constants::{HEADER_SIZE, IP_SIZE};
use super::crc::update_crc;
use super::registry::FieldRegistry;
use crate::exceptions::{MakeipError, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Release date baked into the built-in template's header
const BUILTIN_RELEASE_DATE: &str = "20000627";

/// Built-in base image.
///
/// The console boot code is not redistributed here, so past the meta header
/// the image is zero-filled; pass an external `IP.TMPL` to get a bootable
/// image. The header carries the default field values and a valid checksum.
pub fn default_template() -> Vec<u8> {
    let mut ip = vec![0u8; IP_SIZE];
    let registry = FieldRegistry::with_release_date(BUILTIN_RELEASE_DATE);
    registry.render_into(&mut ip[..HEADER_SIZE]);
    update_crc(&mut ip);
    ip
}

/// Check that `data` can serve as a base image
pub fn validate_template(data: &[u8]) -> Result<()> {
    if data.len() != IP_SIZE {
        return Err(MakeipError::InvalidFormat(format!(
            "bootstrap template must be exactly {IP_SIZE} bytes, got {}",
            data.len()
        )));
    }
    Ok(())
}

/// Load an external base image (usually `IP.TMPL`)
pub fn load_template(path: &Path) -> Result<Vec<u8>> {
    info!("loading bootstrap template \"{}\"", path.display());
    let data = fs::read(path).map_err(|e| MakeipError::file(path, e))?;
    validate_template(&data)?;
    debug!("template loaded: {} bytes", data.len());
    Ok(data)
}
