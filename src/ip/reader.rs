// makeip/src/ip/reader.rs
// Inspection of an existing bootstrap image

use super::constants::IP_SIZE;
use super::crc::{format_crc, header_crc, stored_crc};
use super::fields::FieldKind;
use super::registry::FieldRegistry;
use crate::exceptions::Result;
use crate::mr;
use log::{debug, warn};
use serde::Serialize;

/// One header field as found in the image
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub offset: usize,
    pub length: usize,
    pub value: String,
}

/// Embedded boot logo summary
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogoInfo {
    pub width: u32,
    pub height: u32,
    pub colors: usize,
    pub size: usize,
    pub oversize: bool,
}

/// Everything `ipinfo` reports about an image
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapInfo {
    pub size: usize,
    pub fields: Vec<FieldInfo>,
    pub stored_checksum: String,
    pub computed_checksum: String,
    pub checksum_valid: bool,
    pub logo: Option<LogoInfo>,
    #[serde(skip)]
    registry: FieldRegistry,
}

impl BootstrapInfo {
    /// Field values, for re-emitting as a text template
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Value of one field by kind
    pub fn field(&self, kind: FieldKind) -> &str {
        &self.fields[kind.index()].value
    }
}

/// Read header fields, checksum state and logo details out of an image
pub fn inspect_bootstrap(ip: &[u8]) -> Result<BootstrapInfo> {
    let registry = FieldRegistry::read_from(ip)?;

    let fields = FieldKind::ALL
        .iter()
        .map(|kind| {
            let descriptor = kind.descriptor();
            FieldInfo {
                name: descriptor.name,
                offset: descriptor.offset,
                length: descriptor.length,
                value: registry.get_pretty(*kind).to_string(),
            }
        })
        .collect();

    let stored_checksum = String::from_utf8_lossy(stored_crc(ip)).into_owned();
    let computed_checksum = format_crc(header_crc(ip));
    let checksum_valid = stored_checksum == computed_checksum;
    if !checksum_valid {
        warn!("stored checksum {stored_checksum:?} does not match computed {computed_checksum}");
    }

    let logo = match mr::extract(ip) {
        Ok(Some(image)) => Some(LogoInfo {
            width: image.width,
            height: image.height,
            colors: image.palette.len(),
            size: image.size,
            oversize: image.size > super::constants::LOGO_MAX_SIZE,
        }),
        Ok(None) => None,
        Err(e) => {
            warn!("logo region starts with MR magic but is unreadable: {e}");
            None
        }
    };

    debug!(
        "inspected {IP_SIZE} byte bootstrap, checksum {}, logo {}",
        if checksum_valid { "ok" } else { "bad" },
        if logo.is_some() { "present" } else { "absent" }
    );

    Ok(BootstrapInfo {
        size: ip.len(),
        fields,
        stored_checksum,
        computed_checksum,
        checksum_valid,
        logo,
        registry,
    })
}
