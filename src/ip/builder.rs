//! Bootstrap assembler
//!
//! Init: start from a base image. Populate: apply text template, field
//! overrides and logo. Finalize: render, inject, checksum. `finalize`
//! consumes the builder, so a finished image cannot be populated again.

use super::crc::update_crc;
use super::fields::FieldKind;
use super::registry::FieldRegistry;
use super::template::{default_template, validate_template};
use crate::exceptions::{MakeipError, Result};
use crate::mr::{self, MrLogo};
use log::{debug, error, info, trace};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Bootstrap under construction
#[derive(Debug)]
pub struct BootstrapBuilder {
    ip: Vec<u8>,
    registry: FieldRegistry,
    logo: Option<MrLogo>,
    errors: Vec<MakeipError>,
}

impl Default for BootstrapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapBuilder {
    /// Start from the built-in template with default field values
    pub fn new() -> Self {
        Self::from_parts(default_template(), FieldRegistry::new())
    }

    /// Start from an external base image
    pub fn with_template(template: Vec<u8>) -> Result<Self> {
        validate_template(&template)?;
        Ok(Self::from_parts(template, FieldRegistry::new()))
    }

    /// Start from a base image and an explicit registry
    pub fn from_parts(template: Vec<u8>, registry: FieldRegistry) -> Self {
        trace!("📦 bootstrap builder initialised ({} byte base)", template.len());
        BootstrapBuilder {
            ip: template,
            registry,
            logo: None,
            errors: Vec::new(),
        }
    }

    /// Apply a text template. Syntax errors are returned immediately;
    /// rejected values are kept for `finalize` to report.
    pub fn apply_text_template(&mut self, source: &str) -> Result<&mut Self> {
        let failures = self.registry.load_from_text(source)?;
        for failure in failures {
            error!("{failure}");
            self.errors.push(failure);
        }
        Ok(self)
    }

    /// Set one field, recording a rejection instead of failing
    pub fn set_field(&mut self, kind: FieldKind, value: &str) -> &mut Self {
        if let Err(e) = self.registry.set(kind, value) {
            error!("{e}");
            self.errors.push(e);
        }
        self
    }

    /// Embed a logo at finalization
    pub fn set_logo(&mut self, logo: MrLogo) -> &mut Self {
        self.logo = Some(logo);
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Rejections collected so far
    pub fn errors(&self) -> &[MakeipError] {
        &self.errors
    }

    /// Render fields, inject the logo and recompute the checksum.
    ///
    /// Refuses to render while any rejection is pending, including one
    /// recorded on a registry handed in through `from_parts`.
    pub fn finalize(mut self) -> Result<Bootstrap> {
        if self.errors.is_empty() && self.registry.is_erroneous() {
            self.errors.push(MakeipError::Generic(
                "field registry holds a rejected value".to_string(),
            ));
        }
        if !self.errors.is_empty() {
            return Err(MakeipError::FieldErrors(self.errors));
        }
        validate_template(&self.ip)?;

        self.registry.render_into(&mut self.ip);
        if let Some(logo) = &self.logo {
            mr::inject(&mut self.ip, logo.as_bytes())?;
        }
        update_crc(&mut self.ip);

        debug!("✅ bootstrap finalized");
        Ok(Bootstrap {
            data: self.ip,
            registry: self.registry,
        })
    }
}

/// Finished bootstrap image
#[derive(Debug, Clone)]
pub struct Bootstrap {
    data: Vec<u8>,
    registry: FieldRegistry,
}

impl Bootstrap {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Field values the image was built from
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Write the image to `path`, refusing to replace an existing file
    /// unless `overwrite` is set
    pub fn write_to(&self, path: &Path, overwrite: bool) -> Result<()> {
        write_output(path, &self.data, overwrite)?;
        info!("writing bootstrap to \"{}\"", path.display());
        Ok(())
    }
}

/// Write `data` to `path`. Without `overwrite` the file is created
/// exclusively, so an existing output is never touched.
pub fn write_output(path: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            MakeipError::OutputExists(path.to_path_buf())
        } else {
            MakeipError::file(path, e)
        }
    })?;
    file.write_all(data).map_err(|e| MakeipError::file(path, e))?;
    trace!("wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::constants::{CRC_DATA_OFFSET, CRC_OFFSET, IP_SIZE, LOGO_OFFSET};
    use crate::ip::crc::{calc_crc, format_crc};
    use crate::ip::fields::FIELDS;
    use crate::mr::{Raster, encode_raster};
    use tempfile::TempDir;

    fn builder() -> BootstrapBuilder {
        BootstrapBuilder::from_parts(
            default_template(),
            FieldRegistry::with_release_date("20240229"),
        )
    }

    #[test]
    fn test_default_build() {
        let ip = builder().finalize().unwrap();
        let bytes = ip.as_bytes();

        assert_eq!(bytes.len(), IP_SIZE);
        assert_eq!(&bytes[0x60..0x70], b"1ST_READ.BIN    ");
        let crc = format_crc(calc_crc(&bytes[CRC_DATA_OFFSET..CRC_DATA_OFFSET + 16]));
        assert_eq!(&bytes[CRC_OFFSET..CRC_OFFSET + 4], crc.as_bytes());
        assert_eq!(&bytes[0x24..0x30], b" CD-ROM1/1  ");
    }

    #[test]
    fn test_direct_set_wins_over_text_template() {
        let mut b = builder();
        b.apply_text_template("Game Title: FROM FILE\nVersion: V1.100\n").unwrap();
        b.set_field(FieldKind::GameTitle, "FROM FLAG");
        let ip = b.finalize().unwrap();

        assert_eq!(ip.registry().get_raw(FieldKind::GameTitle), "FROM FLAG");
        assert_eq!(ip.registry().get_raw(FieldKind::Version), "V1.100");
        assert_eq!(&ip.as_bytes()[0x80..0x89], b"FROM FLAG");
    }

    #[test]
    fn test_errors_accumulate_and_abort() {
        let mut b = builder();
        b.set_field(FieldKind::Version, "1.0");
        b.set_field(FieldKind::Peripherals, "nope");
        b.set_field(FieldKind::GameTitle, "FINE");
        b.apply_text_template("Release Date: 20231332\n").unwrap();
        assert_eq!(b.errors().len(), 3);

        match b.finalize() {
            Err(MakeipError::FieldErrors(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_erroneous_registry_aborts() {
        let mut registry = FieldRegistry::with_release_date("20240229");
        assert!(registry.set(FieldKind::Version, "garbage").is_err());
        assert!(registry.is_erroneous());

        let b = BootstrapBuilder::from_parts(default_template(), registry);
        assert!(b.errors().is_empty());
        match b.finalize() {
            Err(MakeipError::FieldErrors(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_template_syntax_error_is_immediate() {
        let mut b = builder();
        assert!(matches!(
            b.apply_text_template("Nonsense line"),
            Err(MakeipError::MissingColon { line: 1 })
        ));
    }

    #[test]
    fn test_external_template_preserved_outside_fields() {
        let base = vec![0x11u8; IP_SIZE];
        let ip = BootstrapBuilder::with_template(base).unwrap().finalize().unwrap();
        let bytes = ip.as_bytes();
        assert_eq!(bytes[0x100], 0x11);
        assert_eq!(bytes[IP_SIZE - 1], 0x11);
        // Device Info is skipped: its first four bytes now hold the checksum
        for field in FIELDS.iter().filter(|f| f.kind != FieldKind::DeviceInfo) {
            assert_eq!(&bytes[field.range()], ip.registry().get(field.kind).as_bytes());
        }
        assert!(BootstrapBuilder::with_template(vec![0; 100]).is_err());
    }

    #[test]
    fn test_logo_injected() {
        let raster = Raster::new(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        let mr = encode_raster(&raster).unwrap();
        let mut b = builder();
        b.set_logo(MrLogo::from_bytes(mr.clone()).unwrap());
        let ip = b.finalize().unwrap();
        assert_eq!(&ip.as_bytes()[LOGO_OFFSET..LOGO_OFFSET + mr.len()], mr.as_slice());
        assert_eq!(ip.as_bytes().len(), IP_SIZE);
    }

    #[test]
    fn test_write_to_respects_overwrite() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("IP.BIN");
        let ip = builder().finalize().unwrap();

        ip.write_to(&out, false).unwrap();
        assert_eq!(std::fs::read(&out).unwrap().len(), IP_SIZE);

        let err = ip.write_to(&out, false).unwrap_err();
        assert!(matches!(err, MakeipError::OutputExists(_)));

        ip.write_to(&out, true).unwrap();
    }
}
