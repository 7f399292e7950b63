//! High-level API for makeip operations

use crate::exceptions::{MakeipError, Result};
use crate::ip::builder::{BootstrapBuilder, write_output};
use crate::ip::fields::FieldKind;
use crate::ip::reader::{BootstrapInfo, inspect_bootstrap};
use crate::ip::template::load_template;
use crate::mr::{self, MrLogo};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for building a bootstrap
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// `ip.txt` style text template, applied first
    pub text_template: Option<PathBuf>,
    /// External 32768-byte base image instead of the built-in one
    pub base_template: Option<PathBuf>,
    /// Logo image (MR or PNG)
    pub logo: Option<PathBuf>,
    /// Direct field values; these win over the text template
    pub overrides: Vec<(FieldKind, String)>,
    /// Replace an existing output file
    pub overwrite: bool,
}

/// Build a bootstrap image and write it to `output`
pub fn build_bootstrap(output: &Path, options: BuildOptions) -> Result<()> {
    info!("🔨 building bootstrap {:?}", output);

    let mut builder = match &options.base_template {
        Some(path) => BootstrapBuilder::with_template(load_template(path)?)?,
        None => BootstrapBuilder::new(),
    };

    if let Some(path) = &options.text_template {
        info!("reading text template \"{}\"", path.display());
        let source = fs::read_to_string(path).map_err(|e| MakeipError::file(path, e))?;
        builder.apply_text_template(&source)?;
    }

    for (kind, value) in &options.overrides {
        builder.set_field(*kind, value);
    }

    if let Some(path) = &options.logo {
        builder.set_logo(mr::load_file(path)?);
    }

    let bootstrap = builder.finalize()?;
    bootstrap.write_to(output, options.overwrite)?;
    debug!("✅ bootstrap written");
    Ok(())
}

/// Convert a logo image to MR and save it without building a bootstrap
pub fn export_logo(input: &Path, output: &Path, overwrite: bool) -> Result<MrLogo> {
    let logo = mr::load_file(input)?;
    info!("writing MR logo to \"{}\" ({} bytes)", output.display(), logo.len());
    write_output(output, logo.as_bytes(), overwrite)?;
    Ok(logo)
}

/// Read a bootstrap file and describe it
pub fn inspect_bootstrap_file(path: &Path) -> Result<BootstrapInfo> {
    let data = fs::read(path).map_err(|e| MakeipError::file(path, e))?;
    inspect_bootstrap(&data)
}

/// Save the MR container embedded in a bootstrap file
pub fn extract_logo(input: &Path, output: &Path, overwrite: bool) -> Result<()> {
    let data = fs::read(input).map_err(|e| MakeipError::file(input, e))?;
    let image = embedded_logo(&data, input)?;
    let start = crate::ip::constants::LOGO_OFFSET;
    write_output(output, &data[start..start + image.size], overwrite)
}

/// Decode the MR logo embedded in a bootstrap file and save it as PNG
pub fn extract_logo_png(input: &Path, output: &Path, overwrite: bool) -> Result<()> {
    let data = fs::read(input).map_err(|e| MakeipError::file(input, e))?;
    let image = embedded_logo(&data, input)?;
    let png = image.to_raster()?.encode_png()?;
    write_output(output, &png, overwrite)
}

fn embedded_logo(data: &[u8], input: &Path) -> Result<mr::MrImage> {
    mr::extract(data)?.ok_or_else(|| {
        MakeipError::InvalidFormat(format!("no MR logo embedded in \"{}\"", input.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::constants::IP_SIZE;
    use crate::mr::Raster;
    use tempfile::TempDir;

    fn write_png(dir: &Path) -> PathBuf {
        let raster = Raster::new(4, 1, [[10, 20, 30, 255], [10, 20, 30, 255], [0, 0, 0, 255], [1, 1, 1, 255]].concat())
            .unwrap();
        let path = dir.join("logo.png");
        fs::write(&path, raster.encode_png().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_build_with_text_template_and_overrides() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("ip.txt");
        fs::write(&txt, "Game Title: FROM TEXT\nProduct No: T-12345\n").unwrap();
        let out = dir.path().join("IP.BIN");

        let options = BuildOptions {
            text_template: Some(txt),
            logo: Some(write_png(dir.path())),
            overrides: vec![(FieldKind::GameTitle, "FROM FLAG".to_string())],
            ..Default::default()
        };
        build_bootstrap(&out, options).unwrap();

        let info = inspect_bootstrap_file(&out).unwrap();
        assert_eq!(info.size, IP_SIZE);
        assert_eq!(info.field(FieldKind::GameTitle), "FROM FLAG");
        assert_eq!(info.field(FieldKind::ProductNo), "T-12345");
        assert!(info.checksum_valid);
        assert_eq!(info.logo.unwrap().width, 4);
    }

    #[test]
    fn test_field_errors_write_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("IP.BIN");
        let options = BuildOptions {
            overrides: vec![
                (FieldKind::Version, "bad".to_string()),
                (FieldKind::ReleaseDate, "2024".to_string()),
            ],
            ..Default::default()
        };

        let err = build_bootstrap(&out, options).unwrap_err();
        match err {
            MakeipError::FieldErrors(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error {other}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_existing_output_refused_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("IP.BIN");
        fs::write(&out, b"keep me").unwrap();

        let err = build_bootstrap(&out, BuildOptions::default()).unwrap_err();
        assert!(matches!(err, MakeipError::OutputExists(_)));
        assert_eq!(fs::read(&out).unwrap(), b"keep me");

        let options = BuildOptions {
            overwrite: true,
            ..Default::default()
        };
        build_bootstrap(&out, options).unwrap();
        assert_eq!(fs::read(&out).unwrap().len(), IP_SIZE);
    }

    #[test]
    fn test_bad_base_template() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("IP.TMPL");
        fs::write(&tmpl, [0u8; 10]).unwrap();
        let options = BuildOptions {
            base_template: Some(tmpl),
            ..Default::default()
        };
        let err = build_bootstrap(&dir.path().join("IP.BIN"), options).unwrap_err();
        assert!(matches!(err, MakeipError::InvalidFormat(_)));
    }

    #[test]
    fn test_build_on_external_template() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("IP.TMPL");
        fs::write(&tmpl, vec![0x33u8; IP_SIZE]).unwrap();
        let out = dir.path().join("IP.BIN");
        let options = BuildOptions {
            base_template: Some(tmpl),
            ..Default::default()
        };
        build_bootstrap(&out, options).unwrap();

        let data = fs::read(&out).unwrap();
        assert_eq!(&data[..16], b"SEGA SEGAKATANA ");
        assert_eq!(data[0x100], 0x33);
        assert!(inspect_bootstrap_file(&out).unwrap().checksum_valid);
    }

    #[test]
    fn test_export_refuses_logo_larger_than_screen() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("wide.png");
        let raster = Raster::new(321, 1, vec![0u8; 321 * 4]).unwrap();
        fs::write(&png, raster.encode_png().unwrap()).unwrap();
        let mr_out = dir.path().join("wide.mr");

        let err = export_logo(&png, &mr_out, false).unwrap_err();
        assert!(matches!(err, MakeipError::LogoTooLarge { width: 321, .. }));
        assert!(!mr_out.exists());
    }

    #[test]
    fn test_export_and_extract_logo() {
        let dir = TempDir::new().unwrap();
        let png = write_png(dir.path());
        let mr_out = dir.path().join("logo.mr");
        let logo = export_logo(&png, &mr_out, false).unwrap();
        assert_eq!(fs::read(&mr_out).unwrap(), logo.as_bytes());

        let ip = dir.path().join("IP.BIN");
        let options = BuildOptions {
            logo: Some(mr_out.clone()),
            ..Default::default()
        };
        build_bootstrap(&ip, options).unwrap();

        let extracted = dir.path().join("extracted.mr");
        extract_logo(&ip, &extracted, false).unwrap();
        assert_eq!(fs::read(&extracted).unwrap(), logo.as_bytes());

        let extracted_png = dir.path().join("extracted.png");
        extract_logo_png(&ip, &extracted_png, false).unwrap();
        let raster = Raster::decode_png(&fs::read(&extracted_png).unwrap()).unwrap();
        assert_eq!((raster.width, raster.height), (4, 1));
    }

    #[test]
    fn test_extract_without_logo() {
        let dir = TempDir::new().unwrap();
        let ip = dir.path().join("IP.BIN");
        build_bootstrap(&ip, BuildOptions::default()).unwrap();
        assert!(extract_logo(&ip, &dir.path().join("x.mr"), false).is_err());
    }
}
