//! MR boot logo codec
//!
//! MR is the palettized, run-length compressed image format the boot ROM
//! displays from inside the bootstrap. This module converts PNG rasters to
//! MR, reads MR containers back, and moves them in and out of an image.

pub mod container;
pub mod detect;
pub mod palette;
pub mod rle;

pub use container::{MrImage, encode_raster};
pub use detect::{ImageFormat, detect_file_format, detect_format};
pub use palette::{Raster, build_palette};

use crate::exceptions::{MakeipError, Result};
use crate::ip::constants::{
    IP_SIZE, LOGO_MAX_HEIGHT, LOGO_MAX_SIZE, LOGO_MAX_WIDTH, LOGO_OFFSET,
};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// An MR container ready to be embedded or saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrLogo {
    data: Vec<u8>,
}

impl MrLogo {
    /// Wrap container bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(MakeipError::EmptyImage);
        }
        Ok(MrLogo { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Larger than the region reserved for it; embedding it will overwrite
    /// whatever follows the logo in the bootstrap
    pub fn is_oversize(&self) -> bool {
        self.data.len() > LOGO_MAX_SIZE
    }
}

/// Turn logo input bytes into an MR container.
///
/// MR input is taken verbatim, PNG input is decoded and converted. A PNG
/// larger than the boot screen is refused; an oversize result is only
/// warned about.
pub fn load(bytes: &[u8]) -> Result<MrLogo> {
    if bytes.is_empty() {
        return Err(MakeipError::EmptyImage);
    }

    let data = match detect_format(bytes)? {
        ImageFormat::Mr => {
            debug!("logo is already MR, using it verbatim");
            bytes.to_vec()
        }
        ImageFormat::Png => {
            debug!("logo is PNG, converting to MR");
            let raster = Raster::decode_png(bytes)?;
            check_dimensions(&raster)?;
            encode_raster(&raster)?
        }
        ImageFormat::Unsupported => {
            return Err(MakeipError::Unsupported(format!(
                "logo must be one of: {}",
                detect::SUPPORTED_FORMATS
            )));
        }
    };

    let logo = MrLogo::from_bytes(data)?;
    if logo.is_oversize() {
        warn!(
            "this image is {} bytes, larger than {LOGO_MAX_SIZE} bytes, and will corrupt a normal IP.BIN, inserting anyway!",
            logo.len()
        );
    }
    Ok(logo)
}

/// Refuse rasters wider than 320 or taller than 90 pixels
pub fn check_dimensions(raster: &Raster) -> Result<()> {
    if raster.width > LOGO_MAX_WIDTH || raster.height > LOGO_MAX_HEIGHT {
        return Err(MakeipError::LogoTooLarge {
            width: raster.width,
            height: raster.height,
            max_width: LOGO_MAX_WIDTH,
            max_height: LOGO_MAX_HEIGHT,
        });
    }
    Ok(())
}

/// Read and convert a logo file
pub fn load_file(path: &Path) -> Result<MrLogo> {
    info!("loading logo \"{}\"", path.display());
    let bytes = fs::read(path).map_err(|e| MakeipError::file(path, e))?;
    load(&bytes)
}

/// Copy a logo into the bootstrap at the logo offset.
///
/// Size is not checked against the reserved region; the logo only has to
/// end inside the image.
pub fn inject(ip: &mut [u8], logo: &[u8]) -> Result<()> {
    let end = LOGO_OFFSET + logo.len();
    if end > ip.len() {
        return Err(MakeipError::InvalidFormat(format!(
            "logo of {} bytes does not fit in a {IP_SIZE} byte bootstrap",
            logo.len()
        )));
    }
    ip[LOGO_OFFSET..end].copy_from_slice(logo);
    debug!("injected {} byte logo at {LOGO_OFFSET:#x}", logo.len());
    Ok(())
}

/// Find the logo embedded in a bootstrap, if any
pub fn extract(ip: &[u8]) -> Result<Option<MrImage>> {
    let Some(region) = ip.get(LOGO_OFFSET..) else {
        return Ok(None);
    };
    if !region.starts_with(container::MR_MAGIC) {
        return Ok(None);
    }
    MrImage::parse(region).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn checker_raster(width: u32, height: u32) -> Raster {
        let rgba = (0..width * height)
            .flat_map(|i| if i % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] })
            .collect();
        Raster::new(width, height, rgba).unwrap()
    }

    #[test]
    fn test_load_png_converts() {
        let raster = checker_raster(8, 4);
        let png = raster.encode_png().unwrap();
        let logo = load(&png).unwrap();

        assert_eq!(&logo.as_bytes()[..2], b"MR");
        let image = MrImage::parse(logo.as_bytes()).unwrap();
        assert_eq!(image.to_raster().unwrap(), raster);
    }

    #[test]
    fn test_load_mr_verbatim() {
        let mr = encode_raster(&checker_raster(4, 4)).unwrap();
        let logo = load(&mr).unwrap();
        assert_eq!(logo.as_bytes(), mr.as_slice());
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(load(&[]), Err(MakeipError::EmptyImage)));
        assert!(matches!(load(b"MR"), Err(MakeipError::InvalidFormat(_))));
        assert!(matches!(load(b"GIF89a..."), Err(MakeipError::Unsupported(_))));
    }

    #[test]
    fn test_load_png_with_too_many_colors() {
        let rgba = (0..200u32).flat_map(|i| [i as u8, 0, 0, 255]).collect();
        let raster = Raster::new(200, 1, rgba).unwrap();
        let png = raster.encode_png().unwrap();
        assert!(matches!(load(&png), Err(MakeipError::PaletteOverflow { .. })));
    }

    #[test]
    fn test_png_larger_than_boot_screen_refused() {
        for (width, height) in [(321, 1), (1, 91)] {
            let png = checker_raster(width, height).encode_png().unwrap();
            assert!(matches!(
                load(&png),
                Err(MakeipError::LogoTooLarge { max_width: 320, max_height: 90, .. })
            ));
        }
    }

    #[test]
    fn test_png_at_boot_screen_size_accepted() {
        let png = checker_raster(320, 90).encode_png().unwrap();
        let logo = load(&png).unwrap();
        assert!(logo.is_oversize());
    }

    #[test]
    fn test_oversize_is_flagged_not_fatal() {
        // alternating colors defeat the run-length coder
        let logo = load(&encode_raster(&checker_raster(320, 90)).unwrap()).unwrap();
        assert!(logo.is_oversize());
    }

    #[test]
    fn test_inject_and_extract() {
        let mut ip = vec![0u8; IP_SIZE];
        assert!(extract(&ip).unwrap().is_none());

        let mr = encode_raster(&checker_raster(16, 2)).unwrap();
        inject(&mut ip, &mr).unwrap();
        assert_eq!(&ip[LOGO_OFFSET..LOGO_OFFSET + mr.len()], mr.as_slice());

        let image = extract(&ip).unwrap().unwrap();
        assert_eq!(image.size, mr.len());
        assert_eq!(image.width, 16);
    }

    #[test]
    fn test_inject_past_end_fails() {
        let mut ip = vec![0u8; IP_SIZE];
        let huge = vec![0u8; IP_SIZE - LOGO_OFFSET + 1];
        assert!(inject(&mut ip, &huge).is_err());
        assert!(ip.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&encode_raster(&checker_raster(2, 2)).unwrap()).unwrap();
        assert!(load_file(file.path()).is_ok());
        assert!(matches!(
            load_file(Path::new("/nonexistent/logo.png")),
            Err(MakeipError::FileError { .. })
        ));
    }
}
