// makeip/src/mr/detect.rs
// Logo input format detection from magic bytes

use crate::exceptions::{MakeipError, Result};
use log::trace;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes inspected by detection
pub const DETECT_SIZE: usize = 4;

const MR_MAGIC: &[u8] = b"MR"; // at offset 0
const PNG_MAGIC: &[u8] = b"PNG"; // at offset 1, after the 0x89 marker

/// Input formats accepted for the boot logo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Ready-made MR container, used verbatim
    Mr,
    /// PNG raster, converted to MR
    Png,
    /// Readable but not a format we handle
    Unsupported,
}

/// Human readable list of accepted formats
pub const SUPPORTED_FORMATS: &str = "MR; PNG";

/// Detect the format from the first bytes of a file
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    if bytes.len() < DETECT_SIZE {
        return Err(MakeipError::InvalidFormat(format!(
            "need at least {DETECT_SIZE} bytes to detect image format, got {}",
            bytes.len()
        )));
    }

    let format = if &bytes[0..2] == MR_MAGIC {
        ImageFormat::Mr
    } else if &bytes[1..4] == PNG_MAGIC {
        ImageFormat::Png
    } else {
        ImageFormat::Unsupported
    };
    trace!("detected image format {:?} from {:02x?}", format, &bytes[..DETECT_SIZE]);
    Ok(format)
}

/// Detect the format of a file on disk, reading only its first bytes
pub fn detect_file_format(path: &Path) -> Result<ImageFormat> {
    let file = File::open(path).map_err(|e| MakeipError::file(path, e))?;
    let mut head = Vec::with_capacity(DETECT_SIZE);
    file.take(DETECT_SIZE as u64)
        .read_to_end(&mut head)
        .map_err(|e| MakeipError::file(path, e))?;
    detect_format(&head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_mr() {
        assert_eq!(detect_format(b"MR\x10\x00\x00\x00").unwrap(), ImageFormat::Mr);
    }

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_format(b"\x89PNG\r\n\x1a\n").unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_detect_unsupported() {
        assert_eq!(detect_format(b"GIF89a").unwrap(), ImageFormat::Unsupported);
        assert_eq!(detect_format(b"\xff\xd8\xff\xe0").unwrap(), ImageFormat::Unsupported);
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format(b"MR\x00"),
            Err(MakeipError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_detect_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\x89PNG\r\n\x1a\n rest of file").unwrap();
        assert_eq!(detect_file_format(file.path()).unwrap(), ImageFormat::Png);

        let empty = NamedTempFile::new().unwrap();
        assert!(detect_file_format(empty.path()).is_err());
    }
}
