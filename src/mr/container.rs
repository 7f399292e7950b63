// makeip/src/mr/container.rs
// MR container: header, palette and compressed index stream
//
// Layout (all integers little-endian u32):
//   0x00  "MR"
//   0x02  total size
//   0x06  reserved (0)
//   0x0A  offset of compressed data (= 30 + colors * 4)
//   0x0E  width
//   0x12  height
//   0x16  reserved (0)
//   0x1A  color count
//   0x1E  palette: colors * (b, g, r, 0)
//   ....  compressed indices

use super::palette::{Color, IndexedImage, MAX_COLORS, Palette, Raster};
use super::rle::{compress, decompress};
use crate::exceptions::{MakeipError, Result};
use log::{debug, trace};

pub const MR_MAGIC: &[u8; 2] = b"MR";
pub const MR_HEADER_SIZE: usize = 2 + 7 * 4;
pub const PALETTE_ENTRY_SIZE: usize = 4;

/// Serialize a container
pub fn write_container(width: u32, height: u32, palette: &Palette, compressed: &[u8]) -> Vec<u8> {
    let offset = MR_HEADER_SIZE + palette.len() * PALETTE_ENTRY_SIZE;
    let size = offset + compressed.len();

    let mut out = Vec::with_capacity(size);
    out.extend_from_slice(MR_MAGIC);
    out.extend_from_slice(&(size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(offset as u32).to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes());

    for color in palette.colors() {
        out.extend_from_slice(&[color.b, color.g, color.r, 0]);
    }
    out.extend_from_slice(compressed);

    trace!(
        "MR container: {width}x{height}, {} colors, {} compressed bytes, {size} total",
        palette.len(),
        compressed.len()
    );
    out
}

/// Palette-index, compress and wrap a raster
pub fn encode_raster(raster: &Raster) -> Result<Vec<u8>> {
    let indexed = super::palette::build_palette(raster)?;
    Ok(encode_indexed(&indexed))
}

/// Compress and wrap an already indexed image
pub fn encode_indexed(image: &IndexedImage) -> Vec<u8> {
    let compressed = compress(&image.indices);
    debug!(
        "compressed {} indices into {} bytes",
        image.indices.len(),
        compressed.len()
    );
    write_container(image.width, image.height, &image.palette, &compressed)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parsed MR container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrImage {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    /// Compressed index stream
    pub data: Vec<u8>,
    /// Total container size from the header
    pub size: usize,
}

impl MrImage {
    /// Parse a container. Bytes past the header's total size are ignored,
    /// so a slice running to the end of a bootstrap image is accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MR_HEADER_SIZE {
            return Err(MakeipError::InvalidFormat(format!(
                "MR header needs {MR_HEADER_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        if &bytes[0..2] != MR_MAGIC {
            return Err(MakeipError::InvalidFormat("missing MR magic".to_string()));
        }

        let size = read_u32(bytes, 0x02) as usize;
        let offset = read_u32(bytes, 0x0A) as usize;
        let width = read_u32(bytes, 0x0E);
        let height = read_u32(bytes, 0x12);
        let colors = read_u32(bytes, 0x1A) as usize;

        if colors > MAX_COLORS {
            return Err(MakeipError::InvalidFormat(format!(
                "MR palette has {colors} colors, at most {MAX_COLORS} allowed"
            )));
        }
        let palette_end = MR_HEADER_SIZE + colors * PALETTE_ENTRY_SIZE;
        if offset < palette_end || offset > size {
            return Err(MakeipError::InvalidFormat(format!(
                "MR data offset {offset} outside {palette_end}..={size}"
            )));
        }
        if size > bytes.len() {
            return Err(MakeipError::InvalidFormat(format!(
                "MR size {size} exceeds the {} bytes available",
                bytes.len()
            )));
        }

        let palette = Palette::from_colors(
            bytes[MR_HEADER_SIZE..palette_end]
                .chunks_exact(PALETTE_ENTRY_SIZE)
                .map(|entry| Color {
                    b: entry[0],
                    g: entry[1],
                    r: entry[2],
                })
                .collect(),
        )?;

        Ok(MrImage {
            width,
            height,
            palette,
            data: bytes[offset..size].to_vec(),
            size,
        })
    }

    /// Decompress and expand palette entries into an opaque RGBA raster
    pub fn to_raster(&self) -> Result<Raster> {
        let pixels = self.width as usize * self.height as usize;
        let indices = decompress(&self.data)?;
        if indices.len() < pixels {
            return Err(MakeipError::InvalidFormat(format!(
                "MR data holds {} pixels, {}x{} needs {pixels}",
                indices.len(),
                self.width,
                self.height
            )));
        }

        let mut rgba = Vec::with_capacity(pixels * 4);
        for &index in &indices[..pixels] {
            let color = self.palette.get(index).ok_or_else(|| {
                MakeipError::InvalidFormat(format!(
                    "palette index {index} beyond {} colors",
                    self.palette.len()
                ))
            })?;
            rgba.extend_from_slice(&[color.r, color.g, color.b, 0xFF]);
        }
        Raster::new(self.width, self.height, rgba)
    }
}
