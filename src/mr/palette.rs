//! RGBA rasters and palette indexing

use crate::exceptions::{MakeipError, Result};
use log::{debug, trace};

/// Most colors an MR palette can hold
pub const MAX_COLORS: usize = 128;

/// Uncompressed RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel
    pub rgba: Vec<u8>,
}

impl Raster {
    /// Wrap an RGBA buffer, checking its length against the dimensions
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MakeipError::InvalidFormat(format!(
                "raster {width}x{height} needs {expected} RGBA bytes, got {}",
                rgba.len()
            )));
        }
        Ok(Raster {
            width,
            height,
            rgba,
        })
    }

    /// Decode PNG bytes into a raster
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("decoded PNG {width}x{height}");
        Raster::new(width, height, rgba.into_raw())
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or_else(|| MakeipError::ImageError("raster buffer too small".to_string()))?;
        let mut out = std::io::Cursor::new(Vec::new());
        image.write_to(&mut out, image::ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Ordered palette, first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit colors; more than `MAX_COLORS` is an error
    pub fn from_colors(colors: Vec<Color>) -> Result<Self> {
        if colors.len() > MAX_COLORS {
            return Err(MakeipError::PaletteOverflow { limit: MAX_COLORS });
        }
        Ok(Palette { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Color> {
        self.colors.get(index as usize).copied()
    }

    /// Index of `color`, adding it if unseen.
    ///
    /// Linear scan, first match wins.
    fn index_of_or_insert(&mut self, color: Color) -> Result<u8> {
        if let Some(index) = self.colors.iter().position(|c| *c == color) {
            return Ok(index as u8);
        }
        if self.colors.len() >= MAX_COLORS {
            return Err(MakeipError::PaletteOverflow { limit: MAX_COLORS });
        }
        self.colors.push(color);
        Ok((self.colors.len() - 1) as u8)
    }
}

/// Raster reduced to palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    /// One index per pixel, row-major, each below 128
    pub indices: Vec<u8>,
}

/// Assign every pixel a palette index, scanning left to right, top to
/// bottom. Alpha is ignored. No color reduction is attempted: a 129th
/// distinct color fails with `PaletteOverflow`.
pub fn build_palette(raster: &Raster) -> Result<IndexedImage> {
    let mut palette = Palette::new();
    let mut indices = Vec::with_capacity(raster.pixel_count());

    for pixel in raster.rgba.chunks_exact(4) {
        let color = Color {
            r: pixel[0],
            g: pixel[1],
            b: pixel[2],
        };
        indices.push(palette.index_of_or_insert(color)?);
    }

    trace!("palette built: {} colors for {} pixels", palette.len(), indices.len());
    Ok(IndexedImage {
        width: raster.width,
        height: raster.height,
        palette,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster_from_colors(width: u32, height: u32, colors: &[[u8; 3]]) -> Raster {
        let rgba = colors
            .iter()
            .flat_map(|c| [c[0], c[1], c[2], 0xFF])
            .collect();
        Raster::new(width, height, rgba).unwrap()
    }

    #[test]
    fn test_raster_length_checked() {
        assert!(Raster::new(2, 2, vec![0; 16]).is_ok());
        assert!(Raster::new(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_first_seen_order() {
        let red = [255, 0, 0];
        let green = [0, 255, 0];
        let blue = [0, 0, 255];
        let raster = raster_from_colors(5, 1, &[green, red, green, blue, red]);
        let indexed = build_palette(&raster).unwrap();

        assert_eq!(indexed.indices, vec![0, 1, 0, 2, 1]);
        assert_eq!(indexed.palette.len(), 3);
        assert_eq!(indexed.palette.get(0), Some(Color { r: 0, g: 255, b: 0 }));
        assert_eq!(indexed.palette.get(2), Some(Color { r: 0, g: 0, b: 255 }));
    }

    #[test]
    fn test_alpha_ignored() {
        let raster = Raster::new(2, 1, vec![10, 20, 30, 0, 10, 20, 30, 255]).unwrap();
        let indexed = build_palette(&raster).unwrap();
        assert_eq!(indexed.palette.len(), 1);
        assert_eq!(indexed.indices, vec![0, 0]);
    }

    #[test]
    fn test_exactly_128_colors_fit() {
        let colors: Vec<[u8; 3]> = (0..128u8).map(|i| [i, 0, 0]).collect();
        let raster = raster_from_colors(128, 1, &colors);
        let indexed = build_palette(&raster).unwrap();
        assert_eq!(indexed.palette.len(), MAX_COLORS);
        assert_eq!(indexed.indices[127], 127);
    }

    #[test]
    fn test_129_colors_overflow() {
        let colors: Vec<[u8; 3]> = (0..129u16).map(|i| [(i % 256) as u8, (i / 256) as u8, 7]).collect();
        let raster = raster_from_colors(129, 1, &colors);
        let err = build_palette(&raster).unwrap_err();
        assert!(matches!(err, MakeipError::PaletteOverflow { limit: 128 }));
    }

    #[test]
    fn test_png_round_trip_through_image_crate() {
        let raster = raster_from_colors(2, 2, &[[1, 2, 3], [4, 5, 6], [7, 8, 9], [1, 2, 3]]);
        let png = raster.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = Raster::decode_png(&png).unwrap();
        assert_eq!(decoded, raster);
    }
}
