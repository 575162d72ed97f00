use alloc::vec::Vec;

use rgb::AsPixels as _;
use rgb::RGBA8;

/// Decoded RGBA raster plus its logical pixel size.
///
/// Produced fresh by every decode and never mutated afterwards; rows are
/// stored top-down, 4 bytes per pixel in R,G,B,A order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterView {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterView {
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Typed view of the pixel data.
    pub fn as_pixels(&self) -> &[RGBA8] {
        self.pixels.as_pixels()
    }

    /// Color at (x, y). Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> RGBA8 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.as_pixels()[y as usize * self.width as usize + x as usize]
    }

    /// Iterate scanlines as raw RGBA byte rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(self.width as usize * 4)
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, RGBA8> {
        imgref::ImgRef::new(self.as_pixels(), self.width as usize, self.height as usize)
    }
}
