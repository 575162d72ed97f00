//! Decode/encode entry points (request builders).

mod decode;
mod encode;

use alloc::vec::Vec;

use enough::Stop;

use crate::error::RasterError;
use crate::layout::LayoutDescriptor;
use crate::limits::Limits;
use crate::palette::Palette;
use crate::raster::RasterView;

/// Decode a byte window into an RGBA raster.
///
/// ```no_run
/// use retroraster::{DecodeRequest, LayoutDescriptor, Palette, Unstoppable};
///
/// let data: &[u8] = &[]; // your raw bytes
/// let layout = LayoutDescriptor::packed(256, 192, 1)?;
/// let palette = Palette::new();
///
/// let raster = DecodeRequest::new(data, &layout)
///     .with_palette(&palette)
///     .decode(Unstoppable)?;
/// # Ok::<(), retroraster::RasterError>(())
/// ```
#[derive(Clone, Copy)]
pub struct DecodeRequest<'a> {
    source: &'a [u8],
    descriptor: &'a LayoutDescriptor,
    palette: Option<&'a Palette>,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(source: &'a [u8], descriptor: &'a LayoutDescriptor) -> Self {
        Self {
            source,
            descriptor,
            palette: None,
            limits: None,
        }
    }

    /// Palette for indexed layouts. Without one, every index resolves to the
    /// fallback color.
    pub fn with_palette(mut self, palette: &'a Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Run the decode. Fails with `OutOfRange` when the computed byte span
    /// exceeds the source, leaving no state behind.
    pub fn decode(self, stop: impl Stop) -> Result<RasterView, RasterError> {
        decode::decode_raster(self.source, self.descriptor, self.palette, self.limits, &stop)
    }
}

/// Encode an RGBA raster back into the raw byte layout.
#[derive(Clone, Copy)]
pub struct EncodeRequest<'a> {
    descriptor: &'a LayoutDescriptor,
    palette: Option<&'a Palette>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(descriptor: &'a LayoutDescriptor) -> Self {
        Self {
            descriptor,
            palette: None,
        }
    }

    /// Palette for indexed targets. Without one, every pixel encodes as
    /// index 0.
    pub fn with_palette(mut self, palette: &'a Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Run the encode. The output covers exactly one frame
    /// (`stride * height` bytes); the descriptor's byte offset is not
    /// included.
    pub fn encode(self, raster: &RasterView, stop: impl Stop) -> Result<Vec<u8>, RasterError> {
        encode::encode_raster(raster, self.descriptor, self.palette, &stop)
    }
}
