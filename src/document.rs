//! Caller-owned document state: the loaded bytes, the current layout and the
//! palette, plus offset/size navigation. There is no global image state; a
//! `Document` is passed explicitly to whatever renders it.

use alloc::vec::Vec;

use enough::Stop;

use crate::codec::{DecodeRequest, EncodeRequest};
use crate::error::RasterError;
use crate::formats::{KnownFormat, zx_screen_to_indexed};
use crate::layout::LayoutDescriptor;
use crate::palette::Palette;
use crate::platform::Platform;
use crate::raster::RasterView;

/// One open byte source with its interpretation parameters.
#[derive(Clone, Debug)]
pub struct Document {
    data: Vec<u8>,
    layout: LayoutDescriptor,
    palette: Palette,
}

impl Document {
    /// Wrap raw bytes with an explicit starting layout and an all-black
    /// palette.
    pub fn new(data: Vec<u8>, layout: LayoutDescriptor) -> Self {
        Self {
            data,
            layout,
            palette: Palette::new(),
        }
    }

    /// Wrap raw bytes, auto-configuring from a recognized file format when
    /// possible and otherwise starting from the ZX Spectrum preset.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mut doc = Self::new(data, Platform::ZxSpectrum.descriptor());
        if let Some(p) = Platform::ZxSpectrum.default_palette() {
            doc.palette = p;
        }
        doc.adopt_known_format();
        doc
    }

    /// Probe the data for a known format; on a hit, switch layout, palette
    /// and byte offset to match. A ZX screen dump is de-interleaved into its
    /// indexed form in place.
    pub fn adopt_known_format(&mut self) -> Option<KnownFormat> {
        let format = KnownFormat::detect(&self.data)?;

        if format == KnownFormat::ZxSpectrumScreen {
            self.data = zx_screen_to_indexed(&self.data).ok()?;
        }
        if let Some(palette) = format.palette(&self.data) {
            self.palette = palette;
        }
        self.layout = format
            .descriptor()
            .with_byte_offset(format.data_offset())
            .ok()?;
        Some(format)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    /// Replace the layout wholesale (it is already validated by
    /// construction).
    pub fn set_layout(&mut self, layout: LayoutDescriptor) {
        self.layout = layout;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Swap in new bytes, keeping the layout but re-clamping the offset.
    pub fn replace_data(&mut self, data: Vec<u8>) -> Result<(), RasterError> {
        self.data = data;
        self.set_offset(self.layout.byte_offset())
    }

    /// Apply a platform preset, keeping the current byte offset.
    pub fn apply_platform(&mut self, platform: Platform) -> Result<(), RasterError> {
        let offset = self.layout.byte_offset();
        self.layout = platform.descriptor().with_byte_offset(offset)?;
        if let Some(palette) = platform.default_palette() {
            self.palette = palette;
        }
        self.set_offset(offset)
    }

    /// Decode the current byte window through the document's palette.
    pub fn decode(&self, stop: impl Stop) -> Result<RasterView, RasterError> {
        DecodeRequest::new(&self.data, &self.layout)
            .with_palette(&self.palette)
            .decode(stop)
    }

    /// Encode a raster back into the document's raw layout.
    pub fn encode_window(
        &self,
        raster: &RasterView,
        stop: impl Stop,
    ) -> Result<Vec<u8>, RasterError> {
        EncodeRequest::new(&self.layout)
            .with_palette(&self.palette)
            .encode(raster, stop)
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Largest offset that still leaves one full frame of data.
    fn max_offset(&self) -> usize {
        self.data.len().saturating_sub(self.layout.page_bytes())
    }

    /// Move to `offset`, clamped so the decode window stays in range.
    pub fn set_offset(&mut self, offset: usize) -> Result<(), RasterError> {
        self.layout = self.layout.with_byte_offset(offset.min(self.max_offset()))?;
        Ok(())
    }

    /// Advance one full frame.
    pub fn page_down(&mut self) -> Result<(), RasterError> {
        let step = self.layout.page_bytes();
        self.set_offset(self.layout.byte_offset().saturating_add(step))
    }

    /// Go back one full frame.
    pub fn page_up(&mut self) -> Result<(), RasterError> {
        let step = self.layout.page_bytes();
        self.set_offset(self.layout.byte_offset().saturating_sub(step))
    }

    /// Advance one scanline.
    pub fn line_down(&mut self) -> Result<(), RasterError> {
        let step = self.layout.stride();
        self.set_offset(self.layout.byte_offset().saturating_add(step))
    }

    /// Go back one scanline.
    pub fn line_up(&mut self) -> Result<(), RasterError> {
        let step = self.layout.stride();
        self.set_offset(self.layout.byte_offset().saturating_sub(step))
    }

    // ── Tile-aligned size adjustments ───────────────────────────────

    pub fn grow_width(&mut self) -> Result<(), RasterError> {
        let w = self.layout.width() + self.layout.delta_width();
        self.layout = self.layout.with_width(w)?;
        self.set_offset(self.layout.byte_offset())
    }

    /// Shrink by one width step; a no-op at the minimum width.
    pub fn shrink_width(&mut self) -> Result<(), RasterError> {
        let delta = self.layout.delta_width();
        if self.layout.width() > delta {
            self.layout = self.layout.with_width(self.layout.width() - delta)?;
        }
        self.set_offset(self.layout.byte_offset())
    }

    pub fn grow_height(&mut self) -> Result<(), RasterError> {
        let h = self.layout.height() + self.layout.delta_height();
        self.layout = self.layout.with_height(h)?;
        self.set_offset(self.layout.byte_offset())
    }

    /// Shrink by one height step; a no-op at the minimum height.
    pub fn shrink_height(&mut self) -> Result<(), RasterError> {
        let delta = self.layout.delta_height();
        if self.layout.height() > delta {
            self.layout = self.layout.with_height(self.layout.height() - delta)?;
        }
        self.set_offset(self.layout.byte_offset())
    }
}
