//! Software-defined pixel layout description.
//!
//! A [`LayoutDescriptor`] captures every parameter that defines how raw bytes
//! map to pixels: packed vs. bitplane-interleaved arrangement, bit depth,
//! 16-bit channel format, byte order, alpha/mask handling, tile geometry,
//! per-scanline padding and the current byte offset into the source.
//!
//! Descriptors are immutable values. Every `with_*` mutator returns a new,
//! re-validated descriptor or [`RasterError::InvalidLayout`], so a descriptor
//! in hand is always internally consistent.

use alloc::format;

use crate::error::RasterError;

/// Channel bit layout for 16-bit direct-color pixels.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 5-5-5 with the top bit unused.
    #[default]
    Rgb555,
    /// 5-6-5.
    Rgb565,
    /// 5-5-5-1, alpha in the low bit.
    Rgba555,
    /// 1-5-5-5, alpha in the high bit.
    Argb555,
}

impl PixelFormat {
    /// Whether this format carries an alpha bit.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba555 | Self::Argb555)
    }

    /// Unpack a 16-bit word into 8-bit RGBA channels.
    ///
    /// Formats without an alpha bit yield `a = 255`.
    pub fn unpack(self, word: u16) -> (u8, u8, u8, u8) {
        match self {
            Self::Rgb555 => {
                let r = scale5((word >> 10) & 0x1f);
                let g = scale5((word >> 5) & 0x1f);
                let b = scale5(word & 0x1f);
                (r, g, b, 255)
            }
            Self::Rgb565 => {
                let r = scale5((word >> 11) & 0x1f);
                let g = scale6((word >> 5) & 0x3f);
                let b = scale5(word & 0x1f);
                (r, g, b, 255)
            }
            Self::Rgba555 => {
                let r = scale5((word >> 11) & 0x1f);
                let g = scale5((word >> 6) & 0x1f);
                let b = scale5((word >> 1) & 0x1f);
                let a = if word & 1 != 0 { 255 } else { 0 };
                (r, g, b, a)
            }
            Self::Argb555 => {
                let r = scale5((word >> 10) & 0x1f);
                let g = scale5((word >> 5) & 0x1f);
                let b = scale5(word & 0x1f);
                let a = if word & 0x8000 != 0 { 255 } else { 0 };
                (r, g, b, a)
            }
        }
    }

    /// Requantize 8-bit RGBA channels into a 16-bit word. No dithering.
    pub fn pack(self, r: u8, g: u8, b: u8, a: u8) -> u16 {
        let r5 = u16::from(r >> 3);
        let g5 = u16::from(g >> 3);
        let b5 = u16::from(b >> 3);
        let abit = u16::from(a >= 128);
        match self {
            Self::Rgb555 => (r5 << 10) | (g5 << 5) | b5,
            Self::Rgb565 => (r5 << 11) | (u16::from(g >> 2) << 5) | b5,
            Self::Rgba555 => (r5 << 11) | (g5 << 6) | (b5 << 1) | abit,
            Self::Argb555 => (abit << 15) | (r5 << 10) | (g5 << 5) | b5,
        }
    }
}

fn scale5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

fn scale6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

/// Immutable description of how a byte window maps to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutDescriptor {
    width: u32,
    height: u32,
    /// 1 = packed/chunky; 2..=5 = bitplane-interleaved.
    plane_count: u32,
    /// Bits per pixel when packed; bits per plane word (8 or 16) when planar.
    bits_per_pixel: u32,
    pub(crate) pixel_format: PixelFormat,
    pub(crate) big_endian: bool,
    alpha_plane: bool,
    mask_plane: bool,
    tile_width: u32,
    tile_height: u32,
    padding: usize,
    pub(crate) aspect_ratio: f32,
    byte_offset: usize,
}

impl LayoutDescriptor {
    /// A packed layout with the given dimensions and bit depth.
    pub fn packed(width: u32, height: u32, bits_per_pixel: u32) -> Result<Self, RasterError> {
        Self::assemble(width, height, 1, bits_per_pixel).validated()
    }

    /// A bitplane-interleaved layout. `bits_per_plane` is 8 or 16.
    pub fn planar(
        width: u32,
        height: u32,
        plane_count: u32,
        bits_per_plane: u32,
    ) -> Result<Self, RasterError> {
        Self::assemble(width, height, plane_count, bits_per_plane).validated()
    }

    /// Assemble without validation; internal presets use this with known-good
    /// values, public constructors validate afterwards.
    pub(crate) fn assemble(
        width: u32,
        height: u32,
        plane_count: u32,
        bits_per_pixel: u32,
    ) -> Self {
        Self {
            width,
            height,
            plane_count,
            bits_per_pixel,
            pixel_format: PixelFormat::Rgb555,
            big_endian: false,
            alpha_plane: false,
            mask_plane: false,
            tile_width: 1,
            tile_height: 1,
            padding: 0,
            aspect_ratio: 1.0,
            byte_offset: 0,
        }
    }

    fn validated(self) -> Result<Self, RasterError> {
        self.validate()?;
        Ok(self)
    }

    /// Check every invariant. Descriptors built through the public API are
    /// already consistent; decode/encode re-check as part of their contract.
    pub fn validate(&self) -> Result<(), RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidLayout(format!(
                "size {}x{} must be positive",
                self.width, self.height
            )));
        }
        match self.plane_count {
            1 => {
                if !matches!(self.bits_per_pixel, 1 | 2 | 4 | 8 | 16 | 24) {
                    return Err(RasterError::InvalidLayout(format!(
                        "packed depth {} not in 1/2/4/8/16/24",
                        self.bits_per_pixel
                    )));
                }
            }
            2..=5 => {
                if !matches!(self.bits_per_pixel, 8 | 16) {
                    return Err(RasterError::InvalidLayout(format!(
                        "planar word size {} must be 8 or 16 bits",
                        self.bits_per_pixel
                    )));
                }
            }
            n => {
                return Err(RasterError::InvalidLayout(format!(
                    "plane count {n} not in 1..=5"
                )));
            }
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(RasterError::InvalidLayout(
                "tile dimensions must be at least 1".into(),
            ));
        }
        if self.alpha_plane && self.mask_plane {
            return Err(RasterError::InvalidLayout(
                "alpha plane and mask plane are mutually exclusive".into(),
            ));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(RasterError::InvalidLayout(format!(
                "aspect ratio {} must be positive",
                self.aspect_ratio
            )));
        }
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn plane_count(&self) -> u32 {
        self.plane_count
    }

    /// Bits per pixel (packed) or bits per plane word (planar).
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn alpha_plane(&self) -> bool {
        self.alpha_plane
    }

    pub fn mask_plane(&self) -> bool {
        self.mask_plane
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Whether pixels are stored as one contiguous value each.
    pub fn is_packed(&self) -> bool {
        self.plane_count == 1
    }

    /// Whether decoded values index a palette (everything except packed
    /// 16-bit and 24-bit direct color).
    pub fn is_indexed(&self) -> bool {
        self.plane_count > 1 || self.bits_per_pixel <= 8
    }

    /// Plane count including the extra alpha or mask plane.
    pub(crate) fn effective_planes(&self) -> usize {
        self.plane_count as usize + usize::from(self.alpha_plane || self.mask_plane)
    }

    /// Packed bit width including the extra alpha channel of a 24-bit image.
    pub(crate) fn effective_bits(&self) -> usize {
        let bpp = self.bits_per_pixel as usize;
        if self.is_packed() && bpp == 24 && self.alpha_plane {
            32
        } else {
            bpp
        }
    }

    // ── Derived geometry ────────────────────────────────────────────

    /// Bytes consumed per scanline, including padding.
    pub fn stride(&self) -> usize {
        let width = self.width as usize;
        if self.is_packed() {
            (width * self.effective_bits()).div_ceil(8) + self.padding
        } else {
            let word_bits = self.bits_per_pixel as usize;
            let chunks = width.div_ceil(word_bits);
            chunks * (word_bits / 8) * self.effective_planes() + self.padding
        }
    }

    /// Bytes covered by one full frame at this layout; the page up/down step.
    pub fn page_bytes(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// Legal step for width adjustments: the tile width, kept aligned to the
    /// chunk granularity of the arrangement so scanlines stay byte-exact.
    pub fn delta_width(&self) -> u32 {
        let align = if self.is_packed() {
            match self.bits_per_pixel {
                1 => 8,
                2 => 4,
                4 => 2,
                _ => 1,
            }
        } else {
            self.bits_per_pixel
        };
        lcm(self.tile_width, align)
    }

    /// Legal step for height adjustments.
    pub fn delta_height(&self) -> u32 {
        self.tile_height
    }

    // ── Pure mutators ───────────────────────────────────────────────

    pub fn with_size(self, width: u32, height: u32) -> Result<Self, RasterError> {
        Self {
            width,
            height,
            ..self
        }
        .validated()
    }

    pub fn with_width(self, width: u32) -> Result<Self, RasterError> {
        self.with_size(width, self.height)
    }

    pub fn with_height(self, height: u32) -> Result<Self, RasterError> {
        self.with_size(self.width, height)
    }

    /// Change the plane count. Moving to a planar arrangement coerces the
    /// depth to a valid plane word size (8) when the current depth has none.
    pub fn with_plane_count(self, plane_count: u32) -> Result<Self, RasterError> {
        let bits_per_pixel = if plane_count > 1 && !matches!(self.bits_per_pixel, 8 | 16) {
            8
        } else if plane_count == 1 && !matches!(self.bits_per_pixel, 1 | 2 | 4 | 8 | 16 | 24) {
            1
        } else {
            self.bits_per_pixel
        };
        Self {
            plane_count,
            bits_per_pixel,
            ..self
        }
        .validated()
    }

    /// Change the bit depth (bits per plane word when planar).
    pub fn with_bits_per_pixel(self, bits_per_pixel: u32) -> Result<Self, RasterError> {
        Self {
            bits_per_pixel,
            ..self
        }
        .validated()
    }

    pub fn with_pixel_format(self, pixel_format: PixelFormat) -> Result<Self, RasterError> {
        Self {
            pixel_format,
            ..self
        }
        .validated()
    }

    /// Byte order for 16-bit pixel or plane words. Only meaningful (and only
    /// toggleable) at a 16-bit depth.
    pub fn with_big_endian(self, big_endian: bool) -> Result<Self, RasterError> {
        if self.bits_per_pixel != 16 && big_endian != self.big_endian {
            return Err(RasterError::InvalidLayout(format!(
                "byte order only applies at 16-bit depth, not {}",
                self.bits_per_pixel
            )));
        }
        Self { big_endian, ..self }.validated()
    }

    /// Enable or disable the alpha plane (alpha channel when packed).
    /// Enabling it clears the mask plane.
    pub fn with_alpha_plane(self, alpha_plane: bool) -> Result<Self, RasterError> {
        Self {
            alpha_plane,
            mask_plane: self.mask_plane && !alpha_plane,
            ..self
        }
        .validated()
    }

    /// Enable or disable the mask plane. Enabling it clears the alpha plane.
    pub fn with_mask_plane(self, mask_plane: bool) -> Result<Self, RasterError> {
        Self {
            mask_plane,
            alpha_plane: self.alpha_plane && !mask_plane,
            ..self
        }
        .validated()
    }

    pub fn with_tile(self, tile_width: u32, tile_height: u32) -> Result<Self, RasterError> {
        Self {
            tile_width,
            tile_height,
            ..self
        }
        .validated()
    }

    /// Extra bytes appended to each scanline.
    pub fn with_padding(self, padding: usize) -> Result<Self, RasterError> {
        Self { padding, ..self }.validated()
    }

    /// Display pixel aspect ratio. Does not affect decoding.
    pub fn with_aspect_ratio(self, aspect_ratio: f32) -> Result<Self, RasterError> {
        Self {
            aspect_ratio,
            ..self
        }
        .validated()
    }

    /// Current read position into the byte source.
    pub fn with_byte_offset(self, byte_offset: usize) -> Result<Self, RasterError> {
        Self {
            byte_offset,
            ..self
        }
        .validated()
    }
}

fn lcm(a: u32, b: u32) -> u32 {
    a / gcd(a, b) * b
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
