//! Canned layout presets for well-known platforms.
//!
//! A preset is nothing but a fully-formed [`LayoutDescriptor`] plus a default
//! palette; no platform-specific logic lives in the codec itself.

use rgb::RGBA8;

use crate::layout::{LayoutDescriptor, PixelFormat};
use crate::palette::Palette;

/// Platforms with a built-in screen layout preset.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// 256x192, packed 1 bpp bitmap (attribute colors not modeled here).
    ZxSpectrum,
    /// 256x192, packed 8 bpp over the default RGB332 palette.
    ZxSpectrumNext,
    /// 320x200, 4 bitplanes of big-endian 16-bit words, 16 colors.
    AtariStLow,
    /// 640x200, 2 bitplanes, 4 colors, half-height pixels.
    AtariStMedium,
    /// 640x400 monochrome, packed 1 bpp.
    AtariStHigh,
    /// 92x64 big-endian RGB565, a common 16-bit handheld sprite layout.
    Handheld16,
}

impl Platform {
    /// The preset layout, byte offset zero.
    pub fn descriptor(self) -> LayoutDescriptor {
        match self {
            Platform::ZxSpectrum => LayoutDescriptor::assemble(256, 192, 1, 1),
            Platform::ZxSpectrumNext => LayoutDescriptor::assemble(256, 192, 1, 8),
            Platform::AtariStLow => {
                let mut d = LayoutDescriptor::assemble(320, 200, 4, 16);
                d.big_endian = true;
                d
            }
            Platform::AtariStMedium => {
                let mut d = LayoutDescriptor::assemble(640, 200, 2, 16);
                d.big_endian = true;
                d.aspect_ratio = 0.5;
                d
            }
            Platform::AtariStHigh => LayoutDescriptor::assemble(640, 400, 1, 1),
            Platform::Handheld16 => {
                let mut d = LayoutDescriptor::assemble(92, 64, 1, 16);
                d.big_endian = true;
                d.pixel_format = PixelFormat::Rgb565;
                d
            }
        }
    }

    /// Default palette for indexed presets. Direct-color presets have none.
    pub fn default_palette(self) -> Option<Palette> {
        match self {
            Platform::ZxSpectrum => Some(Palette::from_entries(&ZX_ULA_COLORS)),
            Platform::ZxSpectrumNext => {
                let mut p = Palette::new();
                for i in 0..=255u8 {
                    p.set_color(usize::from(i), Palette::color_from_rgb332(i));
                }
                Some(p)
            }
            Platform::AtariStLow => Some(gem_palette(16)),
            Platform::AtariStMedium => Some(gem_palette(4)),
            Platform::AtariStHigh => {
                let mut p = gem_palette(2);
                // GEM high-res: index 0 is white paper, index 1 black ink.
                p.set_rgb(1, 0, 0, 0);
                Some(p)
            }
            Platform::Handheld16 => None,
        }
    }
}

/// ZX Spectrum ULA colors: normal then bright, GRB attribute order unrolled
/// to the conventional index order.
pub const ZX_ULA_COLORS: [RGBA8; 16] = [
    rgba(0x00, 0x00, 0x00),
    rgba(0x00, 0x00, 0xd8),
    rgba(0xd8, 0x00, 0x00),
    rgba(0xd8, 0x00, 0xd8),
    rgba(0x00, 0xd8, 0x00),
    rgba(0x00, 0xd8, 0xd8),
    rgba(0xd8, 0xd8, 0x00),
    rgba(0xd8, 0xd8, 0xd8),
    rgba(0x00, 0x00, 0x00),
    rgba(0x00, 0x00, 0xff),
    rgba(0xff, 0x00, 0x00),
    rgba(0xff, 0x00, 0xff),
    rgba(0x00, 0xff, 0x00),
    rgba(0x00, 0xff, 0xff),
    rgba(0xff, 0xff, 0x00),
    rgba(0xff, 0xff, 0xff),
];

/// TOS/GEM desktop default palette as 9-bit ST words.
const GEM_WORDS: [u16; 16] = [
    0x777, 0x700, 0x070, 0x770, 0x007, 0x707, 0x077, 0x555, 0x333, 0x733, 0x373, 0x773, 0x337,
    0x737, 0x377, 0x000,
];

fn gem_palette(count: usize) -> Palette {
    let mut p = Palette::new();
    p.set_color_count(count);
    for (i, &w) in GEM_WORDS.iter().take(count).enumerate() {
        p.set_color(i, Palette::color_from_st_rgb333(w));
    }
    p
}

const fn rgba(r: u8, g: u8, b: u8) -> RGBA8 {
    RGBA8 { r, g, b, a: 255 }
}
