//! Detection of well-known retro file formats.
//!
//! These fixed-size formats carry enough header information to configure a
//! layout and palette automatically: DEGAS and NEOchrome pictures embed their
//! Atari ST resolution and 16 palette words, and a ZX Spectrum screen is
//! recognizable by its exact length.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::RasterError;
use crate::layout::LayoutDescriptor;
use crate::palette::Palette;
use crate::platform::Platform;

/// Atari ST screen resolution word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StResolution {
    Low,
    Medium,
    High,
}

impl StResolution {
    fn platform(self) -> Platform {
        match self {
            StResolution::Low => Platform::AtariStLow,
            StResolution::Medium => Platform::AtariStMedium,
            StResolution::High => Platform::AtariStHigh,
        }
    }
}

const DEGAS_LEN: usize = 32_034;
const DEGAS_ELITE_LEN: usize = 32_066;
const NEO_LEN: usize = 32_128;
const ZX_SCREEN_LEN: usize = 6_912;

/// ZX Spectrum screen geometry after ULA de-interleaving.
pub const ZX_SCREEN_PIXELS: usize = 256 * 192;

/// A recognized file format.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownFormat {
    /// DEGAS (`.PI1/.PI2/.PI3`) or DEGAS Elite picture.
    Degas {
        resolution: StResolution,
        elite: bool,
    },
    /// NEOchrome low-resolution picture.
    NeoChrome,
    /// Raw ZX Spectrum screen dump (pixels plus attribute cells).
    ZxSpectrumScreen,
}

impl KnownFormat {
    /// Probe a byte buffer. These formats have fixed lengths, so a length
    /// check plus a few header words is decisive.
    pub fn detect(data: &[u8]) -> Option<KnownFormat> {
        match data.len() {
            DEGAS_LEN | DEGAS_ELITE_LEN => {
                let res = u16::from_be_bytes([data[0], data[1]]);
                let resolution = match res & 3 {
                    0 => StResolution::Low,
                    1 => StResolution::Medium,
                    2 => StResolution::High,
                    _ => return None,
                };
                Some(KnownFormat::Degas {
                    resolution,
                    elite: data.len() == DEGAS_ELITE_LEN,
                })
            }
            NEO_LEN => {
                // Flag and resolution words are always 0, as are the unused
                // image x/y offsets.
                let zeros = data[..4].iter().all(|&b| b == 0)
                    && data[54..58].iter().all(|&b| b == 0);
                zeros.then_some(KnownFormat::NeoChrome)
            }
            ZX_SCREEN_LEN => Some(KnownFormat::ZxSpectrumScreen),
            _ => None,
        }
    }

    /// Layout for the recognized format, byte offset zero.
    ///
    /// For a ZX screen this is the 8-bit indexed layout of the buffer
    /// produced by [`zx_screen_to_indexed`], not of the raw interleaved dump.
    pub fn descriptor(&self) -> LayoutDescriptor {
        match self {
            KnownFormat::Degas { resolution, .. } => resolution.platform().descriptor(),
            KnownFormat::NeoChrome => Platform::AtariStLow.descriptor(),
            KnownFormat::ZxSpectrumScreen => Platform::ZxSpectrumNext.descriptor(),
        }
    }

    /// Offset of the pixel data within the file.
    pub fn data_offset(&self) -> usize {
        match self {
            KnownFormat::Degas { .. } => 34,
            KnownFormat::NeoChrome => 128,
            KnownFormat::ZxSpectrumScreen => 0,
        }
    }

    /// Palette lifted from the file's 16 header words, when the format
    /// carries one.
    pub fn palette(&self, data: &[u8]) -> Option<Palette> {
        let words_at = match self {
            KnownFormat::Degas { .. } => 2,
            KnownFormat::NeoChrome => 4,
            KnownFormat::ZxSpectrumScreen => {
                return Some(Palette::from_entries(&crate::platform::ZX_ULA_COLORS));
            }
        };
        let mut words = [0u16; 16];
        for (i, w) in words.iter_mut().enumerate() {
            let o = words_at + i * 2;
            *w = u16::from_be_bytes([*data.get(o)?, *data.get(o + 1)?]);
        }

        let mut palette = Palette::new();
        palette.set_color_count(16);
        if Palette::is_atari_st_words(&words) {
            for (i, &w) in words.iter().enumerate() {
                palette.set_color(i, Palette::color_from_st_rgb333(w));
            }
        } else if Palette::is_atari_ste_words(&words) {
            for (i, &w) in words.iter().enumerate() {
                palette.set_color(i, Palette::color_from_ste_rgb444(w));
            }
        } else {
            return None;
        }
        Some(palette)
    }
}

/// PackBits decompression, as used by compressed DEGAS Elite pictures.
///
/// Stops once `expected_len` bytes are produced or the input runs out; short
/// input yields a short (zero-padded) result rather than an error.
pub fn unpack_bits(src: &[u8], expected_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(expected_len);
    let mut i = 0;
    while i < src.len() && out.len() < expected_len {
        let control = src[i] as i8;
        i += 1;
        if control >= 0 {
            let run = control as usize + 1;
            let take = run.min(src.len() - i).min(expected_len - out.len());
            out.extend_from_slice(&src[i..i + take]);
            i += run;
        } else if control != -128 {
            let run = control.unsigned_abs() as usize + 1;
            if let Some(&value) = src.get(i) {
                let take = run.min(expected_len - out.len());
                out.extend(core::iter::repeat_n(value, take));
            }
            i += 1;
        }
    }
    out.resize(expected_len, 0);
    out
}

/// Convert a raw 6912-byte ZX Spectrum screen (interleaved pixel rows plus
/// 32x24 attribute cells) into a linear 256x192 buffer of ULA color indices
/// 0..16.
pub fn zx_screen_to_indexed(data: &[u8]) -> Result<Vec<u8>, RasterError> {
    if data.len() < ZX_SCREEN_LEN {
        return Err(RasterError::OutOfRange {
            offset: 0,
            needed: ZX_SCREEN_LEN,
            available: data.len(),
        });
    }

    let mut out = vec![0u8; ZX_SCREEN_PIXELS];
    for r in 0..192usize {
        // Pixel address bits: 010S SRRR CCCX XXXX; attributes are linear
        // 32-byte rows, one per 8-pixel cell row.
        let mut p = ((r & 0xc0) << 5) | ((r & 0x07) << 8) | ((r & 0x38) << 2);
        let mut a = 6144 + ((r & 0xf8) << 2);

        for c in (0..256usize).step_by(8) {
            let bits = data[p];
            let attr = data[a];
            p += 1;
            a += 1;

            let bright = if attr & 0x40 != 0 { 8 } else { 0 };
            let ink = (attr & 0x07) + bright;
            let paper = ((attr >> 3) & 0x07) + bright;

            for i in 0..8 {
                out[r * 256 + c + i] = if bits & (0x80 >> i) != 0 { ink } else { paper };
            }
        }
    }
    Ok(out)
}
