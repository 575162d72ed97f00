//! Indexed-color palette engine with ACT and NPL file support.
//!
//! A [`Palette`] is an ordered table of up to 256 RGBA entries. Lookups are
//! total: an out-of-range index resolves to the opaque-black fallback color
//! rather than failing, so a decode can never be derailed by a short palette.
//!
//! Loading goes through a scratch table and commits only on success; a
//! malformed file leaves the previous palette untouched.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use rgb::RGBA8;

use crate::error::RasterError;

/// Color returned for any index outside the populated range.
pub const FALLBACK_COLOR: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

/// Hard cap on palette size; both file formats store at most 256 entries.
pub const MAX_COLORS: usize = 256;

/// Palette file format selector.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteFormat {
    /// Photoshop color table: 256 RGB triplets, optional 4-byte trailer
    /// (big-endian used-color count and transparent index).
    Act,
    /// Native palette format: `NPL1` magic, little-endian count and
    /// transparent index, then RGB triplets.
    Npl,
}

/// Ordered RGBA color table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<RGBA8>,
    transparent_index: Option<u16>,
    game: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// A full 256-entry palette of opaque black.
    pub fn new() -> Self {
        Self {
            entries: vec![FALLBACK_COLOR; MAX_COLORS],
            transparent_index: None,
            game: false,
        }
    }

    /// Build from explicit entries. Truncates past [`MAX_COLORS`].
    pub fn from_entries(entries: &[RGBA8]) -> Self {
        let mut v = entries.to_vec();
        v.truncate(MAX_COLORS);
        Self {
            entries: v,
            transparent_index: None,
            game: false,
        }
    }

    /// Restore the initial all-black 256-entry state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of color slots (populated or not).
    pub fn color_count(&self) -> usize {
        self.entries.len()
    }

    /// Resize to `count` slots, truncating or padding with opaque black.
    /// Counts above [`MAX_COLORS`] are clamped. Never fails.
    pub fn set_color_count(&mut self, count: usize) {
        self.entries.resize(count.min(MAX_COLORS), FALLBACK_COLOR);
        if let Some(t) = self.transparent_index {
            if usize::from(t) >= self.entries.len() {
                self.transparent_index = None;
            }
        }
    }

    /// Index treated as fully transparent by the mask-plane rules, if any.
    pub fn transparent_index(&self) -> Option<u16> {
        self.transparent_index
    }

    pub fn set_transparent_index(&mut self, index: Option<u16>) {
        self.transparent_index = index;
    }

    /// Legacy game-convention flag; alters ACT serialization only, never
    /// color values.
    pub fn game(&self) -> bool {
        self.game
    }

    pub fn set_game(&mut self, game: bool) {
        self.game = game;
    }

    /// Color at `index`, or [`FALLBACK_COLOR`] when out of range.
    pub fn lookup(&self, index: usize) -> RGBA8 {
        self.entries.get(index).copied().unwrap_or(FALLBACK_COLOR)
    }

    pub fn entries(&self) -> &[RGBA8] {
        &self.entries
    }

    /// Set the RGB value of an existing slot. Out-of-range indices are
    /// ignored.
    pub fn set_rgb(&mut self, index: usize, r: u8, g: u8, b: u8) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = RGBA8 { r, g, b, a: 255 };
        }
    }

    pub fn set_color(&mut self, index: usize, color: RGBA8) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = color;
        }
    }

    /// Index of the entry nearest to the given RGB color by Euclidean
    /// distance, first index winning ties. Returns 0 for an empty palette.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> usize {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (i, e) in self.entries.iter().enumerate() {
            let dr = i32::from(e.r) - i32::from(r);
            let dg = i32::from(e.g) - i32::from(g);
            let db = i32::from(e.b) - i32::from(b);
            let dist = (dr * dr + dg * dg + db * db) as u32;
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Exact RGB match if one exists, otherwise the nearest entry.
    pub(crate) fn match_index(&self, r: u8, g: u8, b: u8) -> usize {
        for (i, e) in self.entries.iter().enumerate() {
            if e.r == r && e.g == g && e.b == b {
                return i;
            }
        }
        self.nearest(r, g, b)
    }

    // ── File formats ────────────────────────────────────────────────

    /// Parse palette bytes and replace the current table. On error the
    /// previous state is left unchanged.
    pub fn load(&mut self, bytes: &[u8], format: PaletteFormat) -> Result<(), RasterError> {
        let (entries, transparent) = match format {
            PaletteFormat::Act => parse_act(bytes, self.game)?,
            PaletteFormat::Npl => parse_npl(bytes)?,
        };
        self.entries = entries;
        self.transparent_index = transparent;
        Ok(())
    }

    /// Serialize the current table.
    pub fn save(&self, format: PaletteFormat) -> Vec<u8> {
        match format {
            PaletteFormat::Act => write_act(self),
            PaletteFormat::Npl => write_npl(self),
        }
    }

    // ── Retro color conversions ─────────────────────────────────────

    /// 8-bit RGB332 (Spectrum Next default, bit pattern RRRGGGBB).
    pub fn color_from_rgb332(v: u8) -> RGBA8 {
        RGBA8 {
            r: scale3(u16::from(v >> 5)),
            g: scale3(u16::from((v >> 2) & 7)),
            b: scale2(v & 3),
            a: 255,
        }
    }

    /// Atari ST 9-bit palette word `0x0RGB`, 3 significant bits per nibble.
    pub fn color_from_st_rgb333(word: u16) -> RGBA8 {
        RGBA8 {
            r: scale3((word >> 8) & 7),
            g: scale3((word >> 4) & 7),
            b: scale3(word & 7),
            a: 255,
        }
    }

    /// Atari STE 12-bit palette word. Each nibble stores its least
    /// significant bit in bit 3 (the STE's backward-compatible rotation).
    pub fn color_from_ste_rgb444(word: u16) -> RGBA8 {
        RGBA8 {
            r: scale4(unrotate_ste((word >> 8) & 0xf)),
            g: scale4(unrotate_ste((word >> 4) & 0xf)),
            b: scale4(unrotate_ste(word & 0xf)),
            a: 255,
        }
    }

    /// Spectrum Next 9-bit word, bit pattern `0b0000_000R_RRGG_GBBB`.
    pub fn color_from_next_rgb333(word: u16) -> RGBA8 {
        RGBA8 {
            r: scale3((word >> 6) & 7),
            g: scale3((word >> 3) & 7),
            b: scale3(word & 7),
            a: 255,
        }
    }

    /// Whether every word fits the ST's 3-bit-per-channel layout.
    pub fn is_atari_st_words(words: &[u16]) -> bool {
        !words.is_empty() && words.iter().all(|w| w & !0x0777 == 0)
    }

    /// Whether every word fits the STE's 4-bit-per-channel layout.
    pub fn is_atari_ste_words(words: &[u16]) -> bool {
        !words.is_empty() && words.iter().all(|w| w & !0x0fff == 0)
    }

    /// Whether every word fits the Spectrum Next 9-bit layout.
    pub fn is_next_words(words: &[u16]) -> bool {
        !words.is_empty() && words.iter().all(|w| w & !0x01ff == 0)
    }
}

fn scale2(v: u8) -> u8 {
    v * 0x55
}

fn scale3(v: u16) -> u8 {
    ((v << 5) | (v << 2) | (v >> 1)) as u8
}

fn scale4(v: u16) -> u8 {
    ((v << 4) | v) as u8
}

fn unrotate_ste(nibble: u16) -> u16 {
    ((nibble & 7) << 1) | (nibble >> 3)
}

const ACT_BODY: usize = MAX_COLORS * 3;
const NPL_MAGIC: &[u8; 4] = b"NPL1";
const NPL_HEADER: usize = 8;
const NO_TRANSPARENT: u16 = 0xffff;

fn parse_act(bytes: &[u8], game: bool) -> Result<(Vec<RGBA8>, Option<u16>), RasterError> {
    let (count, transparent) = match bytes.len() {
        ACT_BODY => (MAX_COLORS, None),
        l if l == ACT_BODY + 4 => {
            let count = u16::from_be_bytes([bytes[ACT_BODY], bytes[ACT_BODY + 1]]);
            let t = u16::from_be_bytes([bytes[ACT_BODY + 2], bytes[ACT_BODY + 3]]);
            let count = if count == 0 || usize::from(count) > MAX_COLORS {
                MAX_COLORS
            } else {
                usize::from(count)
            };
            let transparent = (t != NO_TRANSPARENT && usize::from(t) < count).then_some(t);
            (count, transparent)
        }
        // The game convention drops the fixed-size body: any triplet-multiple
        // length up to 256 entries is accepted.
        l if game && l % 3 == 0 && l > 0 && l / 3 <= MAX_COLORS => (l / 3, None),
        l => {
            return Err(RasterError::PaletteParse(format!(
                "ACT length {l} is not 768, 772 or a game-mode triplet multiple"
            )));
        }
    };

    let entries = bytes[..count * 3]
        .chunks_exact(3)
        .map(|c| RGBA8 {
            r: c[0],
            g: c[1],
            b: c[2],
            a: 255,
        })
        .collect();
    Ok((entries, transparent))
}

fn write_act(palette: &Palette) -> Vec<u8> {
    if palette.game {
        // Game convention: exactly the populated entries, no padding, no
        // trailer.
        let mut out = Vec::with_capacity(palette.entries.len() * 3);
        for e in &palette.entries {
            out.extend_from_slice(&[e.r, e.g, e.b]);
        }
        return out;
    }

    let mut out = Vec::with_capacity(ACT_BODY + 4);
    for i in 0..MAX_COLORS {
        let e = palette.lookup(i);
        out.extend_from_slice(&[e.r, e.g, e.b]);
    }
    let count = palette.entries.len().min(MAX_COLORS) as u16;
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(
        &palette
            .transparent_index
            .unwrap_or(NO_TRANSPARENT)
            .to_be_bytes(),
    );
    out
}

fn parse_npl(bytes: &[u8]) -> Result<(Vec<RGBA8>, Option<u16>), RasterError> {
    if bytes.len() < NPL_HEADER || &bytes[..4] != NPL_MAGIC {
        return Err(RasterError::PaletteParse("missing NPL1 magic".into()));
    }
    let count = usize::from(u16::from_le_bytes([bytes[4], bytes[5]]));
    let t = u16::from_le_bytes([bytes[6], bytes[7]]);
    if count > MAX_COLORS {
        return Err(RasterError::PaletteParse(format!(
            "NPL color count {count} exceeds {MAX_COLORS}"
        )));
    }
    if bytes.len() != NPL_HEADER + count * 3 {
        return Err(RasterError::PaletteParse(format!(
            "NPL length {} does not match color count {count}",
            bytes.len()
        )));
    }
    let entries = bytes[NPL_HEADER..]
        .chunks_exact(3)
        .map(|c| RGBA8 {
            r: c[0],
            g: c[1],
            b: c[2],
            a: 255,
        })
        .collect();
    let transparent = (t != NO_TRANSPARENT && usize::from(t) < count).then_some(t);
    Ok((entries, transparent))
}

fn write_npl(palette: &Palette) -> Vec<u8> {
    let count = palette.entries.len().min(MAX_COLORS);
    let mut out = Vec::with_capacity(NPL_HEADER + count * 3);
    out.extend_from_slice(NPL_MAGIC);
    out.extend_from_slice(&(count as u16).to_le_bytes());
    out.extend_from_slice(
        &palette
            .transparent_index
            .unwrap_or(NO_TRANSPARENT)
            .to_le_bytes(),
    );
    for e in &palette.entries[..count] {
        out.extend_from_slice(&[e.r, e.g, e.b]);
    }
    out
}
