//! Raw byte window → RGBA raster.
//!
//! Two extraction paths. Packed: all bits of a pixel are contiguous, read
//! MSB-first within each byte, with the 16-bit depth going through
//! [`crate::PixelFormat`] and the byte-order flag. Planar: the row is a
//! sequence of chunks, each chunk holding one 8- or 16-bit word per plane;
//! plane `p` contributes bit `p` of the pixel index, and pixel order inside a
//! chunk is MSB-first.
//!
//! Alpha/mask rules: an extra plane (planar) or the format's alpha bit
//! (packed 16-bit) supplies either per-pixel alpha or a visibility mask;
//! masked-out pixels become transparent black. In packed indexed modes the
//! mask flag uses the palette's transparent index instead, and the alpha flag
//! defers to the palette entries.

use alloc::vec;

use enough::Stop;
use rgb::RGBA8;

use crate::error::RasterError;
use crate::layout::LayoutDescriptor;
use crate::limits::Limits;
use crate::palette::{FALLBACK_COLOR, Palette};
use crate::raster::RasterView;

const TRANSPARENT: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

pub(crate) fn decode_raster(
    source: &[u8],
    desc: &LayoutDescriptor,
    palette: Option<&Palette>,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<RasterView, RasterError> {
    desc.validate()?;

    let w = desc.width() as usize;
    let h = desc.height() as usize;
    let stride = desc.stride();
    let needed = stride
        .checked_mul(h)
        .ok_or_else(|| RasterError::InvalidLayout("frame byte size overflows".into()))?;
    let offset = desc.byte_offset();
    let end = offset.checked_add(needed).ok_or(RasterError::OutOfRange {
        offset,
        needed,
        available: source.len(),
    })?;
    if end > source.len() {
        return Err(RasterError::OutOfRange {
            offset,
            needed,
            available: source.len(),
        });
    }

    if let Some(limits) = limits {
        limits.check(desc)?;
        limits.check_memory(w * h * 4)?;
    }

    let window = &source[offset..end];
    let mut out = vec![0u8; w * h * 4];

    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row = &window[y * stride..y * stride + stride];
        let out_row = &mut out[y * w * 4..(y + 1) * w * 4];
        if desc.is_packed() {
            decode_packed_row(row, desc, palette, out_row);
        } else {
            decode_planar_row(row, desc, palette, out_row);
        }
    }

    Ok(RasterView::new(out, desc.width(), desc.height()))
}

fn lookup(palette: Option<&Palette>, index: usize) -> RGBA8 {
    palette.map_or(FALLBACK_COLOR, |p| p.lookup(index))
}

fn put(out_row: &mut [u8], x: usize, c: RGBA8) {
    out_row[x * 4..x * 4 + 4].copy_from_slice(&[c.r, c.g, c.b, c.a]);
}

fn decode_packed_row(
    row: &[u8],
    desc: &LayoutDescriptor,
    palette: Option<&Palette>,
    out_row: &mut [u8],
) {
    let w = desc.width() as usize;
    match desc.bits_per_pixel() {
        bpp @ (1 | 2 | 4) => {
            let bpp = bpp as usize;
            let mask = (1u8 << bpp) - 1;
            let transparent = masked_index(desc, palette);
            for x in 0..w {
                let bit_off = x * bpp;
                let shift = 8 - bpp - bit_off % 8;
                let index = usize::from((row[bit_off / 8] >> shift) & mask);
                let c = if transparent == Some(index) {
                    TRANSPARENT
                } else {
                    lookup(palette, index)
                };
                put(out_row, x, c);
            }
        }
        8 => {
            let transparent = masked_index(desc, palette);
            for x in 0..w {
                let index = usize::from(row[x]);
                let c = if transparent == Some(index) {
                    TRANSPARENT
                } else {
                    lookup(palette, index)
                };
                put(out_row, x, c);
            }
        }
        16 => {
            let format = desc.pixel_format();
            for x in 0..w {
                let word = read_word(row, x * 2, 2, desc.big_endian());
                let (r, g, b, abit) = format.unpack(word);
                let c = if desc.mask_plane() && format.has_alpha() && abit == 0 {
                    TRANSPARENT
                } else if desc.alpha_plane() && format.has_alpha() {
                    RGBA8 { r, g, b, a: abit }
                } else {
                    RGBA8 { r, g, b, a: 255 }
                };
                put(out_row, x, c);
            }
        }
        24 => {
            let step = desc.effective_bits() / 8;
            for x in 0..w {
                let o = x * step;
                let a = if step == 4 { row[o + 3] } else { 255 };
                put(
                    out_row,
                    x,
                    RGBA8 {
                        r: row[o],
                        g: row[o + 1],
                        b: row[o + 2],
                        a,
                    },
                );
            }
        }
        _ => unreachable!("depth checked by LayoutDescriptor::validate"),
    }
}

/// Palette index forced transparent by the mask flag in packed indexed modes.
fn masked_index(desc: &LayoutDescriptor, palette: Option<&Palette>) -> Option<usize> {
    if !desc.mask_plane() {
        return None;
    }
    palette
        .and_then(|p| p.transparent_index())
        .map(usize::from)
}

fn decode_planar_row(
    row: &[u8],
    desc: &LayoutDescriptor,
    palette: Option<&Palette>,
    out_row: &mut [u8],
) {
    let w = desc.width() as usize;
    let word_bits = desc.bits_per_pixel() as usize;
    let word_bytes = word_bits / 8;
    let planes = desc.plane_count() as usize;
    let eff = desc.effective_planes();

    for x in 0..w {
        let chunk = x / word_bits;
        let bit = word_bits - 1 - x % word_bits;
        let base = chunk * eff * word_bytes;

        let mut index = 0usize;
        for p in 0..planes {
            let word = read_word(row, base + p * word_bytes, word_bytes, desc.big_endian());
            index |= usize::from((word >> bit) & 1) << p;
        }

        let mut c = lookup(palette, index);
        if eff > planes {
            let word = read_word(row, base + planes * word_bytes, word_bytes, desc.big_endian());
            let set = (word >> bit) & 1 != 0;
            if desc.alpha_plane() {
                c.a = if set { 255 } else { 0 };
            } else if !set {
                c = TRANSPARENT;
            }
        }
        put(out_row, x, c);
    }
}

fn read_word(row: &[u8], off: usize, word_bytes: usize, big_endian: bool) -> u16 {
    if word_bytes == 1 {
        u16::from(row[off])
    } else if big_endian {
        u16::from_be_bytes([row[off], row[off + 1]])
    } else {
        u16::from_le_bytes([row[off], row[off + 1]])
    }
}
