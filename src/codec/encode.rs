//! RGBA raster → raw byte window, the inverse of decode.
//!
//! Indexed targets map each pixel to an exact palette match when one exists,
//! falling back to the nearest entry by Euclidean RGB distance. Direct 16-bit
//! targets requantize channels with no dithering. Alpha and mask planes are
//! rebuilt from raster alpha with an opacity threshold of 128.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;
use rgb::RGBA8;

use crate::error::RasterError;
use crate::layout::LayoutDescriptor;
use crate::palette::Palette;
use crate::raster::RasterView;

pub(crate) fn encode_raster(
    raster: &RasterView,
    desc: &LayoutDescriptor,
    palette: Option<&Palette>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    desc.validate()?;
    if raster.width() != desc.width() || raster.height() != desc.height() {
        return Err(RasterError::EncodingOverflow {
            expected_width: desc.width(),
            expected_height: desc.height(),
            actual_width: raster.width(),
            actual_height: raster.height(),
        });
    }

    let w = desc.width() as usize;
    let h = desc.height() as usize;
    let stride = desc.stride();
    let mut out = vec![0u8; stride * h];

    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let pixels = &raster.as_pixels()[y * w..(y + 1) * w];
        let row = &mut out[y * stride..(y + 1) * stride];
        if desc.is_packed() {
            encode_packed_row(pixels, desc, palette, row);
        } else {
            encode_planar_row(pixels, desc, palette, row);
        }
    }

    Ok(out)
}

fn index_for(palette: Option<&Palette>, c: RGBA8, max_index: usize) -> usize {
    palette
        .map_or(0, |p| p.match_index(c.r, c.g, c.b))
        .min(max_index)
}

fn opaque(c: RGBA8) -> bool {
    c.a >= 128
}

fn encode_packed_row(
    pixels: &[RGBA8],
    desc: &LayoutDescriptor,
    palette: Option<&Palette>,
    row: &mut [u8],
) {
    match desc.bits_per_pixel() {
        bpp @ (1 | 2 | 4) => {
            let bpp = bpp as usize;
            let max_index = (1usize << bpp) - 1;
            for (x, &c) in pixels.iter().enumerate() {
                let index = index_for(palette, c, max_index);
                let bit_off = x * bpp;
                let shift = 8 - bpp - bit_off % 8;
                row[bit_off / 8] |= (index as u8) << shift;
            }
        }
        8 => {
            for (x, &c) in pixels.iter().enumerate() {
                row[x] = index_for(palette, c, 255) as u8;
            }
        }
        16 => {
            let format = desc.pixel_format();
            for (x, &c) in pixels.iter().enumerate() {
                let word = format.pack(c.r, c.g, c.b, c.a);
                let bytes = if desc.big_endian() {
                    word.to_be_bytes()
                } else {
                    word.to_le_bytes()
                };
                row[x * 2..x * 2 + 2].copy_from_slice(&bytes);
            }
        }
        24 => {
            let step = desc.effective_bits() / 8;
            for (x, &c) in pixels.iter().enumerate() {
                let o = x * step;
                row[o] = c.r;
                row[o + 1] = c.g;
                row[o + 2] = c.b;
                if step == 4 {
                    row[o + 3] = c.a;
                }
            }
        }
        _ => unreachable!("depth checked by LayoutDescriptor::validate"),
    }
}

fn encode_planar_row(
    pixels: &[RGBA8],
    desc: &LayoutDescriptor,
    palette: Option<&Palette>,
    row: &mut [u8],
) {
    let word_bits = desc.bits_per_pixel() as usize;
    let word_bytes = word_bits / 8;
    let planes = desc.plane_count() as usize;
    let eff = desc.effective_planes();
    let max_index = (1usize << planes) - 1;

    for (x, &c) in pixels.iter().enumerate() {
        let chunk = x / word_bits;
        let bit = word_bits - 1 - x % word_bits;
        let base = chunk * eff * word_bytes;

        let index = index_for(palette, c, max_index);
        for p in 0..planes {
            if index >> p & 1 != 0 {
                set_word_bit(row, base + p * word_bytes, word_bytes, desc.big_endian(), bit);
            }
        }
        if eff > planes && opaque(c) {
            set_word_bit(
                row,
                base + planes * word_bytes,
                word_bytes,
                desc.big_endian(),
                bit,
            );
        }
    }
}

fn set_word_bit(row: &mut [u8], off: usize, word_bytes: usize, big_endian: bool, bit: usize) {
    if word_bytes == 1 {
        row[off] |= 1 << bit;
    } else {
        let (hi, lo) = if big_endian { (off, off + 1) } else { (off + 1, off) };
        if bit >= 8 {
            row[hi] |= 1 << (bit - 8);
        } else {
            row[lo] |= 1 << bit;
        }
    }
}
