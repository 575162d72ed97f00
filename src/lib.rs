//! # retroraster
//!
//! Pixel-layout interpretation engine for retro-computer graphics data.
//!
//! Point a [`LayoutDescriptor`] at an arbitrary byte window and decode it as
//! raster pixel data: packed/chunky or bitplane-interleaved arrangements,
//! 1–24 bits per pixel, RGB555/565 channel formats with either byte order,
//! per-scanline padding, tile-aligned sizing and alpha/mask planes. Indexed
//! layouts resolve through a [`Palette`] with ACT and NPL file support.
//! Every decode yields a fresh normalized RGBA [`RasterView`]; encode is the
//! exact inverse for round-trip export.
//!
//! ## Non-Goals
//!
//! - GUI, file dialogs, menu state — callers own all of that
//! - Compressed container formats beyond PackBits (`unpack_bits`)
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use retroraster::{DecodeRequest, LayoutDescriptor, Palette, Unstoppable};
//!
//! let data: &[u8] = &[]; // your raw file bytes
//!
//! // Atari ST low-res: 4 bitplanes of big-endian words.
//! let layout = LayoutDescriptor::planar(320, 200, 4, 16)?
//!     .with_big_endian(true)?;
//! let palette = Palette::new();
//!
//! let raster = DecodeRequest::new(data, &layout)
//!     .with_palette(&palette)
//!     .decode(Unstoppable)?;
//! // raster.pixels() is width*height RGBA bytes, row-major
//! # Ok::<(), retroraster::RasterError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod codec;
mod document;
mod error;
mod layout;
mod limits;
mod palette;
mod raster;

pub mod formats;
pub mod platform;

// Re-exports
pub use codec::{DecodeRequest, EncodeRequest};
pub use document::Document;
pub use enough::{Stop, Unstoppable};
pub use error::RasterError;
pub use layout::{LayoutDescriptor, PixelFormat};
pub use limits::Limits;
pub use palette::{FALLBACK_COLOR, MAX_COLORS, Palette, PaletteFormat};
pub use platform::Platform;
pub use raster::RasterView;
pub use rgb::RGBA8;
