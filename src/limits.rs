use alloc::format;

use crate::error::RasterError;
use crate::layout::LayoutDescriptor;

/// Caps on how large a single decode may get.
///
/// Unset fields are unlimited. A layout is checked as a whole, after
/// validation and before any output buffer is allocated, so an adversarial
/// descriptor over a huge byte source fails cheaply.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Cap on `width * height`.
    pub max_pixels: Option<u64>,
    /// Cap on the raw byte span of one frame (`stride * height`).
    pub max_frame_bytes: Option<usize>,
    /// Cap on the decoded RGBA output allocation.
    pub max_memory_bytes: Option<usize>,
}

impl Limits {
    pub(crate) fn check(&self, desc: &LayoutDescriptor) -> Result<(), RasterError> {
        let w = desc.width();
        let h = desc.height();
        if let Some(max) = self.max_width {
            if w > max {
                return Err(RasterError::LimitExceeded(format!(
                    "width {w} exceeds limit {max}"
                )));
            }
        }
        if let Some(max) = self.max_height {
            if h > max {
                return Err(RasterError::LimitExceeded(format!(
                    "height {h} exceeds limit {max}"
                )));
            }
        }
        if let Some(max) = self.max_pixels {
            let pixels = u64::from(w) * u64::from(h);
            if pixels > max {
                return Err(RasterError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max}"
                )));
            }
        }
        if let Some(max) = self.max_frame_bytes {
            let bytes = desc.page_bytes();
            if bytes > max {
                return Err(RasterError::LimitExceeded(format!(
                    "frame span of {bytes} bytes exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), RasterError> {
        if let Some(max) = self.max_memory_bytes {
            if bytes > max {
                return Err(RasterError::LimitExceeded(format!(
                    "allocation of {bytes} bytes exceeds memory limit {max}"
                )));
            }
        }
        Ok(())
    }
}
