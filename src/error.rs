use alloc::string::String;
use enough::StopReason;

/// Errors from raw raster decoding, encoding and palette handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("byte window out of range: need {needed} bytes at offset {offset}, source has {available}")]
    OutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("malformed palette data: {0}")]
    PaletteParse(String),

    #[error(
        "raster size mismatch: layout is {expected_width}x{expected_height}, raster is {actual_width}x{actual_height}"
    )]
    EncodingOverflow {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for RasterError {
    fn from(r: StopReason) -> Self {
        RasterError::Cancelled(r)
    }
}
