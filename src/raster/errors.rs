//! Error types for raster inspection and materialization

use std::fmt;

use crate::tiff::errors::TiffError;

/// Failures of the raster core
///
/// Every variant is terminal; nothing here is retried.
#[derive(Debug)]
pub enum RasterError {
    /// The container could not be opened or parsed
    FileError(TiffError),
    /// Mandatory dimensions are absent or outside 1..=65535
    InvalidRaster(String),
    /// The codec cannot describe the raster layout
    CodecError(String),
    /// The decoded raster would exceed the size ceiling
    SizeLimitExceeded { size: u64, limit: u64 },
    /// A scanline failed to decode
    DecodeError { row: u32, source: TiffError },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::FileError(e) => write!(f, "Cannot open raster: {}", e),
            RasterError::InvalidRaster(msg) => write!(f, "Invalid raster: {}", msg),
            RasterError::CodecError(msg) => write!(f, "Codec error: {}", msg),
            RasterError::SizeLimitExceeded { size, limit } => write!(
                f,
                "Raster size {} bytes exceeds the limit of {} bytes",
                size, limit
            ),
            RasterError::DecodeError { row, source } => {
                write!(f, "Failed to decode scanline {}: {}", row, source)
            }
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::FileError(e) => Some(e),
            RasterError::DecodeError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TiffError> for RasterError {
    fn from(error: TiffError) -> Self {
        RasterError::FileError(error)
    }
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;
