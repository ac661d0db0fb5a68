//! Error types for the object-model adapter

use std::fmt;

use crate::raster::errors::RasterError;
use crate::tiff::errors::TiffError;

/// Failures surfaced by file, group, dataset and attribute handles
#[derive(Debug)]
pub enum VolError {
    /// Inspection or materialization failed
    Raster(RasterError),
    /// Write access was requested
    ReadOnly(String),
    /// Operation the connector does not offer
    Unsupported(String),
    /// No object with this name
    NotFound(String),
    /// Caller buffer cannot hold the data
    BufferTooSmall { needed: usize, available: usize },
    /// Configuration could not be loaded
    Config(String),
}

impl fmt::Display for VolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolError::Raster(e) => write!(f, "{}", e),
            VolError::ReadOnly(msg) => write!(f, "Read-only connector: {}", msg),
            VolError::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
            VolError::NotFound(name) => write!(f, "Object not found: {}", name),
            VolError::BufferTooSmall { needed, available } => write!(
                f,
                "Buffer too small: need {} bytes, got {}",
                needed, available
            ),
            VolError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for VolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VolError::Raster(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RasterError> for VolError {
    fn from(error: RasterError) -> Self {
        VolError::Raster(error)
    }
}

impl From<TiffError> for VolError {
    fn from(error: TiffError) -> Self {
        VolError::Raster(RasterError::FileError(error))
    }
}

/// Result type for adapter operations
pub type VolResult<T> = Result<T, VolError>;
