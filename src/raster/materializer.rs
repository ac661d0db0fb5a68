//! Raster materialization
//!
//! Decodes a whole raster into one contiguous buffer, one scanline at a
//! time. The buffer size is checked against a ceiling before anything is
//! allocated, and a raster that fails on any row yields no buffer at all.

use log::{debug, error, info};

use crate::raster::descriptor::{validate_dimension, RasterDescriptor};
use crate::raster::element_type::ElementType;
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::source::RasterSource;
use crate::tiff::constants::tags;

/// Default ceiling on a materialized raster: 100 MiB
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// A fully decoded raster
///
/// Always holds exactly `height * scanline_size` bytes in native byte order.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedRaster {
    data: Vec<u8>,
    element_type: ElementType,
    shape: Vec<usize>,
    scanline_size: usize,
}

impl MaterializedRaster {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// `[height, width]`, or `[height, width, samples_per_pixel]` for multi-band rasters
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn scanline_size(&self) -> usize {
        self.scanline_size
    }

    /// Size of the buffer in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Per-row progress callback, called with (rows done, total rows)
pub type RowCallback<'a> = Box<dyn FnMut(u32, u32) + 'a>;

/// Configurable materializer
pub struct Materializer<'a> {
    max_bytes: u64,
    on_row: Option<RowCallback<'a>>,
}

impl Default for Materializer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Materializer<'a> {
    pub fn new() -> Self {
        Materializer {
            max_bytes: DEFAULT_MAX_BYTES,
            on_row: None,
        }
    }

    /// Sets the size ceiling in bytes
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Registers a callback invoked after every decoded row
    pub fn on_row<F: FnMut(u32, u32) + 'a>(mut self, callback: F) -> Self {
        self.on_row = Some(Box::new(callback));
        self
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Decodes every row of `source` into a new buffer
    pub fn materialize(
        &mut self,
        source: &mut dyn RasterSource,
        descriptor: &RasterDescriptor,
    ) -> RasterResult<MaterializedRaster> {
        let (width, height) = read_dimensions(source)?;
        if width != descriptor.width || height != descriptor.height {
            return Err(RasterError::InvalidRaster(format!(
                "source is {}x{} but descriptor says {}x{}",
                width, height, descriptor.width, descriptor.height
            )));
        }

        let scanline_size = source.scanline_size();
        if scanline_size == 0 {
            return Err(RasterError::CodecError("scanline size is zero".to_string()));
        }

        let total = (height as u64).saturating_mul(scanline_size);
        if total > self.max_bytes {
            error!("Raster needs {} bytes, limit is {}", total, self.max_bytes);
            return Err(RasterError::SizeLimitExceeded { size: total, limit: self.max_bytes });
        }
        let (total, scanline_size) = match (usize::try_from(total), usize::try_from(scanline_size)) {
            (Ok(total), Ok(scanline_size)) => (total, scanline_size),
            _ => return Err(RasterError::SizeLimitExceeded { size: total, limit: usize::MAX as u64 }),
        };

        debug!("Allocating {} bytes for {} rows of {} bytes", total, height, scanline_size);
        let mut data = vec![0u8; total];

        for (row, chunk) in (0..height).zip(data.chunks_exact_mut(scanline_size)) {
            if let Err(e) = source.read_scanline(row, chunk) {
                error!("Scanline {} failed: {}", row, e);
                return Err(RasterError::DecodeError { row, source: e });
            }
            if let Some(callback) = self.on_row.as_mut() {
                callback(row + 1, height);
            }
        }

        info!("Materialized {} bytes as {} {:?}", total, descriptor.element_type, descriptor.shape());

        Ok(MaterializedRaster {
            data,
            element_type: descriptor.element_type,
            shape: descriptor.shape(),
            scanline_size,
        })
    }
}

/// Decodes `source` with the default size ceiling
pub fn materialize(
    source: &mut dyn RasterSource,
    descriptor: &RasterDescriptor,
) -> RasterResult<MaterializedRaster> {
    Materializer::new().materialize(source, descriptor)
}

fn read_dimensions(source: &mut dyn RasterSource) -> RasterResult<(u32, u32)> {
    let width = source.tag(tags::IMAGE_WIDTH).unwrap_or(0);
    let height = source.tag(tags::IMAGE_LENGTH).unwrap_or(0);
    Ok((validate_dimension("width", width)?, validate_dimension("height", height)?))
}
