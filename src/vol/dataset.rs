//! Dataset handles

use log::debug;

use crate::raster::element_type::ElementType;
use crate::raster::materializer::MaterializedRaster;
use crate::vol::errors::{VolError, VolResult};

/// Name of the only dataset a GeoTIFF file exposes
pub const DATASET_NAME: &str = "image";

/// The materialized image of a file
///
/// The pixel buffer is decoded when the dataset is opened and owned by the
/// handle until it is closed.
#[derive(Debug)]
pub struct Dataset {
    name: String,
    raster: MaterializedRaster,
}

impl Dataset {
    pub(crate) fn new(name: &str, raster: MaterializedRaster) -> Self {
        Dataset {
            name: name.to_string(),
            raster,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dataspace extents, slowest-varying first
    pub fn shape(&self) -> &[usize] {
        self.raster.shape()
    }

    pub fn element_type(&self) -> ElementType {
        self.raster.element_type()
    }

    /// Size of the dataset in bytes
    pub fn storage_size(&self) -> usize {
        self.raster.len()
    }

    pub fn data(&self) -> &[u8] {
        self.raster.data()
    }

    /// Copies the whole dataset into `buf`, returning the byte count
    pub fn read(&self, buf: &mut [u8]) -> VolResult<usize> {
        let data = self.raster.data();
        if buf.len() < data.len() {
            return Err(VolError::BufferTooSmall {
                needed: data.len(),
                available: buf.len(),
            });
        }
        buf[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    /// Releases the pixel buffer
    pub fn close(self) {
        debug!("Closing dataset {} ({} bytes)", self.name, self.raster.len());
    }

    pub fn into_raster(self) -> MaterializedRaster {
        self.raster
    }
}
