pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod raster;
pub mod vol;
pub mod config;

pub use config::VolConfig;
pub use raster::{inspect, materialize, ElementType, MaterializedRaster, Materializer, RasterDescriptor, RasterError, RasterSource};
pub use tiff::{TiffRaster, TiffReader};
pub use vol::{AccessFlags, ConnectorInfo, ConnectorRegistry, Dataset, GeoTiffFile, VolError, VolResult};
