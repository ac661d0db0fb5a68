//! Typed raster core
//!
//! Inspection turns a raster's tags into a validated descriptor;
//! materialization decodes the raster into a bounded, contiguous buffer.

pub mod descriptor;
pub mod element_type;
pub mod errors;
pub mod inspector;
pub mod materializer;
pub mod source;

pub use descriptor::{GeoMetadata, RasterDescriptor, MAX_DIMENSION};
pub use element_type::{resolve_element_type, ElementType, SampleFormat};
pub use errors::{RasterError, RasterResult};
pub use inspector::inspect;
pub use materializer::{materialize, MaterializedRaster, Materializer, DEFAULT_MAX_BYTES};
pub use source::RasterSource;
