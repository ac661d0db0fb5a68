//! TIFF file format parsing module
//!
//! This module provides structures and functions for reading the first
//! image of TIFF and BigTIFF files, including GeoTIFF metadata.

pub mod errors;
pub mod ifd;
pub mod header;
pub mod reader;
#[cfg(test)]
pub(crate) mod tests;
pub mod geotags;
pub mod constants;
pub mod geo_key_parser;
pub mod scanline;
pub mod tiff_raster;
pub(crate) mod validation;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use geotags::{GeoKeyEntry, GeoKeyValue, get_code_name, get_key_name, get_tag_name, is_geotiff_tag};
pub use scanline::ScanlineLayout;
pub use tiff_raster::TiffRaster;
