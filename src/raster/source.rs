//! Raster source abstraction
//!
//! The inspector and materializer never touch the TIFF reader directly; they
//! pull tag values and scanlines through this trait. An open codec session
//! implements it, and tests implement it with synthetic sources.

use crate::tiff::errors::TiffResult;
use crate::tiff::geotags::GeoKeyValue;

/// An open raster that can be queried for tags and decoded row by row
pub trait RasterSource {
    /// First value of an integer tag, `None` when absent or unreadable
    fn tag(&mut self, tag: u16) -> Option<u64>;

    /// Value of a GeoKey, `None` when absent or unreadable
    fn geo_key(&mut self, key_id: u16) -> Option<GeoKeyValue>;

    /// DOUBLE values of a tag, `None` when absent or unreadable
    fn double_values(&mut self, tag: u16) -> Option<Vec<f64>>;

    /// Bytes in one decoded row; 0 means the size cannot be computed
    fn scanline_size(&mut self) -> u64;

    /// Decodes row `row` into `buf`, which holds exactly one scanline
    fn read_scanline(&mut self, row: u32, buf: &mut [u8]) -> TiffResult<()>;
}
