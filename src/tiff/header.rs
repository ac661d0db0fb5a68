//! TIFF header parsing
//!
//! Reads the 8-byte classic or 16-byte BigTIFF header: byte order marker,
//! version number and the offset of the first IFD.

use log::debug;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;

/// Parsed TIFF file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    pub byte_order: ByteOrder,
    pub is_big_tiff: bool,
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Reads the header from the start of `reader`
    pub fn read(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        let handler = byte_order.create_handler();

        let version = handler.read_u16(reader)?;
        let is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                validation::validate_bigtiff_header(reader, handler.as_ref())?;
                true
            }
            header::TIFF_VERSION => false,
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };
        debug!("Detected {} format", if is_big_tiff { "BigTIFF" } else { "standard TIFF" });

        let first_ifd_offset = read_offset(reader, is_big_tiff, handler.as_ref())?;
        debug!("First IFD offset: {}", first_ifd_offset);

        Ok(TiffHeader {
            byte_order,
            is_big_tiff,
            first_ifd_offset,
        })
    }
}

/// Reads an offset or count field: 8 bytes for BigTIFF, 4 otherwise
pub fn read_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    if is_big_tiff {
        Ok(handler.read_u64(reader)?)
    } else {
        Ok(handler.read_u32(reader)? as u64)
    }
}

/// Size of an IFD in bytes, including its entry count and next-IFD offset
pub fn ifd_size(entry_count: u64, is_big_tiff: bool) -> u64 {
    if is_big_tiff {
        // 8 (entry count) + 20 (each entry) + 8 (next IFD offset)
        16u64.saturating_add(entry_count.saturating_mul(20))
    } else {
        // 2 (entry count) + 12 (each entry) + 4 (next IFD offset)
        6u64.saturating_add(entry_count.saturating_mul(12))
    }
}
