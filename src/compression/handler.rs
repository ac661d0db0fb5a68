//! Strip decompression strategy

use std::io::Read;

use crate::tiff::errors::{TiffError, TiffResult};

/// Decodes the payload of one strip
pub trait CompressionHandler: Send + Sync {
    /// Decompresses `data`, keeping at most `max_output` bytes
    ///
    /// A strip never expands past `rows * scanline_size`, so anything beyond
    /// `max_output` is dropped unread.
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>>;

    fn name(&self) -> &'static str;

    /// TIFF Compression tag value
    fn code(&self) -> u16;
}

/// Drains a decoding stream into a buffer of at most `max_output` bytes
pub(crate) fn read_bounded<D: Read>(decoder: D, max_output: usize, method: &str) -> TiffResult<Vec<u8>> {
    let mut out = Vec::with_capacity(max_output);
    decoder.take(max_output as u64)
        .read_to_end(&mut out)
        .map_err(|e| TiffError::GenericError(format!("{} stream is corrupt: {}", method, e)))?;
    Ok(out)
}
