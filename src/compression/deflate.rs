//! Adobe Deflate strips (Compression = 8, or the legacy 32946)

use flate2::read::ZlibDecoder;
use log::trace;

use crate::tiff::constants::compression;
use crate::tiff::errors::TiffResult;
use super::handler::{read_bounded, CompressionHandler};

/// zlib-wrapped deflate streams
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
        trace!("Inflating {} bytes into at most {}", data.len(), max_output);
        read_bounded(ZlibDecoder::new(data), max_output, self.name())
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u16 {
        compression::DEFLATE
    }
}
