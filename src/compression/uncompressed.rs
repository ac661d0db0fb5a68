//! Raw strips (Compression = 1)

use crate::tiff::constants::compression;
use crate::tiff::errors::TiffResult;
use super::handler::CompressionHandler;

pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
        let len = data.len().min(max_output);
        Ok(data[..len].to_vec())
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u16 {
        compression::NONE
    }
}
