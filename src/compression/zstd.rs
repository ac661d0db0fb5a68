//! Zstandard strips (Compression = 14)

use log::trace;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::{read_bounded, CompressionHandler};

pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
        trace!("Decoding {} ZSTD bytes into at most {}", data.len(), max_output);
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let decoder = zstd::stream::read::Decoder::new(data)
            .map_err(|e| TiffError::GenericError(format!("ZSTD decoder error: {}", e)))?;
        read_bounded(decoder, max_output, self.name())
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u16 {
        compression::ZSTD
    }
}
