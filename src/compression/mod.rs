//! Compression handling for TIFF strips
//!
//! This module implements strategies for decoding the compression methods
//! the reader supports. Decoding only; nothing here ever writes.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
