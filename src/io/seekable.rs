//! Seekable reader trait
//!
//! The codec session reads from anything that can both read and seek:
//! a buffered file on disk or an in-memory cursor.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
