//! Low-level I/O for the TIFF codec
//!
//! Seekable reader abstraction and byte order strategies.

pub mod seekable;
pub mod byte_order;
