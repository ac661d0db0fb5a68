//! Byte order of TIFF data
//!
//! Header fields and tag values are read through a `ByteOrderHandler`
//! chosen from the header marker. Decoded pixel samples are converted to the
//! machine's order with `ByteOrder::samples_to_native`.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{Read, Result};

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// "II"
    LittleEndian,
    /// "MM"
    BigEndian,
}

impl ByteOrder {
    /// Reads the two-byte marker at the start of a TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let mut marker = [0u8; 2];
        reader.read_exact(&mut marker)?;
        match &marker {
            b"II" => Ok(ByteOrder::LittleEndian),
            b"MM" => Ok(ByteOrder::BigEndian),
            _ => Err(TiffError::InvalidByteOrder(u16::from_le_bytes(marker))),
        }
    }

    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    pub fn is_native(&self) -> bool {
        *self == Self::native()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little-endian (II)",
            ByteOrder::BigEndian => "big-endian (MM)",
        }
    }

    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Converts samples of `bytes_per_sample` bytes from this order to native order, in place
    ///
    /// Single-byte samples and data already in native order are left alone.
    /// A trailing partial sample is not touched.
    pub fn samples_to_native(&self, data: &mut [u8], bytes_per_sample: usize) {
        if bytes_per_sample < 2 || self.is_native() {
            return;
        }
        for sample in data.chunks_exact_mut(bytes_per_sample) {
            sample.reverse();
        }
    }
}

/// Reads fixed-width header and tag fields in one byte order
pub trait ByteOrderHandler: Send + Sync {
    fn order(&self) -> ByteOrder;

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;
}

macro_rules! byte_order_handler {
    ($name:ident, $order:ident) => {
        pub struct $name;

        impl ByteOrderHandler for $name {
            fn order(&self) -> ByteOrder {
                ByteOrder::$order
            }

            fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
                reader.read_u16::<$order>()
            }

            fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
                reader.read_u32::<$order>()
            }

            fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
                reader.read_u64::<$order>()
            }

            fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
                reader.read_f64::<$order>()
            }
        }
    };
}

byte_order_handler!(LittleEndianHandler, LittleEndian);
byte_order_handler!(BigEndianHandler, BigEndian);
