//! Element types and the TIFF sample mapping
//!
//! A raster's element type is decided from its SampleFormat and
//! BitsPerSample tags. The mapping is lenient: combinations that have no
//! exact counterpart fall back to the narrowest type of the same family, and
//! unknown sample formats are read as unsigned bytes.

use std::fmt;

use crate::tiff::constants::sample_format;

/// Interpretation of sample data, from the SampleFormat tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    UnsignedInt,
    SignedInt,
    Float,
    /// Any other code, including "void" (4) and complex types
    Other(u16),
}

impl SampleFormat {
    pub fn from_code(code: u16) -> Self {
        match code {
            sample_format::UNSIGNED => SampleFormat::UnsignedInt,
            sample_format::SIGNED => SampleFormat::SignedInt,
            sample_format::IEEEFP => SampleFormat::Float,
            other => SampleFormat::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            SampleFormat::UnsignedInt => sample_format::UNSIGNED,
            SampleFormat::SignedInt => sample_format::SIGNED,
            SampleFormat::Float => sample_format::IEEEFP,
            SampleFormat::Other(code) => *code,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFormat::UnsignedInt => write!(f, "unsigned integer"),
            SampleFormat::SignedInt => write!(f, "signed integer"),
            SampleFormat::Float => write!(f, "IEEE floating point"),
            SampleFormat::Other(code) => write!(f, "format {}", code),
        }
    }
}

/// Native numeric type of one raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ElementType {
    /// Size of one element in bytes
    pub fn size(&self) -> usize {
        match self {
            ElementType::UInt8 | ElementType::Int8 => 1,
            ElementType::UInt16 | ElementType::Int16 => 2,
            ElementType::UInt32 | ElementType::Int32 | ElementType::Float32 => 4,
            ElementType::UInt64 | ElementType::Int64 | ElementType::Float64 => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::UInt8 => "uint8",
            ElementType::UInt16 => "uint16",
            ElementType::UInt32 => "uint32",
            ElementType::UInt64 => "uint64",
            ElementType::Int8 => "int8",
            ElementType::Int16 => "int16",
            ElementType::Int32 => "int32",
            ElementType::Int64 => "int64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
        }
    }

    /// The HDF5 native type this element type stands in for
    pub fn hdf5_native_name(&self) -> &'static str {
        match self {
            ElementType::UInt8 => "H5T_NATIVE_UCHAR",
            ElementType::UInt16 => "H5T_NATIVE_USHORT",
            ElementType::UInt32 => "H5T_NATIVE_UINT",
            ElementType::UInt64 => "H5T_NATIVE_ULLONG",
            ElementType::Int8 => "H5T_NATIVE_SCHAR",
            ElementType::Int16 => "H5T_NATIVE_SHORT",
            ElementType::Int32 => "H5T_NATIVE_INT",
            ElementType::Int64 => "H5T_NATIVE_LLONG",
            ElementType::Float32 => "H5T_NATIVE_FLOAT",
            ElementType::Float64 => "H5T_NATIVE_DOUBLE",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a sample format and bit depth to an element type
///
/// Never fails; unsupported widths fall back within their family.
pub fn resolve_element_type(format: SampleFormat, bits_per_sample: u16) -> ElementType {
    match (format, bits_per_sample) {
        (SampleFormat::UnsignedInt, 16) => ElementType::UInt16,
        (SampleFormat::UnsignedInt, 32) => ElementType::UInt32,
        (SampleFormat::UnsignedInt, 64) => ElementType::UInt64,
        (SampleFormat::UnsignedInt, _) => ElementType::UInt8,
        (SampleFormat::SignedInt, 16) => ElementType::Int16,
        (SampleFormat::SignedInt, 32) => ElementType::Int32,
        (SampleFormat::SignedInt, 64) => ElementType::Int64,
        (SampleFormat::SignedInt, _) => ElementType::Int8,
        (SampleFormat::Float, 64) => ElementType::Float64,
        (SampleFormat::Float, _) => ElementType::Float32,
        (SampleFormat::Other(_), _) => ElementType::UInt8,
    }
}
