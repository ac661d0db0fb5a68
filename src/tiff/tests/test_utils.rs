//! In-memory TIFF fixtures for tests

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::tiff::constants::{field_types, tags};

/// A tag value as it will be written to the fixture
#[derive(Debug, Clone)]
pub enum FixtureValue {
    Short(Vec<u16>),
    Long(Vec<u32>),
    Long8(Vec<u64>),
    Double(Vec<f64>),
    Ascii(String),
    /// ASCII tag holding arbitrary bytes, not necessarily UTF-8
    AsciiBytes(Vec<u8>),
}

/// Builder for small TIFF files with strip data
///
/// Layout: header, strip data, out-of-line tag values, then the single IFD.
#[derive(Debug, Clone, Default)]
pub struct TiffFixture {
    big_endian: bool,
    big_tiff: bool,
    entries: Vec<(u16, FixtureValue)>,
    strips: Vec<Vec<u8>>,
    omitted: Vec<u16>,
}

struct Sink {
    big_endian: bool,
    bytes: Vec<u8>,
}

impl Sink {
    fn u16(&mut self, v: u16) {
        if self.big_endian {
            self.bytes.write_u16::<BigEndian>(v).unwrap();
        } else {
            self.bytes.write_u16::<LittleEndian>(v).unwrap();
        }
    }

    fn u32(&mut self, v: u32) {
        if self.big_endian {
            self.bytes.write_u32::<BigEndian>(v).unwrap();
        } else {
            self.bytes.write_u32::<LittleEndian>(v).unwrap();
        }
    }

    fn u64(&mut self, v: u64) {
        if self.big_endian {
            self.bytes.write_u64::<BigEndian>(v).unwrap();
        } else {
            self.bytes.write_u64::<LittleEndian>(v).unwrap();
        }
    }

    fn f64(&mut self, v: f64) {
        if self.big_endian {
            self.bytes.write_f64::<BigEndian>(v).unwrap();
        } else {
            self.bytes.write_f64::<LittleEndian>(v).unwrap();
        }
    }

    fn offset(&mut self, big_tiff: bool, v: u64) {
        if big_tiff {
            self.u64(v);
        } else {
            self.u32(v as u32);
        }
    }
}

impl TiffFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grayscale 8-bit image stored as one uncompressed strip
    pub fn gray8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::new()
            .tag(tags::IMAGE_WIDTH, FixtureValue::Long(vec![width]))
            .tag(tags::IMAGE_LENGTH, FixtureValue::Long(vec![height]))
            .tag(tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![8]))
            .strips(vec![pixels])
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn big_tiff(mut self) -> Self {
        self.big_tiff = true;
        self
    }

    /// Adds or replaces a tag
    pub fn tag(mut self, tag: u16, value: FixtureValue) -> Self {
        self.entries.retain(|(t, _)| *t != tag);
        self.omitted.retain(|t| *t != tag);
        self.entries.push((tag, value));
        self
    }

    /// Removes a tag, including the strip tags added on build
    pub fn without(mut self, tag: u16) -> Self {
        self.entries.retain(|(t, _)| *t != tag);
        self.omitted.push(tag);
        self
    }

    /// Sets strip payloads; offsets and byte counts are added on build
    pub fn strips(mut self, strips: Vec<Vec<u8>>) -> Self {
        self.strips = strips;
        self
    }

    fn encode(&self, value: &FixtureValue) -> (u16, u64, Vec<u8>) {
        let mut sink = Sink { big_endian: self.big_endian, bytes: Vec::new() };
        let (field_type, count) = match value {
            FixtureValue::Short(v) => {
                v.iter().for_each(|x| sink.u16(*x));
                (field_types::SHORT, v.len())
            }
            FixtureValue::Long(v) => {
                v.iter().for_each(|x| sink.u32(*x));
                (field_types::LONG, v.len())
            }
            FixtureValue::Long8(v) => {
                v.iter().for_each(|x| sink.u64(*x));
                (field_types::LONG8, v.len())
            }
            FixtureValue::Double(v) => {
                v.iter().for_each(|x| sink.f64(*x));
                (field_types::DOUBLE, v.len())
            }
            FixtureValue::Ascii(s) => {
                sink.bytes.extend_from_slice(s.as_bytes());
                sink.bytes.push(0);
                (field_types::ASCII, s.len() + 1)
            }
            FixtureValue::AsciiBytes(b) => {
                sink.bytes.extend_from_slice(b);
                sink.bytes.push(0);
                (field_types::ASCII, b.len() + 1)
            }
        };
        (field_type, count as u64, sink.bytes)
    }

    /// Serializes the fixture
    pub fn build(&self) -> Vec<u8> {
        let inline_size = if self.big_tiff { 8 } else { 4 };
        let mut out = Sink { big_endian: self.big_endian, bytes: Vec::new() };

        out.bytes.extend_from_slice(if self.big_endian { b"MM" } else { b"II" });
        if self.big_tiff {
            out.u16(43);
            out.u16(8);
            out.u16(0);
            out.u64(0);
        } else {
            out.u16(42);
            out.u32(0);
        }

        let mut entries = self.entries.clone();
        if !self.strips.is_empty() {
            let mut offsets = Vec::new();
            for strip in &self.strips {
                offsets.push(out.bytes.len() as u64);
                out.bytes.extend_from_slice(strip);
            }
            let counts: Vec<u64> = self.strips.iter().map(|s| s.len() as u64).collect();
            let (offsets, counts) = if self.big_tiff {
                (FixtureValue::Long8(offsets), FixtureValue::Long8(counts))
            } else {
                (
                    FixtureValue::Long(offsets.iter().map(|v| *v as u32).collect()),
                    FixtureValue::Long(counts.iter().map(|v| *v as u32).collect()),
                )
            };
            for (tag, value) in [(tags::STRIP_OFFSETS, offsets), (tags::STRIP_BYTE_COUNTS, counts)] {
                if !self.omitted.contains(&tag) && !entries.iter().any(|(t, _)| *t == tag) {
                    entries.push((tag, value));
                }
            }
        }
        entries.sort_by_key(|(t, _)| *t);

        let mut encoded = Vec::new();
        for (tag, value) in &entries {
            let (field_type, count, mut bytes) = self.encode(value);
            if bytes.len() > inline_size {
                if out.bytes.len() % 2 == 1 {
                    out.bytes.push(0);
                }
                let offset = out.bytes.len() as u64;
                out.bytes.extend_from_slice(&bytes);
                let mut field = Sink { big_endian: self.big_endian, bytes: Vec::new() };
                field.offset(self.big_tiff, offset);
                bytes = field.bytes;
            } else {
                bytes.resize(inline_size, 0);
            }
            encoded.push((*tag, field_type, count, bytes));
        }

        if out.bytes.len() % 2 == 1 {
            out.bytes.push(0);
        }
        let ifd_offset = out.bytes.len() as u64;

        if self.big_tiff {
            out.u64(encoded.len() as u64);
        } else {
            out.u16(encoded.len() as u16);
        }
        for (tag, field_type, count, field) in encoded {
            out.u16(tag);
            out.u16(field_type);
            out.offset(self.big_tiff, count);
            out.bytes.extend_from_slice(&field);
        }
        out.offset(self.big_tiff, 0);

        // Patch the first IFD offset into the header
        let mut patch = Sink { big_endian: self.big_endian, bytes: Vec::new() };
        patch.offset(self.big_tiff, ifd_offset);
        let at = if self.big_tiff { 8 } else { 4 };
        out.bytes[at..at + patch.bytes.len()].copy_from_slice(&patch.bytes);

        out.bytes
    }

    pub fn cursor(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.build())
    }
}

/// Encodes 16-bit samples in the given file byte order
pub fn u16_samples(values: &[u16], big_endian: bool) -> Vec<u8> {
    let mut sink = Sink { big_endian, bytes: Vec::new() };
    values.iter().for_each(|v| sink.u16(*v));
    sink.bytes
}

/// Encodes 32-bit float samples in the given file byte order
pub fn f32_samples(values: &[f32], big_endian: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    for v in values {
        if big_endian {
            bytes.write_f32::<BigEndian>(*v).unwrap();
        } else {
            bytes.write_f32::<LittleEndian>(*v).unwrap();
        }
    }
    bytes
}

/// A GeoKey directory with the given (key, location, count, value) entries
pub fn geo_key_directory(keys: &[(u16, u16, u16, u16)]) -> FixtureValue {
    let mut values = vec![1, 1, 0, keys.len() as u16];
    for (key, location, count, value) in keys {
        values.extend_from_slice(&[*key, *location, *count, *value]);
    }
    FixtureValue::Short(values)
}
