//! Open TIFF codec session
//!
//! `TiffRaster` owns the stream, the parsed header and the first IFD of a
//! TIFF file, and answers tag, GeoKey and scanline queries against them.

use std::fmt::Write;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};

use crate::io::seekable::SeekableReader;
use crate::raster::source::RasterSource;
use crate::tiff::errors::TiffResult;
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::geotags::{self, is_geotiff_tag, GeoKeyEntry, GeoKeyValue};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::scanline::{ScanlineLayout, StripDecoder};
use crate::utils::tag_utils;

/// Read buffer used for files opened by path
const FILE_BUFFER_CAPACITY: usize = 1024 * 1024;

/// A TIFF file opened for reading its first image
pub struct TiffRaster<R: SeekableReader> {
    reader: R,
    tiff: TiffReader,
    ifd: IFD,
    layout: ScanlineLayout,
    /// Created on the first scanline read, so unsupported layouts fail there
    decoder: Option<StripDecoder>,
    /// Parsed on first use
    geo_keys: Option<Vec<GeoKeyEntry>>,
}

impl TiffRaster<BufReader<File>> {
    /// Opens the TIFF file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let path = path.as_ref();
        info!("Opening TIFF file: {}", path.display());

        let file = File::open(path)?;
        Self::from_reader(BufReader::with_capacity(FILE_BUFFER_CAPACITY, file))
    }
}

impl<R: SeekableReader> TiffRaster<R> {
    /// Parses the header and first IFD from an already open stream
    pub fn from_reader(mut reader: R) -> TiffResult<Self> {
        let (tiff, ifd) = TiffReader::read(&mut reader)?;
        let layout = ScanlineLayout::from_ifd(&mut reader, &tiff, &ifd);

        Ok(TiffRaster {
            reader,
            tiff,
            ifd,
            layout,
            decoder: None,
            geo_keys: None,
        })
    }

    /// Releases the session
    pub fn close(self) {
        debug!("Closing TIFF session");
    }

    /// The first image directory
    pub fn ifd(&self) -> &IFD {
        &self.ifd
    }

    /// Row layout of the first image
    pub fn layout(&self) -> &ScanlineLayout {
        &self.layout
    }

    /// Whether the file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.tiff.is_big_tiff()
    }

    /// All integer values of a tag
    pub fn tag_values(&mut self, tag: u16) -> TiffResult<Vec<u64>> {
        self.tiff.read_tag_values(&mut self.reader, &self.ifd, tag)
    }

    /// The GeoKey directory entries, empty when the file has none
    pub fn geo_keys(&mut self) -> TiffResult<&[GeoKeyEntry]> {
        if self.geo_keys.is_none() {
            let keys = GeoKeyParser::parse_geo_key_directory(&mut self.reader, &self.tiff, &self.ifd)?;
            self.geo_keys = Some(keys);
        }
        Ok(self.geo_keys.as_deref().unwrap_or_default())
    }

    /// Resolves the value of GeoKey `key_id`, `Ok(None)` when it is absent
    pub fn geo_key_value(&mut self, key_id: u16) -> TiffResult<Option<GeoKeyValue>> {
        let key = match self.geo_keys()?.iter().find(|k| k.key_id == key_id) {
            Some(key) => key.clone(),
            None => return Ok(None),
        };

        GeoKeyParser::get_geo_key_value(&mut self.reader, &self.tiff, &self.ifd, &key).map(Some)
    }

    /// Human-readable listing of the storage layout, GeoTIFF tags and GeoKeys
    pub fn geo_report(&mut self) -> TiffResult<String> {
        let mut out = String::new();
        let layout = &self.layout;
        let _ = writeln!(out, "{} {}, strips of {} rows, compression {}, predictor {}",
                         if self.is_big_tiff() { "BigTIFF" } else { "TIFF" },
                         layout.byte_order.name(),
                         layout.rows_per_strip,
                         tag_utils::get_compression_name(layout.compression),
                         layout.predictor);

        for entry in self.ifd.entries.iter().filter(|e| is_geotiff_tag(e.tag)) {
            let _ = writeln!(out, "{} ({}): {} values", geotags::get_tag_name(entry.tag), entry.tag, entry.count);
        }

        let keys = self.geo_keys()?.to_vec();
        for key in &keys {
            let value = match GeoKeyParser::get_geo_key_value(&mut self.reader, &self.tiff, &self.ifd, key) {
                Ok(GeoKeyValue::Short(v)) => v.to_string(),
                Ok(GeoKeyValue::Double(v)) => format!("{:?}", v),
                Ok(GeoKeyValue::Ascii(s)) => format!("\"{}\"", s),
                Err(e) => format!("<{}>", e),
            };
            let _ = writeln!(out, "  {} ({}): {}", key.get_name(), key.key_id, value);
        }

        Ok(out)
    }
}

impl<R: SeekableReader> RasterSource for TiffRaster<R> {
    fn tag(&mut self, tag: u16) -> Option<u64> {
        if !self.ifd.has_tag(tag) {
            return None;
        }
        match self.tiff.read_tag_value(&mut self.reader, &self.ifd, tag) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Could not read tag {}: {}", tag, e);
                None
            }
        }
    }

    fn geo_key(&mut self, key_id: u16) -> Option<GeoKeyValue> {
        match self.geo_key_value(key_id) {
            Ok(value) => value,
            Err(e) => {
                debug!("Could not read GeoKey {}: {}", key_id, e);
                None
            }
        }
    }

    fn double_values(&mut self, tag: u16) -> Option<Vec<f64>> {
        if !self.ifd.has_tag(tag) {
            return None;
        }
        match self.tiff.read_double_values(&mut self.reader, &self.ifd, tag) {
            Ok(values) => Some(values),
            Err(e) => {
                debug!("Could not read DOUBLE tag {}: {}", tag, e);
                None
            }
        }
    }

    fn scanline_size(&mut self) -> u64 {
        self.layout.scanline_size()
    }

    fn read_scanline(&mut self, row: u32, buf: &mut [u8]) -> TiffResult<()> {
        let decoder = match self.decoder.take() {
            Some(decoder) => decoder,
            None => StripDecoder::new(&mut self.reader, &self.tiff, &self.ifd, self.layout.clone())?,
        };

        self.decoder.insert(decoder).read_scanline(&mut self.reader, &self.tiff, row, buf)
    }
}
