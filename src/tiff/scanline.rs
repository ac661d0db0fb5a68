//! Strip-based scanline decoding
//!
//! Stripped TIFFs store image rows in horizontal strips spanning the full
//! width. The decoder here reads one strip at a time, decompresses it,
//! converts samples to native byte order, undoes horizontal differencing and
//! then hands out single rows. The most recent strip is cached, so reading
//! rows in increasing order decompresses every strip exactly once.

use log::{debug, info};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{defaults, planar_config, predictor, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::tag_utils;

/// Row layout of the first image, read from its tags with baseline defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanlineLayout {
    /// Image width, 0 when the tag is absent
    pub width: u64,
    /// Image height, 0 when the tag is absent
    pub height: u64,
    pub samples_per_pixel: u16,
    pub bits_per_sample: u16,
    pub rows_per_strip: u64,
    pub compression: u64,
    pub predictor: u16,
    pub planar_configuration: u16,
    /// Whether the image is organised in tiles rather than strips
    pub tiled: bool,
    /// Byte order of multi-byte samples in the file
    pub byte_order: ByteOrder,
    /// Layout tags present in the IFD whose values could not be read
    pub unreadable_tags: Vec<u16>,
}

impl ScanlineLayout {
    /// Reads the layout tags from `ifd`
    ///
    /// Absent tags take their TIFF defaults. A tag that is present but
    /// unreadable also takes its default and is recorded, so the failure
    /// surfaces on the first scanline read rather than when the file opens.
    pub fn from_ifd(reader: &mut dyn SeekableReader, tiff: &TiffReader, ifd: &IFD) -> Self {
        let mut unreadable = Vec::new();
        let mut optional = |tag: u16, default: u64| -> u64 {
            if !ifd.has_tag(tag) {
                return default;
            }
            match tiff.read_tag_value(reader, ifd, tag) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Layout tag {} ({}) is unreadable: {}", tag, tag_utils::get_tag_name(tag), e);
                    unreadable.push(tag);
                    default
                }
            }
        };

        let width = optional(tags::IMAGE_WIDTH, 0);
        let height = optional(tags::IMAGE_LENGTH, 0);
        let samples_per_pixel = optional(tags::SAMPLES_PER_PIXEL, defaults::SAMPLES_PER_PIXEL as u64);
        let bits_per_sample = optional(tags::BITS_PER_SAMPLE, defaults::BITS_PER_SAMPLE as u64);
        let rows_per_strip = optional(tags::ROWS_PER_STRIP, height);
        let compression = optional(tags::COMPRESSION, defaults::COMPRESSION as u64);
        let predictor = optional(tags::PREDICTOR, defaults::PREDICTOR as u64);
        let planar_configuration = optional(tags::PLANAR_CONFIGURATION, defaults::PLANAR_CONFIGURATION as u64);

        let layout = ScanlineLayout {
            width,
            height,
            samples_per_pixel: u16::try_from(samples_per_pixel).unwrap_or(u16::MAX).max(1),
            bits_per_sample: u16::try_from(bits_per_sample).unwrap_or(u16::MAX),
            // RowsPerStrip of 0 or beyond the image means a single strip
            rows_per_strip: if rows_per_strip == 0 || rows_per_strip > height { height } else { rows_per_strip },
            compression,
            predictor: u16::try_from(predictor).unwrap_or(u16::MAX),
            planar_configuration: u16::try_from(planar_configuration).unwrap_or(u16::MAX),
            tiled: ifd.has_tag(tags::TILE_WIDTH) || ifd.has_tag(tags::TILE_OFFSETS),
            byte_order: tiff.byte_order(),
            unreadable_tags: unreadable,
        };
        debug!("Scanline layout: {:?}", layout);

        layout
    }

    /// Bytes in one decoded row, or 0 when it cannot be computed
    ///
    /// Separate-plane images count a single sample per pixel, since a
    /// scanline then covers one plane only.
    pub fn scanline_size(&self) -> u64 {
        let samples = if self.planar_configuration == planar_config::PLANAR {
            1
        } else {
            self.samples_per_pixel as u64
        };

        self.width
            .checked_mul(samples)
            .and_then(|n| n.checked_mul(self.bits_per_sample as u64))
            .and_then(|bits| bits.checked_add(7))
            .map(|bits| bits / 8)
            .unwrap_or(0)
    }

    /// Bytes per sample when samples are whole bytes
    fn bytes_per_sample(&self) -> Option<usize> {
        match self.bits_per_sample {
            8 | 16 | 32 | 64 => Some(self.bits_per_sample as usize / 8),
            _ => None,
        }
    }

    /// Rejects layouts the strip decoder cannot produce scanlines for
    pub fn check_supported(&self) -> TiffResult<()> {
        if let Some(tag) = self.unreadable_tags.first() {
            return Err(TiffError::UnsupportedLayout(format!(
                "tag {} ({}) could not be read", tag, tag_utils::get_tag_name(*tag)
            )));
        }
        if self.tiled {
            return Err(TiffError::UnsupportedLayout("tiled images cannot be read by scanline".to_string()));
        }
        if self.planar_configuration != planar_config::CHUNKY && self.samples_per_pixel > 1 {
            return Err(TiffError::UnsupportedLayout(format!(
                "planar configuration {}", self.planar_configuration
            )));
        }
        match self.predictor {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING if self.bytes_per_sample().is_some() => {}
            predictor::HORIZONTAL_DIFFERENCING => {
                return Err(TiffError::UnsupportedLayout(format!(
                    "horizontal predictor with {} bits per sample", self.bits_per_sample
                )));
            }
            other => return Err(TiffError::UnsupportedLayout(format!("predictor {}", other))),
        }
        if self.height == 0 || self.scanline_size() == 0 {
            return Err(TiffError::MissingDimensions);
        }

        Ok(())
    }

    /// Number of rows held by strip `strip`
    fn rows_in_strip(&self, strip: usize) -> u64 {
        let first_row = strip as u64 * self.rows_per_strip;
        self.rows_per_strip.min(self.height.saturating_sub(first_row))
    }
}

/// Sequential scanline reader over the strips of one image
pub struct StripDecoder {
    layout: ScanlineLayout,
    scanline_size: usize,
    handler: Box<dyn CompressionHandler>,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
    /// Most recently decoded strip
    cached: Option<(usize, Vec<u8>)>,
}

impl StripDecoder {
    /// Prepares a decoder, reading the strip offset and byte count tables
    pub fn new(
        reader: &mut dyn SeekableReader,
        tiff: &TiffReader,
        ifd: &IFD,
        layout: ScanlineLayout,
    ) -> TiffResult<Self> {
        layout.check_supported()?;

        let handler = CompressionFactory::create_handler(layout.compression)?;
        info!("Using compression: {} ({})", handler.name(),
              tag_utils::get_compression_name(layout.compression));

        let scanline_size = layout.scanline_size() as usize;
        let strip_count = layout.height.div_ceil(layout.rows_per_strip) as usize;

        let offsets = tiff.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = if ifd.has_tag(tags::STRIP_BYTE_COUNTS) {
            tiff.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?
        } else if layout.compression == defaults::COMPRESSION as u64 {
            // Uncompressed strips without counts hold exactly their rows
            (0..strip_count)
                .map(|strip| layout.rows_in_strip(strip) * scanline_size as u64)
                .collect()
        } else {
            return Err(TiffError::TagNotFound(tags::STRIP_BYTE_COUNTS));
        };

        if offsets.len() < strip_count || byte_counts.len() < strip_count {
            return Err(TiffError::GenericError(format!(
                "Expected {} strips, found {} offsets and {} byte counts",
                strip_count, offsets.len(), byte_counts.len()
            )));
        }
        debug!("Rows per strip: {}, strips: {}", layout.rows_per_strip, strip_count);

        Ok(StripDecoder {
            layout,
            scanline_size,
            handler,
            offsets,
            byte_counts,
            cached: None,
        })
    }

    /// Bytes in one decoded row
    pub fn scanline_size(&self) -> usize {
        self.scanline_size
    }

    /// Decodes row `row` into `buf`, which must be exactly one scanline long
    pub fn read_scanline(
        &mut self,
        reader: &mut dyn SeekableReader,
        tiff: &TiffReader,
        row: u32,
        buf: &mut [u8],
    ) -> TiffResult<()> {
        if row as u64 >= self.layout.height {
            return Err(TiffError::RowOutOfRange { row, height: self.layout.height as u32 });
        }
        if buf.len() != self.scanline_size {
            return Err(TiffError::GenericError(format!(
                "Scanline buffer holds {} bytes, expected {}", buf.len(), self.scanline_size
            )));
        }

        let strip = (row as u64 / self.layout.rows_per_strip) as usize;
        let row_in_strip = (row as u64 % self.layout.rows_per_strip) as usize;

        let strip_data = match self.cached.take() {
            Some((cached_strip, data)) if cached_strip == strip => data,
            _ => self.decode_strip(reader, tiff, strip)?,
        };

        let start = row_in_strip * self.scanline_size;
        buf.copy_from_slice(&strip_data[start..start + self.scanline_size]);
        self.cached = Some((strip, strip_data));
        Ok(())
    }

    /// Reads, decompresses and post-processes one strip
    fn decode_strip(&self, reader: &mut dyn SeekableReader, tiff: &TiffReader, strip: usize) -> TiffResult<Vec<u8>> {
        let rows = self.layout.rows_in_strip(strip) as usize;
        let needed = rows * self.scanline_size;

        debug!("Reading strip {} at offset {} with {} bytes",
               strip, self.offsets[strip], self.byte_counts[strip]);
        let compressed = tiff.read_bytes_at(reader, self.offsets[strip], self.byte_counts[strip])?;
        let mut data = self.handler.decompress(&compressed, needed)?;

        if data.len() < needed {
            return Err(TiffError::TruncatedStrip { strip, needed, available: data.len() });
        }

        if let Some(bytes_per_sample) = self.layout.bytes_per_sample() {
            self.layout.byte_order.samples_to_native(&mut data, bytes_per_sample);
            if self.layout.predictor == predictor::HORIZONTAL_DIFFERENCING {
                let stride = self.layout.samples_per_pixel as usize;
                for row in data.chunks_exact_mut(self.scanline_size) {
                    undo_horizontal_differencing(row, stride, bytes_per_sample);
                }
            }
        }

        Ok(data)
    }
}

macro_rules! accumulate_row {
    ($row:expr, $stride:expr, $ty:ty) => {{
        const SIZE: usize = std::mem::size_of::<$ty>();
        let samples = $row.len() / SIZE;
        for i in $stride..samples {
            let mut previous = [0u8; SIZE];
            previous.copy_from_slice(&$row[(i - $stride) * SIZE..(i - $stride + 1) * SIZE]);
            let mut current = [0u8; SIZE];
            current.copy_from_slice(&$row[i * SIZE..(i + 1) * SIZE]);

            let sum = <$ty>::from_ne_bytes(current).wrapping_add(<$ty>::from_ne_bytes(previous));
            $row[i * SIZE..(i + 1) * SIZE].copy_from_slice(&sum.to_ne_bytes());
        }
    }};
}

/// Undoes TIFF predictor 2 on one row of native-order samples
///
/// Each sample is stored as the difference from the same component of the
/// previous pixel, so `stride` is the number of samples per pixel.
pub fn undo_horizontal_differencing(row: &mut [u8], stride: usize, bytes_per_sample: usize) {
    match bytes_per_sample {
        1 => accumulate_row!(row, stride, u8),
        2 => accumulate_row!(row, stride, u16),
        4 => accumulate_row!(row, stride, u32),
        8 => accumulate_row!(row, stride, u64),
        _ => {}
    }
}
