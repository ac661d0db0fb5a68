//! TIFF file reader implementation
//!
//! Parses the header and the first Image File Directory, and decodes tag
//! values using the Strategy pattern for the file's byte order.

use log::{debug, info};
use std::io::{Cursor, SeekFrom};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::field_types;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::{self, TiffHeader};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::validation;
use crate::utils::{string_utils, tag_utils};

/// Largest entry count accepted for one IFD
const MAX_IFD_ENTRIES: u64 = 65_535;

/// Reader for TIFF and BigTIFF structure
///
/// Holds what was learned from the header; every method takes the
/// stream explicitly so the owner decides how it is shared.
pub struct TiffReader {
    /// Byte order handler chosen from the header
    byte_order_handler: Box<dyn ByteOrderHandler>,
    /// Parsed header
    header: TiffHeader,
    /// Size of the underlying stream, for bounds checks
    file_size: u64,
}

impl TiffReader {
    /// Reads the header and the first IFD from `reader`
    ///
    /// Only the first image is used; any further IFDs are noted in the
    /// log and otherwise ignored.
    pub fn read(reader: &mut dyn SeekableReader) -> TiffResult<(Self, IFD)> {
        debug!("TiffReader::read starting");
        reader.seek(SeekFrom::Start(0))?;

        let header = TiffHeader::read(reader)?;
        let file_size = validation::get_file_size(reader)?;

        if header.first_ifd_offset == 0 {
            return Err(TiffError::NoImageDirectory);
        }
        validation::validate_ifd_offset(header.first_ifd_offset, file_size)?;

        let tiff_reader = TiffReader {
            byte_order_handler: header.byte_order.create_handler(),
            header,
            file_size,
        };

        let ifd = tiff_reader.read_ifd(reader, header.first_ifd_offset, 0)?;

        match header::read_offset(reader, header.is_big_tiff, tiff_reader.handler()) {
            Ok(0) => {}
            Ok(next) => debug!("Ignoring further IFDs starting at offset {}", next),
            Err(e) => debug!("Could not read next IFD offset: {}", e),
        }

        info!("Read IFD with {} entries ({}, {})",
              ifd.entry_count(),
              if header.is_big_tiff { "BigTIFF" } else { "TIFF" },
              header.byte_order.name());

        Ok((tiff_reader, ifd))
    }

    /// Reads an IFD at `offset`, leaving the reader at its next-IFD field
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = self.read_ifd_entry_count(reader)?;
        debug!("IFD entry count: {}", entry_count);

        if entry_count > MAX_IFD_ENTRIES {
            return Err(TiffError::GenericError(format!(
                "IFD entry count {} exceeds limit {}", entry_count, MAX_IFD_ENTRIES
            )));
        }
        validation::validate_data_range(
            offset,
            header::ifd_size(entry_count, self.header.is_big_tiff),
            self.file_size,
        )?;

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }

        Ok(ifd)
    }

    /// Reads the entry count from an IFD
    fn read_ifd_entry_count(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        if self.header.is_big_tiff {
            Ok(self.handler().read_u64(reader)?)
        } else {
            Ok(self.handler().read_u16(reader)? as u64)
        }
    }

    /// Reads a single IFD entry, keeping the raw value field
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler();

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = header::read_offset(reader, self.header.is_big_tiff, handler)?;

        let mut value_field = vec![0u8; if self.header.is_big_tiff { 8 } else { 4 }];
        reader.read_exact(&mut value_field)?;

        let mut field_reader = Cursor::new(value_field.as_slice());
        let value_offset = header::read_offset(&mut field_reader, self.header.is_big_tiff, handler)?;

        Ok(IFDEntry::new(tag, field_type, count, value_offset, value_field))
    }

    /// Positions a reader over an entry's values
    ///
    /// Inline values are decoded from a cursor over the entry's value field;
    /// everything else is read from the stream at the entry's offset.
    fn with_value_reader<T>(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
        read: impl FnOnce(&mut dyn SeekableReader, &dyn ByteOrderHandler) -> TiffResult<T>,
    ) -> TiffResult<T> {
        if entry.is_value_inline() {
            let mut inline = Cursor::new(entry.value_field.as_slice());
            read(&mut inline, self.handler())
        } else {
            validation::validate_data_range(entry.value_offset, entry.data_size(), self.file_size)?;
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            read(reader, self.handler())
        }
    }

    /// Reads a tag's integer values as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;

        self.with_value_reader(reader, entry, |r, handler| {
            let mut values = Vec::new();
            tag_utils::read_tag_value_array(r, entry, handler, &mut values)?;
            Ok(values)
        })
    }

    /// Reads the first integer value of a tag
    pub fn read_tag_value(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<u64> {
        self.read_tag_values(reader, ifd, tag)?
            .first()
            .copied()
            .ok_or(TiffError::TagNotFound(tag))
    }

    /// Reads a tag's DOUBLE values
    pub fn read_double_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;

        self.with_value_reader(reader, entry, |r, handler| tag_utils::read_double_array(r, entry, handler))
    }

    /// Reads the raw bytes of an ASCII tag, with trailing NULs removed
    ///
    /// Bytes are returned undecoded so offsets into the value stay valid
    /// even when the text is not UTF-8.
    pub fn read_ascii_bytes(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u8>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        self.with_value_reader(reader, entry, |r, _| {
            let mut buffer = vec![0u8; entry.count as usize];
            r.read_exact(&mut buffer)?;
            string_utils::trim_trailing_nulls(&mut buffer);
            Ok(buffer)
        })
    }

    /// Reads an ASCII tag as text, with trailing NULs removed
    pub fn read_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let bytes = self.read_ascii_bytes(reader, ifd, tag)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads `length` raw bytes at `offset`, bounds-checked against the file
    pub fn read_bytes_at(&self, reader: &mut dyn SeekableReader, offset: u64, length: u64) -> TiffResult<Vec<u8>> {
        validation::validate_data_range(offset, length, self.file_size)?;
        reader.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; length as usize];
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Returns the byte order handler for this file
    pub fn handler(&self) -> &dyn ByteOrderHandler {
        self.byte_order_handler.as_ref()
    }

    /// Byte order of the file
    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.header.is_big_tiff
    }

    /// Size of the underlying stream in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }
}
