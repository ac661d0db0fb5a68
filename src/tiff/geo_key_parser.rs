//! GeoKey directory parsing
//!
//! GeoTIFF stores its georeferencing keys in a directory of SHORTs held by
//! GeoKeyDirectoryTag. Each key either carries its value inline or points
//! into GeoDoubleParamsTag or GeoAsciiParamsTag.

use log::debug;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geotags::{get_key_name, GeoKeyEntry, GeoKeyValue};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::string_utils;

/// Number of SHORTs in the directory header and in each key entry
const ENTRY_WIDTH: usize = 4;

/// Parser for GeoTIFF geographic metadata
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parse the GeoKey directory from an IFD
    ///
    /// Returns an empty list when the IFD carries no directory. The header
    /// holds version, revision, minor revision and key count; keys that the
    /// count promises but the tag does not hold are ignored.
    pub fn parse_geo_key_directory(
        reader: &mut dyn SeekableReader,
        tiff: &TiffReader,
        ifd: &IFD,
    ) -> TiffResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let directory: Vec<u16> = tiff
            .read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?
            .into_iter()
            .map(|v| v as u16)
            .collect();

        if directory.len() < ENTRY_WIDTH {
            return Err(TiffError::GenericError("Invalid GeoKey directory header".to_string()));
        }

        let (version, revision, minor_revision, declared) =
            (directory[0], directory[1], directory[2], directory[3] as usize);
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               version, revision, minor_revision, declared);

        let keys: Vec<GeoKeyEntry> = directory[ENTRY_WIDTH..]
            .chunks_exact(ENTRY_WIDTH)
            .take(declared)
            .map(|key| GeoKeyEntry::new(key[0], key[1], key[2], key[3]))
            .inspect(|key| debug!("GeoKey: id={} ({}), location={}, count={}, offset={}",
                                  key.key_id, get_key_name(key.key_id),
                                  key.tiff_tag_location, key.count, key.value_offset))
            .collect();

        if keys.len() < declared {
            debug!("GeoKey directory declares {} keys but holds {}", declared, keys.len());
        }

        Ok(keys)
    }

    /// Resolves the value of one GeoKey
    ///
    /// Location 0 means the value is the entry's own offset field; otherwise
    /// `count` values are taken from the referenced parameter tag starting at
    /// index `value_offset`.
    pub fn get_geo_key_value(
        reader: &mut dyn SeekableReader,
        tiff: &TiffReader,
        ifd: &IFD,
        key: &GeoKeyEntry,
    ) -> TiffResult<GeoKeyValue> {
        let start = key.value_offset as usize;
        let end = start + key.count as usize;

        match key.tiff_tag_location {
            0 => Ok(GeoKeyValue::Short(key.value_offset)),
            tags::GEO_KEY_DIRECTORY_TAG => {
                let values = tiff.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
                values.get(start)
                    .map(|v| GeoKeyValue::Short(*v as u16))
                    .ok_or_else(|| Self::out_of_range(key))
            }
            tags::GEO_DOUBLE_PARAMS_TAG => {
                let values = tiff.read_double_values(reader, ifd, tags::GEO_DOUBLE_PARAMS_TAG)?;
                values.get(start..end)
                    .map(|slice| GeoKeyValue::Double(slice.to_vec()))
                    .ok_or_else(|| Self::out_of_range(key))
            }
            tags::GEO_ASCII_PARAMS_TAG => {
                let bytes = tiff.read_ascii_bytes(reader, ifd, tags::GEO_ASCII_PARAMS_TAG)?;
                let slice = bytes.get(start..end.min(bytes.len()))
                    .ok_or_else(|| Self::out_of_range(key))?;
                Ok(GeoKeyValue::Ascii(string_utils::geo_ascii_value(slice)))
            }
            other => Err(TiffError::GenericError(format!(
                "GeoKey {} refers to unsupported tag {}", key.key_id, other
            ))),
        }
    }

    fn out_of_range(key: &GeoKeyEntry) -> TiffError {
        TiffError::GenericError(format!(
            "GeoKey {} value {}+{} lies outside its parameter tag",
            key.key_id, key.value_offset, key.count
        ))
    }
}
