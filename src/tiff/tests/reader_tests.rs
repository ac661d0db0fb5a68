//! Tests for header and IFD parsing

extern crate std;

use std::io::Cursor;

use crate::tiff::constants::tags;
use crate::tiff::errors::TiffError;
use crate::tiff::reader::TiffReader;
use super::test_utils::{FixtureValue, TiffFixture};

fn dimensions_fixture() -> TiffFixture {
    TiffFixture::new()
        .tag(tags::IMAGE_WIDTH, FixtureValue::Long(vec![800]))
        .tag(tags::IMAGE_LENGTH, FixtureValue::Short(vec![600]))
}

#[test]
fn test_reads_classic_little_endian() {
    let mut cursor = dimensions_fixture().cursor();
    let (reader, ifd) = TiffReader::read(&mut cursor).unwrap();

    std::assert!(!reader.is_big_tiff());
    std::assert_eq!(ifd.entry_count(), 2);
    std::assert_eq!(reader.read_tag_value(&mut cursor, &ifd, tags::IMAGE_WIDTH).unwrap(), 800);
    std::assert_eq!(reader.read_tag_value(&mut cursor, &ifd, tags::IMAGE_LENGTH).unwrap(), 600);
}

#[test]
fn test_inline_short_in_big_endian_file() {
    // A big-endian SHORT sits in the first two bytes of the value field
    let mut cursor = dimensions_fixture().big_endian().cursor();
    let (reader, ifd) = TiffReader::read(&mut cursor).unwrap();

    std::assert_eq!(reader.read_tag_value(&mut cursor, &ifd, tags::IMAGE_LENGTH).unwrap(), 600);
    std::assert_eq!(reader.read_tag_value(&mut cursor, &ifd, tags::IMAGE_WIDTH).unwrap(), 800);
}

#[test]
fn test_reads_bigtiff_both_orders() {
    for fixture in [dimensions_fixture().big_tiff(), dimensions_fixture().big_tiff().big_endian()] {
        let mut cursor = fixture.cursor();
        let (reader, ifd) = TiffReader::read(&mut cursor).unwrap();

        std::assert!(reader.is_big_tiff());
        std::assert_eq!(reader.read_tag_value(&mut cursor, &ifd, tags::IMAGE_WIDTH).unwrap(), 800);
        std::assert_eq!(reader.read_tag_value(&mut cursor, &ifd, tags::IMAGE_LENGTH).unwrap(), 600);
    }
}

#[test]
fn test_out_of_line_values() {
    let fixture = dimensions_fixture()
        .tag(tags::BITS_PER_SAMPLE, FixtureValue::Short(vec![8, 16, 32]))
        .tag(tags::MODEL_PIXEL_SCALE_TAG, FixtureValue::Double(vec![30.0, 30.0, 0.0]))
        .tag(tags::GEO_ASCII_PARAMS_TAG, FixtureValue::Ascii("WGS 84|".to_string()));
    let mut cursor = fixture.big_endian().cursor();
    let (reader, ifd) = TiffReader::read(&mut cursor).unwrap();

    std::assert_eq!(reader.read_tag_values(&mut cursor, &ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![8, 16, 32]);
    std::assert_eq!(
        reader.read_double_values(&mut cursor, &ifd, tags::MODEL_PIXEL_SCALE_TAG).unwrap(),
        vec![30.0, 30.0, 0.0]
    );
    std::assert_eq!(reader.read_ascii(&mut cursor, &ifd, tags::GEO_ASCII_PARAMS_TAG).unwrap(), "WGS 84|");
}

#[test]
fn test_missing_tag_and_wrong_type() {
    let mut cursor = dimensions_fixture().cursor();
    let (reader, ifd) = TiffReader::read(&mut cursor).unwrap();

    std::assert!(matches!(
        reader.read_tag_value(&mut cursor, &ifd, tags::COMPRESSION),
        Err(TiffError::TagNotFound(tags::COMPRESSION))
    ));
    std::assert!(matches!(
        reader.read_double_values(&mut cursor, &ifd, tags::IMAGE_WIDTH),
        Err(TiffError::UnsupportedFieldType(_))
    ));
}

#[test]
fn test_rejects_unknown_version() {
    let mut bytes = dimensions_fixture().build();
    bytes[2] = 44;
    let result = TiffReader::read(&mut Cursor::new(bytes));
    std::assert!(matches!(result, Err(TiffError::UnsupportedVersion(44))));
}

#[test]
fn test_rejects_bad_bigtiff_offset_size() {
    let mut bytes = dimensions_fixture().big_tiff().build();
    bytes[4] = 4;
    let result = TiffReader::read(&mut Cursor::new(bytes));
    std::assert!(matches!(result, Err(TiffError::InvalidBigTIFFHeader)));
}

#[test]
fn test_rejects_missing_or_out_of_range_ifd() {
    let mut bytes = dimensions_fixture().build();
    bytes[4..8].copy_from_slice(&[0, 0, 0, 0]);
    let result = TiffReader::read(&mut Cursor::new(bytes.clone()));
    std::assert!(matches!(result, Err(TiffError::NoImageDirectory)));

    bytes[4..8].copy_from_slice(&0xFFFF_u32.to_le_bytes());
    std::assert!(TiffReader::read(&mut Cursor::new(bytes)).is_err());
}

#[test]
fn test_truncated_input_is_an_error() {
    let bytes = dimensions_fixture().build();
    let truncated = bytes[..bytes.len() - 10].to_vec();
    std::assert!(TiffReader::read(&mut Cursor::new(truncated)).is_err());
    std::assert!(TiffReader::read(&mut Cursor::new(b"II".to_vec())).is_err());
}
