//! String utility functions
//!
//! Utilities for working with strings and text data.

/// Trims trailing null characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Decodes one value of GeoAsciiParamsTag
///
/// Values in the parameter block end with '|', which is not part of the value.
pub fn geo_ascii_value(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['|', '\0'])
        .to_string()
}
