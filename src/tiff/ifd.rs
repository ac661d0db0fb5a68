//! Image File Directory (IFD)
//!
//! The first IFD of a file describes the image this crate decodes. Each
//! entry either carries its values inline, in the entry's value field, or
//! points at the file offset where they live.

use std::collections::HashMap;
use std::fmt;
use log::{debug, trace};

use crate::tiff::constants::field_types;
use crate::utils::tag_utils;

/// One image directory, with entries in file order
#[derive(Debug, Clone)]
pub struct IFD {
    pub entries: Vec<IFDEntry>,
    /// 0-based position in the IFD chain
    pub number: usize,
    pub offset: u64,
    by_tag: HashMap<u16, usize>,
}

/// One tag of an IFD
///
/// `value_field` holds the raw bytes of the entry's value/offset field,
/// 4 bytes for classic TIFF and 8 for BigTIFF, still in file byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IFDEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u64,
    /// Offset of the values when they do not fit inline
    pub value_offset: u64,
    pub value_field: Vec<u8>,
}

impl IFDEntry {
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64, value_field: Vec<u8>) -> Self {
        let entry = IFDEntry { tag, field_type, count, value_offset, value_field };
        trace!("Read entry {}", entry);
        entry
    }

    /// Bytes per value of the entry's field type
    pub fn get_field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE
            | field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
            other => {
                debug!("Unknown field type {} on tag {}, assuming 1 byte", other, self.tag);
                1
            }
        }
    }

    /// Size of all values in bytes; saturates for corrupt counts
    pub fn data_size(&self) -> u64 {
        (self.get_field_type_size() as u64).saturating_mul(self.count)
    }

    /// Whether the values sit in the value field rather than at `value_offset`
    pub fn is_value_inline(&self) -> bool {
        self.data_size() <= self.value_field.len() as u64
    }
}

impl fmt::Display for IFDEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {} x{}",
               self.tag, tag_utils::get_tag_name(self.tag),
               tag_utils::get_field_type_name(self.field_type), self.count)?;
        if !self.is_value_inline() {
            write!(f, " @{}", self.value_offset)?;
        }
        Ok(())
    }
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        IFD {
            entries: Vec::new(),
            number,
            offset,
            by_tag: HashMap::new(),
        }
    }

    /// Appends an entry; a repeated tag shadows the earlier one on lookup
    pub fn add_entry(&mut self, entry: IFDEntry) {
        if self.by_tag.insert(entry.tag, self.entries.len()).is_some() {
            debug!("IFD #{} repeats tag {}", self.number, entry.tag);
        }
        self.entries.push(entry);
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.by_tag.contains_key(&tag)
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.by_tag.get(&tag).and_then(|&index| self.entries.get(index))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} at offset {}, {} entries", self.number, self.offset, self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry)?;
        }
        Ok(())
    }
}
