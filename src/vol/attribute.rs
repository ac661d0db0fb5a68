//! Attribute handles
//!
//! Attributes are placeholders: any name opens, the dataspace is scalar,
//! the type is a native char and there is no data behind it.

use log::debug;

use crate::raster::element_type::ElementType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
}

impl Attribute {
    pub(crate) fn new(name: &str) -> Self {
        Attribute { name: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scalar dataspace
    pub fn shape(&self) -> &[usize] {
        &[]
    }

    pub fn element_type(&self) -> ElementType {
        ElementType::Int8
    }

    /// Reads the attribute value; nothing is copied
    pub fn read(&self, _buf: &mut [u8]) -> usize {
        0
    }

    pub fn close(self) {
        debug!("Closing attribute {}", self.name);
    }
}
