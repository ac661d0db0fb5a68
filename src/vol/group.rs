//! Group handles

use log::debug;

/// Name of the root group, the only group a GeoTIFF file has
pub const ROOT_GROUP: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
}

impl Group {
    pub(crate) fn new(name: &str) -> Self {
        Group { name: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn close(self) {
        debug!("Closing group {}", self.name);
    }
}
