//! GeoTIFF tag definitions and utilities
//!
//! This module provides the GeoKey directory entry type and display names
//! for GeoTIFF tags, keys and code values.

use std::collections::HashMap;
use lazy_static::lazy_static;

use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};

lazy_static! {
    // Parse the embedded TOML once, on first lookup
    static ref GEOTIFF_DEFINITIONS: GeoTiffDefinitions = {
        let content = include_str!("../../geotiff_keys.toml");
        GeoTiffDefinitions::from_str(content).unwrap_or_else(|e| {
            log::warn!("Failed to parse GeoTIFF key definitions: {}", e);
            GeoTiffDefinitions::default()
        })
    };
}

/// Container for GeoTIFF tag and key definitions
#[derive(Debug, Default)]
pub struct GeoTiffDefinitions {
    // Maps tag IDs to tag names
    pub tag_names: HashMap<u16, String>,
    // Maps GeoKey IDs to key names
    pub key_names: HashMap<u16, String>,
    // Maps model type codes to names
    pub model_type_names: HashMap<u16, String>,
    // Maps geographic CS codes to names
    pub geographic_cs_names: HashMap<u16, String>,
    // Maps projected CS codes to names
    pub projected_cs_names: HashMap<u16, String>,
}

impl GeoTiffDefinitions {
    /// Parse GeoTIFF definitions from a TOML string
    pub fn from_str(content: &str) -> TiffResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(TiffError::GenericError(format!("Failed to parse TOML: {}", e))),
        };

        let mut defs = GeoTiffDefinitions::default();

        Self::parse_code_table(&toml_value, "tag_ids", &mut defs.tag_names);
        Self::parse_code_table(&toml_value, "key_ids", &mut defs.key_names);
        Self::parse_code_table(&toml_value, "model_type_codes", &mut defs.model_type_names);
        Self::parse_code_table(&toml_value, "geographic_cs_codes", &mut defs.geographic_cs_names);
        Self::parse_code_table(&toml_value, "projected_cs_codes", &mut defs.projected_cs_names);

        Ok(defs)
    }

    /// Helper to parse code tables from TOML
    fn parse_code_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u16, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }

    /// Get a tag name by ID
    pub fn get_tag_name(&self, tag_id: u16) -> String {
        self.tag_names.get(&tag_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown-{}", tag_id))
    }

    /// Get a GeoKey name by ID
    pub fn get_key_name(&self, key_id: u16) -> String {
        self.key_names.get(&key_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown-{}", key_id))
    }

    /// Get a code name from the appropriate table, or the bare number
    pub fn get_code_name(&self, code_type: &str, code_id: u16) -> String {
        let lookup_result = match code_type {
            "model_type" => self.model_type_names.get(&code_id),
            "geographic_cs" => self.geographic_cs_names.get(&code_id),
            "projected_cs" => self.projected_cs_names.get(&code_id),
            _ => None,
        };

        lookup_result.map_or_else(
            || format!("{}", code_id),
            |s| s.clone()
        )
    }
}

/// Represents a GeoKey entry in a GeoKey directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

impl GeoKeyEntry {
    /// Create a new GeoKey entry
    pub fn new(key_id: u16, tiff_tag_location: u16, count: u16, value_offset: u16) -> Self {
        GeoKeyEntry {
            key_id,
            tiff_tag_location,
            count,
            value_offset,
        }
    }

    /// Get the name of this key
    pub fn get_name(&self) -> String {
        get_key_name(self.key_id)
    }
}

/// A decoded GeoKey value
#[derive(Debug, Clone, PartialEq)]
pub enum GeoKeyValue {
    /// SHORT value stored directly in the directory
    Short(u16),
    /// Values from GeoDoubleParamsTag
    Double(Vec<f64>),
    /// Text from GeoAsciiParamsTag, terminator stripped
    Ascii(String),
}

impl GeoKeyValue {
    pub fn as_short(&self) -> Option<u16> {
        match self {
            GeoKeyValue::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            GeoKeyValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

/// Check if a tag is a GeoTIFF tag
pub fn is_geotiff_tag(tag: u16) -> bool {
    matches!(tag,
        tags::MODEL_PIXEL_SCALE_TAG |
        tags::MODEL_TRANSFORMATION_TAG |
        tags::MODEL_TIEPOINT_TAG |
        tags::GEO_KEY_DIRECTORY_TAG |
        tags::GEO_DOUBLE_PARAMS_TAG |
        tags::GEO_ASCII_PARAMS_TAG)
}

/// Get a GeoTIFF tag name
pub fn get_tag_name(tag: u16) -> String {
    GEOTIFF_DEFINITIONS.get_tag_name(tag)
}

/// Get a GeoKey name
pub fn get_key_name(key: u16) -> String {
    GEOTIFF_DEFINITIONS.get_key_name(key)
}

/// Get a code name
pub fn get_code_name(code_type: &str, code: u16) -> String {
    GEOTIFF_DEFINITIONS.get_code_name(code_type, code)
}
