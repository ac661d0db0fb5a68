//! Runtime configuration
//!
//! Settings are read from a TOML document:
//!
//! ```toml
//! [materialize]
//! max_bytes = 104857600
//!
//! [logging]
//! level = "info"
//! file = "geotiff-vol.log"
//! ```
//!
//! Missing sections and keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, LevelFilter};

use crate::raster::materializer::DEFAULT_MAX_BYTES;
use crate::vol::errors::{VolError, VolResult};

#[derive(Debug, Clone, PartialEq)]
pub struct VolConfig {
    /// Ceiling on a materialized raster in bytes
    pub max_bytes: u64,
    pub log_level: LevelFilter,
    /// Log file; console only when absent
    pub log_file: Option<PathBuf>,
}

impl Default for VolConfig {
    fn default() -> Self {
        VolConfig {
            max_bytes: DEFAULT_MAX_BYTES,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl VolConfig {
    /// Loads settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> VolResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|e| VolError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from TOML text
    pub fn from_toml_str(content: &str) -> VolResult<Self> {
        let value: toml::Value = content.parse()
            .map_err(|e| VolError::Config(format!("invalid TOML: {}", e)))?;

        let mut config = VolConfig::default();

        if let Some(section) = value.get("materialize") {
            if let Some(max_bytes) = section.get("max_bytes") {
                config.max_bytes = max_bytes.as_integer()
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| VolError::Config(format!(
                        "materialize.max_bytes must be a non-negative integer, got {}", max_bytes
                    )))?;
            }
        }

        if let Some(section) = value.get("logging") {
            if let Some(level) = section.get("level") {
                let name = level.as_str()
                    .ok_or_else(|| VolError::Config(format!("logging.level must be a string, got {}", level)))?;
                config.log_level = LevelFilter::from_str(name)
                    .map_err(|_| VolError::Config(format!("unknown log level '{}'", name)))?;
            }
            if let Some(file) = section.get("file") {
                let file = file.as_str()
                    .ok_or_else(|| VolError::Config(format!("logging.file must be a string, got {}", file)))?;
                config.log_file = Some(PathBuf::from(file));
            }
        }

        Ok(config)
    }
}

impl FromStr for VolConfig {
    type Err = VolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml_str(s)
    }
}
