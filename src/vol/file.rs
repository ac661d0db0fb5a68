//! File handles
//!
//! A `GeoTiffFile` is an open TIFF session plus the descriptor inspected on
//! open. It exposes the root group, the single `image` dataset and
//! placeholder attributes.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::BitOr;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::VolConfig;
use crate::io::seekable::SeekableReader;
use crate::raster::descriptor::{GeoMetadata, RasterDescriptor};
use crate::raster::inspector::inspect;
use crate::raster::materializer::Materializer;
use crate::tiff::tiff_raster::TiffRaster;
use crate::vol::attribute::Attribute;
use crate::vol::dataset::{Dataset, DATASET_NAME};
use crate::vol::errors::{VolError, VolResult};
use crate::vol::group::{Group, ROOT_GROUP};

/// File access intent, as a set of flag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessFlags(u32);

impl AccessFlags {
    pub const READ_ONLY: AccessFlags = AccessFlags(0);
    pub const READ_WRITE: AccessFlags = AccessFlags(0x0001);
    pub const TRUNCATE: AccessFlags = AccessFlags(0x0002);
    pub const EXCLUSIVE: AccessFlags = AccessFlags(0x0004);
    pub const CREATE: AccessFlags = AccessFlags(0x0010);

    const WRITE_INTENT: u32 = 0x0001 | 0x0002 | 0x0004 | 0x0010;

    pub fn from_bits(bits: u32) -> Self {
        AccessFlags(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: AccessFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any flag asks for modification of the file
    pub fn wants_write(&self) -> bool {
        self.0 & Self::WRITE_INTENT != 0
    }
}

impl BitOr for AccessFlags {
    type Output = AccessFlags;

    fn bitor(self, rhs: AccessFlags) -> AccessFlags {
        AccessFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// An open GeoTIFF file
pub struct GeoTiffFile<R: SeekableReader = BufReader<File>> {
    name: String,
    flags: AccessFlags,
    raster: TiffRaster<R>,
    descriptor: RasterDescriptor,
    max_bytes: u64,
}

impl GeoTiffFile<BufReader<File>> {
    /// Opens `path` read-only with default settings
    pub fn open<P: AsRef<Path>>(path: P, flags: AccessFlags) -> VolResult<Self> {
        Self::open_with_config(path, flags, &VolConfig::default())
    }

    /// Opens `path` read-only, taking the size ceiling from `config`
    pub fn open_with_config<P: AsRef<Path>>(path: P, flags: AccessFlags, config: &VolConfig) -> VolResult<Self> {
        let path = path.as_ref();
        check_read_only(flags)?;

        let raster = TiffRaster::open(path)?;
        let mut file = Self::from_raster(path.to_string_lossy().into_owned(), flags, raster)?;
        file.max_bytes = config.max_bytes;
        Ok(file)
    }

    /// Files are never created
    pub fn create<P: AsRef<Path>>(path: P, _flags: AccessFlags) -> VolResult<Self> {
        warn!("Refusing to create {}", path.as_ref().display());
        Err(VolError::Unsupported("creating GeoTIFF files".to_string()))
    }
}

impl<R: SeekableReader> GeoTiffFile<R> {
    /// Wraps an already open session, inspecting its raster
    pub fn from_raster(name: String, flags: AccessFlags, mut raster: TiffRaster<R>) -> VolResult<Self> {
        check_read_only(flags)?;

        let descriptor = inspect(&mut raster)?;
        info!("Opened {} ({}x{} {})", name, descriptor.width, descriptor.height, descriptor.element_type);

        Ok(GeoTiffFile {
            name,
            flags,
            raster,
            descriptor,
            max_bytes: VolConfig::default().max_bytes,
        })
    }

    /// Name the file was opened with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copies the file name into `buf` as a NUL-terminated string
    ///
    /// The name is truncated to fit; returns the full name length.
    pub fn copy_name(&self, buf: &mut [u8]) -> usize {
        let bytes = self.name.as_bytes();
        if let Some(room) = buf.len().checked_sub(1) {
            let n = bytes.len().min(room);
            buf[..n].copy_from_slice(&bytes[..n]);
            buf[n] = 0;
        }
        bytes.len()
    }

    pub fn flags(&self) -> AccessFlags {
        self.flags
    }

    pub fn descriptor(&self) -> &RasterDescriptor {
        &self.descriptor
    }

    pub fn geo(&self) -> &GeoMetadata {
        &self.descriptor.geo
    }

    /// Listing of the storage layout, GeoTIFF tags and GeoKeys
    pub fn geo_report(&mut self) -> VolResult<String> {
        Ok(self.raster.geo_report()?)
    }

    /// Size ceiling applied when datasets are opened
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn set_max_bytes(&mut self, max_bytes: u64) {
        self.max_bytes = max_bytes;
    }

    /// Opens a group; only the root exists
    pub fn open_group(&self, name: &str) -> VolResult<Group> {
        if name != ROOT_GROUP {
            return Err(VolError::NotFound(format!("group '{}'", name)));
        }
        Ok(Group::new(name))
    }

    /// Opens the image dataset, decoding it with the file's size ceiling
    pub fn open_dataset(&mut self, name: &str) -> VolResult<Dataset> {
        let materializer = Materializer::new().with_max_bytes(self.max_bytes);
        self.open_dataset_with(name, materializer)
    }

    /// Opens the image dataset with a caller-configured materializer
    pub fn open_dataset_with(&mut self, name: &str, mut materializer: Materializer<'_>) -> VolResult<Dataset> {
        let normalized = name.strip_prefix('/').unwrap_or(name);
        if normalized != DATASET_NAME {
            return Err(VolError::NotFound(format!("dataset '{}'", name)));
        }

        debug!("Materializing dataset {} of {}", name, self.name);
        let raster = materializer.materialize(&mut self.raster, &self.descriptor)?;
        Ok(Dataset::new(normalized, raster))
    }

    /// Opens an attribute; every name yields an empty placeholder
    pub fn open_attribute(&self, name: &str) -> VolResult<Attribute> {
        Ok(Attribute::new(name))
    }

    /// Closes the file and its TIFF session
    pub fn close(self) {
        debug!("Closing {}", self.name);
        self.raster.close();
    }
}

fn check_read_only(flags: AccessFlags) -> VolResult<()> {
    if flags.wants_write() {
        return Err(VolError::ReadOnly(format!("access flags {} request write access", flags)));
    }
    Ok(())
}
