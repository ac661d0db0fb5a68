//! Raster descriptor and georeferencing metadata

use std::fmt;

use crate::raster::element_type::{resolve_element_type, ElementType, SampleFormat};
use crate::raster::errors::{RasterError, RasterResult};
use crate::tiff::geotags::get_code_name;

/// Largest width or height accepted for a raster
pub const MAX_DIMENSION: u64 = 65_535;

/// Advisory georeferencing read from GeoTIFF keys and tags
///
/// Nothing here is validated against the raster dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoMetadata {
    /// GTModelTypeGeoKey
    pub model_type: Option<u16>,
    /// ProjectedCSTypeGeoKey
    pub projected_cs_code: Option<u16>,
    /// GeographicTypeGeoKey
    pub geographic_cs_code: Option<u16>,
    pub citation: Option<String>,
    /// First tie point as (i, j, k, x, y, z)
    pub tie_points: Option<[f64; 6]>,
    /// Pixel size as (x, y, z) in model units
    pub pixel_scale: Option<[f64; 3]>,
}

impl GeoMetadata {
    /// Whether any georeferencing was found
    pub fn is_empty(&self) -> bool {
        *self == GeoMetadata::default()
    }

    /// Upper-left model coordinate derived from the tie point and pixel scale
    pub fn origin(&self) -> Option<(f64, f64)> {
        let tie = self.tie_points?;
        let scale = self.pixel_scale?;
        Some((tie[3] - tie[0] * scale[0], tie[4] + tie[1] * scale[1]))
    }
}

impl fmt::Display for GeoMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "  No georeferencing");
        }
        if let Some(code) = self.model_type {
            writeln!(f, "  Model type: {} ({})", get_code_name("model_type", code), code)?;
        }
        if let Some(code) = self.projected_cs_code {
            writeln!(f, "  Projected CS: {}", get_code_name("projected_cs", code))?;
        }
        if let Some(code) = self.geographic_cs_code {
            writeln!(f, "  Geographic CS: {}", get_code_name("geographic_cs", code))?;
        }
        if let Some(citation) = &self.citation {
            writeln!(f, "  Citation: {}", citation)?;
        }
        if let Some(t) = &self.tie_points {
            writeln!(f, "  Tie point: ({}, {}, {}) -> ({}, {}, {})", t[0], t[1], t[2], t[3], t[4], t[5])?;
        }
        if let Some(s) = &self.pixel_scale {
            writeln!(f, "  Pixel scale: {} x {} x {}", s[0], s[1], s[2])?;
        }
        if let Some((x, y)) = self.origin() {
            writeln!(f, "  Origin: ({}, {})", x, y)?;
        }
        Ok(())
    }
}

/// Validated shape and sample description of a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterDescriptor {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u16,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    pub element_type: ElementType,
    pub geo: GeoMetadata,
}

impl RasterDescriptor {
    /// Builds a descriptor, failing when a dimension is outside 1..=65535
    ///
    /// A samples-per-pixel of 0 is taken as 1.
    pub fn new(
        width: u64,
        height: u64,
        samples_per_pixel: u16,
        bits_per_sample: u16,
        sample_format: SampleFormat,
        geo: GeoMetadata,
    ) -> RasterResult<Self> {
        let width = validate_dimension("width", width)?;
        let height = validate_dimension("height", height)?;

        Ok(RasterDescriptor {
            width,
            height,
            samples_per_pixel: samples_per_pixel.max(1),
            bits_per_sample,
            sample_format,
            element_type: resolve_element_type(sample_format, bits_per_sample),
            geo,
        })
    }

    /// Dimensions of the dataset: `[height, width]` or `[height, width, bands]`
    pub fn shape(&self) -> Vec<usize> {
        if self.samples_per_pixel == 1 {
            vec![self.height as usize, self.width as usize]
        } else {
            vec![self.height as usize, self.width as usize, self.samples_per_pixel as usize]
        }
    }
}

impl fmt::Display for RasterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster: {} x {}", self.width, self.height)?;
        writeln!(f, "  Samples per pixel: {}", self.samples_per_pixel)?;
        writeln!(f, "  Bits per sample: {}", self.bits_per_sample)?;
        writeln!(f, "  Sample format: {}", self.sample_format)?;
        writeln!(f, "  Element type: {} ({})", self.element_type, self.element_type.hdf5_native_name())?;
        write!(f, "{}", self.geo)
    }
}

/// Checks one dimension against 1..=65535
pub fn validate_dimension(name: &str, value: u64) -> RasterResult<u32> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(RasterError::InvalidRaster(format!(
            "{} {} outside 1..={}", name, value, MAX_DIMENSION
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(width: u64, height: u64) -> RasterResult<RasterDescriptor> {
        RasterDescriptor::new(width, height, 1, 8, SampleFormat::UnsignedInt, GeoMetadata::default())
    }

    #[test]
    fn test_dimension_bounds() {
        std::assert!(descriptor(1, 1).is_ok());
        std::assert!(descriptor(65535, 65535).is_ok());
        for (w, h) in [(0, 1), (1, 0), (65536, 1), (1, 65536)] {
            std::assert!(matches!(descriptor(w, h), Err(RasterError::InvalidRaster(_))), "{}x{}", w, h);
        }
    }

    #[test]
    fn test_shape_and_zero_bands() {
        let gray = descriptor(4, 3).unwrap();
        std::assert_eq!(gray.shape(), vec![3, 4]);

        let rgb = RasterDescriptor::new(2, 2, 3, 8, SampleFormat::UnsignedInt, GeoMetadata::default()).unwrap();
        std::assert_eq!(rgb.shape(), vec![2, 2, 3]);

        let zero = RasterDescriptor::new(2, 2, 0, 16, SampleFormat::SignedInt, GeoMetadata::default()).unwrap();
        std::assert_eq!(zero.samples_per_pixel, 1);
        std::assert_eq!(zero.element_type, ElementType::Int16);
    }

    #[test]
    fn test_origin_needs_tie_point_and_scale() {
        let mut geo = GeoMetadata::default();
        std::assert!(geo.is_empty());
        geo.tie_points = Some([0.0, 0.0, 0.0, 500000.0, 4000000.0, 0.0]);
        std::assert_eq!(geo.origin(), None);
        geo.pixel_scale = Some([30.0, 30.0, 0.0]);
        std::assert_eq!(geo.origin(), Some((500000.0, 4000000.0)));
        std::assert!(geo.to_string().contains("Origin"));
    }
}
