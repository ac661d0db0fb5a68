//! Metadata inspection
//!
//! Reads the baseline tags that describe a raster's samples, plus whatever
//! georeferencing the file carries, and produces a validated descriptor.

use log::{debug, info};

use crate::raster::descriptor::{GeoMetadata, RasterDescriptor};
use crate::raster::element_type::SampleFormat;
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::source::RasterSource;
use crate::tiff::constants::{defaults, geo_keys, tags};
use crate::tiff::geotags::get_key_name;

/// Reads the raster description from `source`
///
/// Width and height are mandatory; the remaining sample tags fall back to
/// their TIFF defaults and georeferencing is read best-effort.
pub fn inspect(source: &mut dyn RasterSource) -> RasterResult<RasterDescriptor> {
    let width = source.tag(tags::IMAGE_WIDTH)
        .ok_or_else(|| RasterError::InvalidRaster("missing ImageWidth".to_string()))?;
    let height = source.tag(tags::IMAGE_LENGTH)
        .ok_or_else(|| RasterError::InvalidRaster("missing ImageLength".to_string()))?;

    let samples_per_pixel = short_tag(source, tags::SAMPLES_PER_PIXEL, defaults::SAMPLES_PER_PIXEL);
    let bits_per_sample = short_tag(source, tags::BITS_PER_SAMPLE, defaults::BITS_PER_SAMPLE);
    let sample_format = SampleFormat::from_code(short_tag(source, tags::SAMPLE_FORMAT, defaults::SAMPLE_FORMAT));

    let descriptor = RasterDescriptor::new(
        width,
        height,
        samples_per_pixel,
        bits_per_sample,
        sample_format,
        read_geo_metadata(source),
    )?;

    info!("Raster {}x{}, {} sample(s) of {} bits ({}), element type {}",
          descriptor.width, descriptor.height, descriptor.samples_per_pixel,
          descriptor.bits_per_sample, descriptor.sample_format, descriptor.element_type);

    Ok(descriptor)
}

/// Reads a SHORT tag, using `default` when it is absent, zero or too wide
fn short_tag(source: &mut dyn RasterSource, tag: u16, default: u16) -> u16 {
    match source.tag(tag).map(u16::try_from) {
        Some(Ok(0)) | None => default,
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            debug!("Tag {} does not fit a SHORT, using default {}", tag, default);
            default
        }
    }
}

/// Reads the optional georeferencing keys and tags
pub fn read_geo_metadata(source: &mut dyn RasterSource) -> GeoMetadata {
    let mut geo = GeoMetadata {
        model_type: short_key(source, geo_keys::MODEL_TYPE),
        projected_cs_code: short_key(source, geo_keys::PROJECTED_CS_TYPE),
        geographic_cs_code: short_key(source, geo_keys::GEOGRAPHIC_TYPE),
        ..GeoMetadata::default()
    };

    geo.citation = [geo_keys::CITATION, geo_keys::PCS_CITATION, geo_keys::GEOG_CITATION]
        .into_iter()
        .find_map(|key| {
            let citation = source.geo_key(key)?.as_ascii()?.to_string();
            info!("{}: {}", get_key_name(key), citation);
            Some(citation)
        });

    if let Some(values) = source.double_values(tags::MODEL_TIEPOINT_TAG) {
        if let Some(first) = values.get(..6) {
            let mut tie = [0.0; 6];
            tie.copy_from_slice(first);
            info!("Tie point: ({}, {}, {}) -> ({}, {}, {})", tie[0], tie[1], tie[2], tie[3], tie[4], tie[5]);
            geo.tie_points = Some(tie);
        }
    }

    if let Some(values) = source.double_values(tags::MODEL_PIXEL_SCALE_TAG) {
        if let Some(first) = values.get(..3) {
            let mut scale = [0.0; 3];
            scale.copy_from_slice(first);
            info!("Pixel scale: {} x {} x {}", scale[0], scale[1], scale[2]);
            geo.pixel_scale = Some(scale);
        }
    }

    geo
}

fn short_key(source: &mut dyn RasterSource, key: u16) -> Option<u16> {
    let value = source.geo_key(key)?.as_short()?;
    info!("{}: {}", get_key_name(key), value);
    Some(value)
}
