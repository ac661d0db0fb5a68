//! End-to-end tests: a GeoTIFF on disk read through the connector

extern crate std;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use geotiff_vol::config::VolConfig;
use geotiff_vol::raster::{ElementType, RasterError};
use geotiff_vol::vol::{AccessFlags, ConnectorRegistry, GeoTiffFile, VolError, CONNECTOR_NAME, CONNECTOR_VALUE};

enum Value {
    Short(Vec<u16>),
    Long(Vec<u32>),
    Double(Vec<f64>),
    Ascii(&'static str),
}

/// Writes a little-endian classic TIFF with the given tags and strips
fn write_tiff(mut entries: Vec<(u16, Value)>, strips: &[Vec<u8>]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut offsets = Vec::new();
    let mut counts = Vec::new();
    for strip in strips {
        offsets.push(8 + data.len() as u32);
        counts.push(strip.len() as u32);
        data.extend_from_slice(strip);
    }
    entries.push((273, Value::Long(offsets)));
    entries.push((279, Value::Long(counts)));
    entries.sort_by_key(|(tag, _)| *tag);

    // Encoded payloads, with out-of-line values appended after the strips
    let mut encoded = Vec::new();
    for (tag, value) in &entries {
        let mut bytes = Vec::new();
        let (field_type, count) = match value {
            Value::Short(v) => {
                v.iter().for_each(|x| bytes.write_u16::<LittleEndian>(*x).unwrap());
                (3u16, v.len())
            }
            Value::Long(v) => {
                v.iter().for_each(|x| bytes.write_u32::<LittleEndian>(*x).unwrap());
                (4, v.len())
            }
            Value::Double(v) => {
                v.iter().for_each(|x| bytes.write_f64::<LittleEndian>(*x).unwrap());
                (12, v.len())
            }
            Value::Ascii(s) => {
                bytes.extend_from_slice(s.as_bytes());
                bytes.push(0);
                (2, bytes.len())
            }
        };
        encoded.push((*tag, field_type, count as u32, bytes));
    }

    let mut fields = Vec::new();
    for (_, _, _, bytes) in &encoded {
        if bytes.len() > 4 {
            fields.push(8 + data.len() as u32);
            data.extend_from_slice(bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        } else {
            let mut inline = bytes.clone();
            inline.resize(4, 0);
            fields.push(u32::from_le_bytes([inline[0], inline[1], inline[2], inline[3]]));
        }
    }

    let ifd_offset = 8 + data.len() as u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.write_u16::<LittleEndian>(42).unwrap();
    out.write_u32::<LittleEndian>(ifd_offset).unwrap();
    out.extend_from_slice(&data);
    out.write_u16::<LittleEndian>(encoded.len() as u16).unwrap();
    for ((tag, field_type, count, _), field) in encoded.iter().zip(&fields) {
        out.write_u16::<LittleEndian>(*tag).unwrap();
        out.write_u16::<LittleEndian>(*field_type).unwrap();
        out.write_u32::<LittleEndian>(*count).unwrap();
        out.write_u32::<LittleEndian>(*field).unwrap();
    }
    out.write_u32::<LittleEndian>(0).unwrap();
    out
}

/// Temporary file removed on drop
struct TempTiff {
    path: PathBuf,
}

impl TempTiff {
    fn new(name: &str, bytes: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("geotiff-vol-{}-{}.tif", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        TempTiff { path }
    }
}

impl Drop for TempTiff {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn gray_entries(width: u32, height: u32) -> Vec<(u16, Value)> {
    vec![
        (256, Value::Long(vec![width])),
        (257, Value::Long(vec![height])),
        (258, Value::Short(vec![8])),
        (259, Value::Short(vec![1])),
        (277, Value::Short(vec![1])),
    ]
}

/// 16-bit elevation model in UTM zone 33N, deflate compressed with a predictor
fn elevation_tiff() -> Vec<u8> {
    let (width, height) = (6u32, 4u32);
    let samples: Vec<u16> = (0..width * height).map(|i| 1000 + (i as u16) * 3).collect();

    let mut strips = Vec::new();
    for rows in samples.chunks((width * 2) as usize) {
        let mut raw = Vec::new();
        for row in rows.chunks(width as usize) {
            let mut previous = 0u16;
            for value in row {
                raw.write_u16::<LittleEndian>(value.wrapping_sub(previous)).unwrap();
                previous = *value;
            }
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        strips.push(encoder.finish().unwrap());
    }

    let entries = vec![
        (256, Value::Long(vec![width])),
        (257, Value::Long(vec![height])),
        (258, Value::Short(vec![16])),
        (259, Value::Short(vec![8])),
        (277, Value::Short(vec![1])),
        (278, Value::Long(vec![2])),
        (317, Value::Short(vec![2])),
        (339, Value::Short(vec![1])),
        (33550, Value::Double(vec![30.0, 30.0, 0.0])),
        (33922, Value::Double(vec![0.0, 0.0, 0.0, 500000.0, 4649776.0, 0.0])),
        (34735, Value::Short(vec![
            1, 1, 0, 3,
            1024, 0, 1, 1,
            3072, 0, 1, 32633,
            3073, 34737, 22, 0,
        ])),
        (34737, Value::Ascii("WGS 84 / UTM zone 33N|")),
    ];
    write_tiff(entries, &strips)
}

#[test]
fn test_registry_open_and_read() {
    let tiff = TempTiff::new("elevation", &elevation_tiff());

    let mut registry = ConnectorRegistry::new();
    let id = registry.register_by_value(CONNECTOR_VALUE).unwrap();
    std::assert!(registry.is_registered(CONNECTOR_NAME));

    let mut file = GeoTiffFile::open(&tiff.path, AccessFlags::READ_ONLY).unwrap();
    let descriptor = file.descriptor().clone();
    std::assert_eq!((descriptor.width, descriptor.height), (6, 4));
    std::assert_eq!(descriptor.element_type, ElementType::UInt16);

    let geo = file.geo();
    std::assert_eq!(geo.model_type, Some(1));
    std::assert_eq!(geo.projected_cs_code, Some(32633));
    std::assert_eq!(geo.citation.as_deref(), Some("WGS 84 / UTM zone 33N"));
    std::assert_eq!(geo.pixel_scale, Some([30.0, 30.0, 0.0]));
    std::assert_eq!(geo.origin(), Some((500000.0, 4649776.0)));

    let dataset = file.open_dataset("/image").unwrap();
    std::assert_eq!(dataset.shape(), &[4, 6]);
    std::assert_eq!(dataset.element_type(), ElementType::UInt16);

    let mut buf = vec![0u8; dataset.storage_size()];
    std::assert_eq!(dataset.read(&mut buf).unwrap(), 48);
    let values: Vec<u16> = buf.chunks(2).map(|c| u16::from_ne_bytes([c[0], c[1]])).collect();
    let expected: Vec<u16> = (0..24).map(|i| 1000 + i * 3).collect();
    std::assert_eq!(values, expected);

    dataset.close();
    file.close();

    registry.unregister(id).unwrap();
    std::assert!(!registry.is_registered(CONNECTOR_NAME));
}

#[test]
fn test_gray_image_in_two_strips() {
    let pixels: Vec<u8> = (0..20).collect();
    let mut entries = gray_entries(5, 4);
    entries.push((278, Value::Long(vec![3])));
    let tiff = TempTiff::new("gray", &write_tiff(entries, &[pixels[..15].to_vec(), pixels[15..].to_vec()]));

    let mut file = GeoTiffFile::open(&tiff.path, AccessFlags::READ_ONLY).unwrap();
    std::assert!(file.geo().is_empty());
    let dataset = file.open_dataset("image").unwrap();
    std::assert_eq!(dataset.data(), &pixels[..]);
}

#[test]
fn test_file_name_is_reported() {
    let tiff = TempTiff::new("name", &write_tiff(gray_entries(2, 2), &[vec![0; 4]]));
    let file = GeoTiffFile::open(&tiff.path, AccessFlags::READ_ONLY).unwrap();

    let expected = tiff.path.to_string_lossy().into_owned();
    std::assert_eq!(file.name(), expected);

    let mut buf = vec![0u8; expected.len() + 1];
    file.copy_name(&mut buf);
    std::assert_eq!(&buf[..expected.len()], expected.as_bytes());
    std::assert_eq!(buf[expected.len()], 0);
}

#[test]
fn test_unknown_objects_are_not_found() {
    let tiff = TempTiff::new("missing", &write_tiff(gray_entries(2, 2), &[vec![0; 4]]));
    let mut file = GeoTiffFile::open(&tiff.path, AccessFlags::READ_ONLY).unwrap();

    std::assert!(matches!(file.open_dataset("elevation"), Err(VolError::NotFound(_))));
    std::assert!(matches!(file.open_group("/subgroup"), Err(VolError::NotFound(_))));
}

#[test]
fn test_write_intent_is_refused() {
    let tiff = TempTiff::new("readonly", &write_tiff(gray_entries(2, 2), &[vec![0; 4]]));
    for flags in [AccessFlags::READ_WRITE, AccessFlags::TRUNCATE | AccessFlags::CREATE] {
        std::assert!(matches!(GeoTiffFile::open(&tiff.path, flags), Err(VolError::ReadOnly(_))));
    }
}

#[test]
fn test_configured_size_limit() {
    let tiff = TempTiff::new("limit", &write_tiff(gray_entries(8, 8), &[vec![1; 64]]));
    let config = VolConfig::from_toml_str("[materialize]\nmax_bytes = 63").unwrap();

    let mut file = GeoTiffFile::open_with_config(&tiff.path, AccessFlags::READ_ONLY, &config).unwrap();
    match file.open_dataset("image") {
        Err(VolError::Raster(RasterError::SizeLimitExceeded { size, limit })) => {
            std::assert_eq!(size, 64);
            std::assert_eq!(limit, 63);
        }
        other => std::panic!("expected SizeLimitExceeded, got {:?}", other.map(|d| d.storage_size())),
    }

    file.set_max_bytes(64);
    std::assert_eq!(file.open_dataset("image").unwrap().storage_size(), 64);
}

#[test]
fn test_not_a_tiff() {
    let tiff = TempTiff::new("garbage", b"this is not a tiff file");
    std::assert!(matches!(
        GeoTiffFile::open(&tiff.path, AccessFlags::READ_ONLY),
        Err(VolError::Raster(RasterError::FileError(_)))
    ));
}
