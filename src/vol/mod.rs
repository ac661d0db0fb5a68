//! Object-model adapter
//!
//! Presents a GeoTIFF file as a read-only hierarchical container: a root
//! group holding one dataset, `image`, backed by the materialized raster.

pub mod attribute;
pub mod connector;
pub mod dataset;
pub mod errors;
pub mod file;
pub mod group;

pub use attribute::Attribute;
pub use connector::{ConnectorId, ConnectorInfo, ConnectorRegistry, CONNECTOR_NAME, CONNECTOR_VALUE};
pub use dataset::{Dataset, DATASET_NAME};
pub use errors::{VolError, VolResult};
pub use file::{AccessFlags, GeoTiffFile};
pub use group::{Group, ROOT_GROUP};
