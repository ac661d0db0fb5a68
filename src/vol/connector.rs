//! Connector descriptor and registration
//!
//! `ConnectorInfo` is the static description of the GeoTIFF connector. The
//! registry tracks which connectors are registered, with a reference count
//! per connector so repeated registrations need matching unregistrations.

use std::collections::HashMap;

use log::{debug, info};

use crate::vol::errors::{VolError, VolResult};

/// Name under which the GeoTIFF connector registers
pub const CONNECTOR_NAME: &str = "geotiff_vol_connector";

/// Numeric class value of the GeoTIFF connector
pub const CONNECTOR_VALUE: u32 = 12203;

/// Static description of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorInfo {
    pub name: &'static str,
    pub value: u32,
    /// Connector version
    pub version: u32,
    /// Version of the class layout the connector was written against
    pub class_version: u32,
    /// Optional-operation capability bits; none are offered
    pub capability_flags: u64,
}

impl ConnectorInfo {
    /// Descriptor of the GeoTIFF connector
    pub const fn geotiff() -> Self {
        ConnectorInfo {
            name: CONNECTOR_NAME,
            value: CONNECTOR_VALUE,
            version: 1,
            class_version: 3,
            capability_flags: 0,
        }
    }
}

impl Default for ConnectorInfo {
    fn default() -> Self {
        Self::geotiff()
    }
}

/// Identifier handed out on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorId(u64);

impl ConnectorId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Registration {
    info: ConnectorInfo,
    references: usize,
}

/// Registry of available and registered connectors
#[derive(Debug)]
pub struct ConnectorRegistry {
    available: Vec<ConnectorInfo>,
    registered: HashMap<ConnectorId, Registration>,
    next_id: u64,
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorRegistry {
    /// Registry that knows the GeoTIFF connector
    pub fn new() -> Self {
        Self::with_connectors(vec![ConnectorInfo::geotiff()])
    }

    pub fn with_connectors(available: Vec<ConnectorInfo>) -> Self {
        ConnectorRegistry {
            available,
            registered: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a connector by name
    pub fn register_by_name(&mut self, name: &str) -> VolResult<ConnectorId> {
        let info = self.available.iter()
            .find(|c| c.name == name)
            .copied()
            .ok_or_else(|| VolError::NotFound(format!("connector '{}'", name)))?;
        Ok(self.register(info))
    }

    /// Registers a connector by class value
    pub fn register_by_value(&mut self, value: u32) -> VolResult<ConnectorId> {
        let info = self.available.iter()
            .find(|c| c.value == value)
            .copied()
            .ok_or_else(|| VolError::NotFound(format!("connector value {}", value)))?;
        Ok(self.register(info))
    }

    fn register(&mut self, info: ConnectorInfo) -> ConnectorId {
        if let Some(id) = self.id_by_value(info.value) {
            if let Some(registration) = self.registered.get_mut(&id) {
                registration.references += 1;
                debug!("Connector {} now has {} registrations", info.name, registration.references);
                return id;
            }
        }

        let id = ConnectorId(self.next_id);
        self.next_id += 1;
        self.registered.insert(id, Registration { info, references: 1 });
        info!("Registered connector {} ({})", info.name, info.value);
        id
    }

    fn id_by_value(&self, value: u32) -> Option<ConnectorId> {
        self.registered.iter()
            .find(|(_, r)| r.info.value == value)
            .map(|(id, _)| *id)
    }

    /// Identifier of a registered connector
    pub fn connector_id_by_name(&self, name: &str) -> Option<ConnectorId> {
        self.registered.iter()
            .find(|(_, r)| r.info.name == name)
            .map(|(id, _)| *id)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.connector_id_by_name(name).is_some()
    }

    /// Descriptor behind a registration
    pub fn info(&self, id: ConnectorId) -> Option<&ConnectorInfo> {
        self.registered.get(&id).map(|r| &r.info)
    }

    /// Drops one registration; the connector is gone once all are dropped
    pub fn unregister(&mut self, id: ConnectorId) -> VolResult<()> {
        let registration = self.registered.get_mut(&id)
            .ok_or_else(|| VolError::NotFound(format!("connector id {}", id.raw())))?;

        registration.references -= 1;
        if registration.references == 0 {
            if let Some(removed) = self.registered.remove(&id) {
                info!("Unregistered connector {}", removed.info.name);
            }
        }
        Ok(())
    }
}
