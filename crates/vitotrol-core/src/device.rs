//! Heating device addressed by the Vitotrol service.

use std::fmt;

use vitotrol_types::{DeviceId, LocationId};

/// A heating device attached to an installation.
///
/// Devices are plain values: every call takes the [`crate::Session`] (or any
/// other [`crate::VitotrolApi`]) separately, so a device can be copied into
/// background tasks freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    /// Device identifier (`GeraetId`).
    pub device_id: DeviceId,
    /// Installation identifier (`AnlageId`).
    pub location_id: LocationId,
    /// Display name, if known.
    pub name: Option<String>,
}

impl Device {
    /// Create a device from its identifiers.
    pub fn new(device_id: impl Into<DeviceId>, location_id: impl Into<LocationId>) -> Self {
        Self {
            device_id: device_id.into(),
            location_id: location_id.into(),
            name: None,
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({}@{})", name, self.device_id, self.location_id),
            None => write!(f, "{}@{}", self.device_id, self.location_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_display() {
        let device = Device::new(12345u32, 678u32);
        assert_eq!(device.to_string(), "12345@678");

        let device = device.with_name("Vitodens 200");
        assert_eq!(device.to_string(), "Vitodens 200 (12345@678)");
    }
}
