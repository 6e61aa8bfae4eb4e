//! Descriptor summary for an attached panel

use flightpanel_protocol::PanelKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelDeviceInfo {
    pub kind: PanelKind,
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus: u8,
    pub address: u8,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    /// `usb` for a real device, `mock` for the headless backing.
    pub backend: String,
}

impl PanelDeviceInfo {
    pub fn new(kind: PanelKind, bus: u8, address: u8) -> Self {
        Self {
            kind,
            vendor_id: kind.vendor_id(),
            product_id: kind.product_id(),
            bus,
            address,
            manufacturer: None,
            product_name: None,
            backend: "usb".to_string(),
        }
    }

    /// Info for a panel served by the mock transport.
    pub fn mock(kind: PanelKind) -> Self {
        Self {
            backend: "mock".to_string(),
            ..Self::new(kind, 0, 0)
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn is_mock(&self) -> bool {
        self.backend == "mock"
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| format!("Saitek {} Panel", self.kind.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_info() {
        let info = PanelDeviceInfo::mock(PanelKind::Multi);
        assert!(info.is_mock());
        assert_eq!(info.product_id, 0x0D06);
        assert_eq!(info.display_name(), "Saitek Multi Panel");
    }

    #[test]
    fn test_display_name_prefers_descriptor() {
        let info = PanelDeviceInfo::new(PanelKind::Fip, 1, 7).with_product_name("Saitek Fip");
        assert_eq!(info.display_name(), "Saitek Fip");
        assert!(!info.is_mock());
    }
}
