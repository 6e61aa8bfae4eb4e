//! USB transport layer for the flight panels.
//!
//! The panel core needs exactly two operations from the bus, captured by
//! [`Transport`]. This crate provides the libusb backing ([`usb`]) and the
//! headless [`mock`] backing, plus [`PanelOpener`] to find and open a panel.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod mock;
pub mod transport;
pub mod usb;

pub use device_info::PanelDeviceInfo;
pub use transport::{OpenedPanel, PanelOpener, Transport};

use flightpanel_errors::PanelError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Device not found: {vendor_id:04x}:{product_id:04x}")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("{operation} failed: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    #[error("Device disconnected")]
    Disconnected,
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Operation names carried in errors and logs.
pub const OP_CONTROL_WRITE: &str = "control_write";
pub const OP_INTERRUPT_READ: &str = "interrupt_read";

impl TransportError {
    /// Attach the panel name while lifting into the shared taxonomy.
    pub fn into_panel_error(self, device: &str) -> PanelError {
        match self {
            TransportError::DeviceNotFound {
                vendor_id,
                product_id,
            } => PanelError::not_found(device, vendor_id, product_id),
            TransportError::AccessDenied(reason) => PanelError::access_denied(device, reason),
            TransportError::Timeout {
                operation,
                timeout_ms,
            } => PanelError::timeout(operation, timeout_ms),
            TransportError::Io { operation, message } => PanelError::transport(operation, message),
            TransportError::Disconnected => {
                PanelError::transport("transfer", "device disconnected")
            }
        }
    }
}

impl From<TransportError> for PanelError {
    fn from(err: TransportError) -> Self {
        err.into_panel_error("panel")
    }
}
