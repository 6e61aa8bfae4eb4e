//! The panel error taxonomy.
//!
//! `connect` surfaces [`PanelError::NotFound`] and [`PanelError::AccessDenied`].
//! Once connected, a failed transfer during a setter is returned to that
//! caller only as [`PanelError::TransportIo`]; during polling the same error
//! is retried and only ends the session after the retry budget is spent.

use crate::severity::ErrorSeverity;

/// Errors produced by the panel protocol, transport and front-end layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    /// No device with the expected (vendor, product) pair is attached
    #[error("{device} not found (vendor={vendor_id:#06x}, product={product_id:#06x})")]
    NotFound {
        /// Panel name
        device: String,
        /// USB vendor ID
        vendor_id: u16,
        /// USB product ID
        product_id: u16,
    },

    /// The host refused to open the device
    #[error("Access denied opening {device}: {reason}")]
    AccessDenied {
        /// Panel name
        device: String,
        /// Reason reported by the host
        reason: String,
    },

    /// A control write or interrupt read failed at the transport
    #[error("Transport {operation} failed: {message}")]
    TransportIo {
        /// `control_write` or `interrupt_read`
        operation: String,
        /// Message from the transport
        message: String,
        /// The call ran into its I/O timeout
        timed_out: bool,
    },

    /// An input report was shorter than the panel's minimum
    #[error("Short input report: expected {expected} bytes, got {actual}")]
    ProtocolShape {
        /// Minimum report length
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// The framebuffer pipeline was handed a raster it cannot decode
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An argument was structurally impossible
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The panel has no open session
    #[error("{0} is not connected")]
    NotConnected(String),

    /// The single-consumer input stream was already handed out
    #[error("Input event stream for {0} was already taken")]
    StreamTaken(String),
}

impl PanelError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PanelError::NotFound { .. } => ErrorSeverity::Error,
            PanelError::AccessDenied { .. } => ErrorSeverity::Error,
            PanelError::TransportIo { timed_out: true, .. } => ErrorSeverity::Warning,
            PanelError::TransportIo { .. } => ErrorSeverity::Error,
            PanelError::ProtocolShape { .. } => ErrorSeverity::Warning,
            PanelError::UnsupportedFormat(_) => ErrorSeverity::Error,
            PanelError::InvalidArgument(_) => ErrorSeverity::Error,
            PanelError::NotConnected(_) => ErrorSeverity::Critical,
            PanelError::StreamTaken(_) => ErrorSeverity::Info,
        }
    }

    /// Stable variant name, used in JSON status bodies.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PanelError::NotFound { .. } => "NotFound",
            PanelError::AccessDenied { .. } => "AccessDenied",
            PanelError::TransportIo { .. } => "TransportIo",
            PanelError::ProtocolShape { .. } => "ProtocolShape",
            PanelError::UnsupportedFormat(_) => "UnsupportedFormat",
            PanelError::InvalidArgument(_) => "InvalidArgument",
            PanelError::NotConnected(_) => "NotConnected",
            PanelError::StreamTaken(_) => "StreamTaken",
        }
    }

    /// Check if this error means the panel cannot be reached at all.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(
            self,
            PanelError::NotFound { .. }
                | PanelError::AccessDenied { .. }
                | PanelError::NotConnected(_)
        )
    }

    /// Check if retrying the same call might succeed. True only for
    /// transport I/O failures, timeouts included.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PanelError::TransportIo { .. })
    }

    /// Create a not found error.
    pub fn not_found(device: impl Into<String>, vendor_id: u16, product_id: u16) -> Self {
        PanelError::NotFound {
            device: device.into(),
            vendor_id,
            product_id,
        }
    }

    /// Create an access denied error.
    pub fn access_denied(device: impl Into<String>, reason: impl Into<String>) -> Self {
        PanelError::AccessDenied {
            device: device.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error for a failed call.
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        PanelError::TransportIo {
            operation: operation.into(),
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a transport error for a call that hit its I/O timeout.
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        PanelError::TransportIo {
            operation: operation.into(),
            message: format!("timed out after {timeout_ms} ms"),
            timed_out: true,
        }
    }

    /// Create a short-report error.
    pub fn short_report(expected: usize, actual: usize) -> Self {
        PanelError::ProtocolShape { expected, actual }
    }
}
