//! The transport contract between the panel core and the USB stack.

use flightpanel_protocol::{ControlRequest, PanelKind};

use crate::{PanelDeviceInfo, TransportResult};

/// The two bus operations the panel core relies on.
///
/// Implementations block for at most their I/O timeout per call.
pub trait Transport: Send {
    /// Issue one host-to-device control transfer carrying `payload`.
    fn control_write(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        payload: &[u8],
    ) -> TransportResult<()>;

    /// Read one interrupt IN report. May return fewer than `len` bytes.
    fn interrupt_read(&mut self, endpoint: u8, len: usize) -> TransportResult<Vec<u8>>;

    /// [`control_write`](Self::control_write) with a prepared setup packet.
    fn send(&mut self, request: &ControlRequest, payload: &[u8]) -> TransportResult<()> {
        self.control_write(
            request.request_type,
            request.request,
            request.value,
            request.index,
            payload,
        )
    }
}

/// A freshly opened panel session.
pub struct OpenedPanel {
    pub transport: Box<dyn Transport>,
    /// Interrupt IN endpoint carrying the panel's input reports.
    pub input_endpoint: u8,
    pub info: PanelDeviceInfo,
}

impl std::fmt::Debug for OpenedPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedPanel")
            .field("input_endpoint", &self.input_endpoint)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Finds and opens panels on some bus.
pub trait PanelOpener: Send + Sync {
    fn open(&self, kind: PanelKind) -> TransportResult<OpenedPanel>;

    /// List the panels currently attached.
    fn enumerate(&self) -> TransportResult<Vec<PanelDeviceInfo>>;
}
