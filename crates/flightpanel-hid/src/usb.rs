//! libusb backing of the transport contract.
//!
//! Control writes longer than a 16-bit `wLength` (the FIP framebuffer) are
//! split into consecutive SET_REPORT transfers of [`FIP_CHUNK_LEN`] bytes,
//! 64 rows each. Callers still see one logical write.

use std::time::Duration;

use flightpanel_protocol::PanelKind;
use flightpanel_protocol::input::PANEL_INPUT_ENDPOINT;
use rusb::{Context, Device, DeviceHandle, Direction, TransferType, UsbContext};
use tracing::{debug, info, warn};

use crate::{
    OP_CONTROL_WRITE, OP_INTERRUPT_READ, OpenedPanel, PanelDeviceInfo, PanelOpener, Transport,
    TransportError, TransportResult,
};

/// Per-call I/O timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// FIP framebuffer chunk: 64 rows of 320 RGB pixels.
pub const FIP_CHUNK_LEN: usize = 64 * 320 * 3;

/// Fallback interrupt IN endpoint when descriptor discovery finds nothing.
pub const FALLBACK_INPUT_ENDPOINT: u8 = 0x81;

const INTERFACE: u8 = 0;

/// Input endpoint used before, or without, descriptor discovery.
pub fn default_input_endpoint(kind: PanelKind) -> u8 {
    match kind {
        PanelKind::Fip => FALLBACK_INPUT_ENDPOINT,
        _ => PANEL_INPUT_ENDPOINT,
    }
}

fn map_open_error(err: rusb::Error, kind: PanelKind) -> TransportError {
    match err {
        rusb::Error::Access | rusb::Error::Busy => {
            TransportError::AccessDenied(format!("{} panel: {err}", kind.name()))
        }
        rusb::Error::NoDevice | rusb::Error::NotFound => TransportError::DeviceNotFound {
            vendor_id: kind.vendor_id(),
            product_id: kind.product_id(),
        },
        other => TransportError::Io {
            operation: "open",
            message: other.to_string(),
        },
    }
}

fn map_transfer_error(
    err: rusb::Error,
    operation: &'static str,
    timeout: Duration,
) -> TransportError {
    match err {
        rusb::Error::Timeout => TransportError::Timeout {
            operation,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
        rusb::Error::NoDevice => TransportError::Disconnected,
        other => TransportError::Io {
            operation,
            message: other.to_string(),
        },
    }
}

/// Pick the interrupt IN endpoint for the FIP button report.
///
/// The first interrupt IN endpoint whose max packet size is 2 wins; failing
/// that, the first interrupt IN endpoint at all.
fn discover_input_endpoint<T: UsbContext>(device: &Device<T>) -> Option<u8> {
    let config = device.active_config_descriptor().ok()?;
    let endpoints: Vec<(u8, u16)> = config
        .interfaces()
        .flat_map(|iface| iface.descriptors().collect::<Vec<_>>())
        .flat_map(|desc| {
            desc.endpoint_descriptors()
                .filter(|ep| {
                    ep.direction() == Direction::In
                        && ep.transfer_type() == TransferType::Interrupt
                })
                .map(|ep| (ep.address(), ep.max_packet_size()))
                .collect::<Vec<_>>()
        })
        .collect();

    endpoints
        .iter()
        .find(|(_, size)| *size == 2)
        .or_else(|| endpoints.first())
        .map(|(address, _)| *address)
}

/// An open panel on the USB bus.
pub struct UsbTransport {
    kind: PanelKind,
    handle: DeviceHandle<Context>,
    timeout: Duration,
}

impl UsbTransport {
    fn write_one(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        chunk: &[u8],
    ) -> TransportResult<()> {
        let written = self
            .handle
            .write_control(request_type, request, value, index, chunk, self.timeout)
            .map_err(|e| map_transfer_error(e, OP_CONTROL_WRITE, self.timeout))?;
        if written != chunk.len() {
            return Err(TransportError::Io {
                operation: OP_CONTROL_WRITE,
                message: format!("short write: {written} of {} bytes", chunk.len()),
            });
        }
        Ok(())
    }
}

impl Transport for UsbTransport {
    fn control_write(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        payload: &[u8],
    ) -> TransportResult<()> {
        if payload.len() <= usize::from(u16::MAX) {
            return self.write_one(request_type, request, value, index, payload);
        }
        debug!(panel = %self.kind, len = payload.len(), "splitting control write");
        for chunk in payload.chunks(FIP_CHUNK_LEN) {
            self.write_one(request_type, request, value, index, chunk)?;
        }
        Ok(())
    }

    fn interrupt_read(&mut self, endpoint: u8, len: usize) -> TransportResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let read = self
            .handle
            .read_interrupt(endpoint, &mut buf, self.timeout)
            .map_err(|e| map_transfer_error(e, OP_INTERRUPT_READ, self.timeout))?;
        buf.truncate(read);
        Ok(buf)
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release_interface(INTERFACE) {
            debug!(panel = %self.kind, error = %e, "release_interface failed");
        }
    }
}

/// Opens panels through libusb.
pub struct UsbOpener {
    context: Context,
    timeout: Duration,
}

impl UsbOpener {
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let context = Context::new().map_err(|e| TransportError::Io {
            operation: "init",
            message: e.to_string(),
        })?;
        Ok(Self { context, timeout })
    }

    fn find(&self, kind: PanelKind) -> TransportResult<Option<Device<Context>>> {
        let devices = self.context.devices().map_err(|e| TransportError::Io {
            operation: "enumerate",
            message: e.to_string(),
        })?;
        Ok(devices.iter().find(|d| {
            d.device_descriptor().is_ok_and(|desc| {
                desc.vendor_id() == kind.vendor_id() && desc.product_id() == kind.product_id()
            })
        }))
    }
}

impl PanelOpener for UsbOpener {
    fn open(&self, kind: PanelKind) -> TransportResult<OpenedPanel> {
        let device = self.find(kind)?.ok_or(TransportError::DeviceNotFound {
            vendor_id: kind.vendor_id(),
            product_id: kind.product_id(),
        })?;

        let mut handle = device.open().map_err(|e| map_open_error(e, kind))?;
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!(panel = %kind, error = %e, "kernel driver auto-detach unavailable");
        }
        handle
            .claim_interface(INTERFACE)
            .map_err(|e| map_open_error(e, kind))?;

        let input_endpoint = match kind {
            PanelKind::Fip => discover_input_endpoint(&device).unwrap_or_else(|| {
                warn!(
                    panel = %kind,
                    "no interrupt IN endpoint in descriptor, using {FALLBACK_INPUT_ENDPOINT:#04x}"
                );
                FALLBACK_INPUT_ENDPOINT
            }),
            _ => PANEL_INPUT_ENDPOINT,
        };

        let mut info = PanelDeviceInfo::new(kind, device.bus_number(), device.address());
        if let Ok(desc) = device.device_descriptor() {
            if let Ok(name) = handle.read_product_string_ascii(&desc) {
                info = info.with_product_name(name);
            }
            if let Ok(vendor) = handle.read_manufacturer_string_ascii(&desc) {
                info = info.with_manufacturer(vendor);
            }
        }

        info!(
            panel = %kind,
            bus = info.bus,
            address = info.address,
            input_endpoint = %format!("{input_endpoint:#04x}"),
            "Opened panel"
        );

        Ok(OpenedPanel {
            transport: Box::new(UsbTransport {
                kind,
                handle,
                timeout: self.timeout,
            }),
            input_endpoint,
            info,
        })
    }

    fn enumerate(&self) -> TransportResult<Vec<PanelDeviceInfo>> {
        let devices = self.context.devices().map_err(|e| TransportError::Io {
            operation: "enumerate",
            message: e.to_string(),
        })?;
        let mut found = Vec::new();
        for device in devices.iter() {
            let Ok(desc) = device.device_descriptor() else {
                continue;
            };
            if let Some(kind) = PanelKind::from_ids(desc.vendor_id(), desc.product_id()) {
                found.push(PanelDeviceInfo::new(kind, device.bus_number(), device.address()));
            }
        }
        Ok(found)
    }
}
