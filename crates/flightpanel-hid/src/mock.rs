//! Headless transport.
//!
//! Writes are logged and recorded, reads return zero bytes unless a test
//! scripted something else. Clones share state, so a test can keep one
//! handle while the panel owns another. The write log is a ring: once it
//! holds [`DEFAULT_WRITE_LOG_CAPACITY`] records the oldest is dropped.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use flightpanel_protocol::PanelKind;
use tracing::{debug, info};

use crate::{
    OP_CONTROL_WRITE, OP_INTERRUPT_READ, OpenedPanel, PanelDeviceInfo, PanelOpener, Transport,
    TransportError, TransportResult,
};

/// Bytes of payload shown in the write log before it is elided.
const HEX_PREVIEW_LEN: usize = 32;

/// Records kept per mock before the oldest write is dropped.
pub const DEFAULT_WRITE_LOG_CAPACITY: usize = 64;

/// One recorded control transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub payload: Vec<u8>,
}

/// A scripted interrupt read result.
#[derive(Debug, Clone)]
pub enum ScriptedRead {
    Data(Vec<u8>),
    Fail(TransportError),
}

#[derive(Debug)]
struct MockState {
    writes: VecDeque<WriteRecord>,
    write_capacity: usize,
    reads: VecDeque<ScriptedRead>,
    write_failures: VecDeque<TransportError>,
    read_count: usize,
    connected: bool,
}

#[derive(Debug, Clone)]
pub struct MockTransport {
    kind: PanelKind,
    state: Arc<Mutex<MockState>>,
}

pub fn hex_preview(bytes: &[u8]) -> String {
    let shown: Vec<String> = bytes
        .iter()
        .take(HEX_PREVIEW_LEN)
        .map(|b| format!("{b:02X}"))
        .collect();
    let mut out = shown.join(" ");
    if bytes.len() > HEX_PREVIEW_LEN {
        out.push_str(&format!(" ... (+{} bytes)", bytes.len() - HEX_PREVIEW_LEN));
    }
    out
}

impl MockTransport {
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            state: Arc::new(Mutex::new(MockState {
                writes: VecDeque::new(),
                write_capacity: DEFAULT_WRITE_LOG_CAPACITY,
                reads: VecDeque::new(),
                write_failures: VecDeque::new(),
                read_count: 0,
                connected: true,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Queue an input report for a future read.
    pub fn queue_read(&self, data: impl Into<Vec<u8>>) {
        self.lock().reads.push_back(ScriptedRead::Data(data.into()));
    }

    /// Queue a failing read.
    pub fn queue_read_failure(&self, err: TransportError) {
        self.lock().reads.push_back(ScriptedRead::Fail(err));
    }

    /// Make the next control write fail with `err`.
    pub fn fail_next_write(&self, err: TransportError) {
        self.lock().write_failures.push_back(err);
    }

    pub fn pending_reads(&self) -> usize {
        self.lock().reads.len()
    }

    /// Number of interrupt reads served so far, scripted or synthesized.
    pub fn read_count(&self) -> usize {
        self.lock().read_count
    }

    /// Recorded writes, oldest first.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.iter().cloned().collect()
    }

    pub fn last_write(&self) -> Option<WriteRecord> {
        self.lock().writes.back().cloned()
    }

    /// Change how many writes are kept. Zero keeps none; shrinking drops the
    /// oldest records at once.
    pub fn set_write_log_capacity(&self, capacity: usize) {
        let mut state = self.lock();
        state.write_capacity = capacity;
        let excess = state.writes.len().saturating_sub(capacity);
        state.writes.drain(..excess);
    }

    pub fn write_log_capacity(&self) -> usize {
        self.lock().write_capacity
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    /// Make every further call fail as if the cable were pulled.
    pub fn disconnect(&self) {
        self.lock().connected = false;
    }

    pub fn reconnect(&self) {
        self.lock().connected = true;
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }
}

impl Transport for MockTransport {
    fn control_write(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        payload: &[u8],
    ) -> TransportResult<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(TransportError::Disconnected);
        }
        if let Some(err) = state.write_failures.pop_front() {
            return Err(err);
        }

        info!(
            panel = %self.kind,
            op = OP_CONTROL_WRITE,
            request_type = %format!("{request_type:#04x}"),
            request = %format!("{request:#04x}"),
            value = %format!("{value:#06x}"),
            index,
            len = payload.len(),
            "mock write: {}",
            hex_preview(payload)
        );

        if state.write_capacity == 0 {
            return Ok(());
        }
        while state.writes.len() >= state.write_capacity {
            state.writes.pop_front();
        }
        state.writes.push_back(WriteRecord {
            request_type,
            request,
            value,
            index,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn interrupt_read(&mut self, endpoint: u8, len: usize) -> TransportResult<Vec<u8>> {
        let mut state = self.lock();
        if !state.connected {
            return Err(TransportError::Disconnected);
        }
        state.read_count += 1;

        match state.reads.pop_front() {
            Some(ScriptedRead::Data(data)) => {
                debug!(
                    panel = %self.kind,
                    op = OP_INTERRUPT_READ,
                    endpoint,
                    "mock read: {}",
                    hex_preview(&data)
                );
                Ok(data)
            }
            Some(ScriptedRead::Fail(err)) => Err(err),
            None => Ok(vec![0u8; len]),
        }
    }
}

/// Opener that serves every panel from a [`MockTransport`].
///
/// Each kind has one long-lived mock, so reopening a panel after `close`
/// keeps the write log.
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    transports: Arc<Mutex<HashMap<PanelKind, MockTransport>>>,
    absent: Arc<Mutex<HashSet<PanelKind>>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared mock for `kind`, created on first use.
    pub fn transport(&self, kind: PanelKind) -> MockTransport {
        let mut map = self.transports.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(kind)
            .or_insert_with(|| MockTransport::new(kind))
            .clone()
    }

    /// Pretend `kind` is not plugged in.
    pub fn unplug(&self, kind: PanelKind) {
        self.absent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(kind);
    }

    pub fn plug(&self, kind: PanelKind) {
        self.absent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&kind);
    }

    fn is_present(&self, kind: PanelKind) -> bool {
        !self
            .absent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&kind)
    }
}

impl PanelOpener for MockOpener {
    fn open(&self, kind: PanelKind) -> TransportResult<OpenedPanel> {
        if !self.is_present(kind) {
            return Err(TransportError::DeviceNotFound {
                vendor_id: kind.vendor_id(),
                product_id: kind.product_id(),
            });
        }
        let transport = self.transport(kind);
        transport.reconnect();
        info!(panel = %kind, "Using mock transport");
        Ok(OpenedPanel {
            transport: Box::new(transport),
            input_endpoint: crate::usb::default_input_endpoint(kind),
            info: PanelDeviceInfo::mock(kind),
        })
    }

    fn enumerate(&self) -> TransportResult<Vec<PanelDeviceInfo>> {
        Ok(PanelKind::ALL
            .into_iter()
            .filter(|k| self.is_present(*k))
            .map(PanelDeviceInfo::mock)
            .collect())
    }
}
