//! Connection lifecycle shared by every panel type.
//!
//! A [`PanelHandle`] owns the transport for one panel, its poller thread and
//! the undelivered half of the input event channel. The typed panels wrap a
//! handle and add their own report cache on top.

use std::sync::Arc;

use flightpanel_errors::{PanelError, Result};
use flightpanel_hid::mock::MockTransport;
use flightpanel_hid::{OpenedPanel, PanelDeviceInfo, PanelOpener, TransportError};
use flightpanel_protocol::{DISPLAY_REQUEST, InputSnapshot, PanelKind};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::events::{InputEvents, event_channel};
use crate::poller::{Poller, PollerContext, SharedTransport};
use crate::state::PanelState;

struct Session {
    transport: SharedTransport,
    poller: Poller,
    device: PanelDeviceInfo,
}

pub struct PanelHandle {
    kind: PanelKind,
    config: EngineConfig,
    opener: Arc<dyn PanelOpener>,
    state: Arc<Mutex<PanelState>>,
    snapshot: Arc<Mutex<InputSnapshot>>,
    session: Option<Session>,
    events: Option<InputEvents>,
}

impl std::fmt::Debug for PanelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelHandle")
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("device", &self.device())
            .finish_non_exhaustive()
    }
}

fn falls_back_to_mock(err: &TransportError) -> bool {
    matches!(
        err,
        TransportError::DeviceNotFound { .. } | TransportError::AccessDenied(_)
    )
}

impl PanelHandle {
    pub fn new(kind: PanelKind, opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        Self {
            kind,
            config,
            opener,
            state: Arc::new(Mutex::new(PanelState::Disconnected)),
            snapshot: Arc::new(Mutex::new(InputSnapshot::released(kind))),
            session: None,
            events: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> PanelState {
        *self.state.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_open()
    }

    /// The attached device, while a session is open.
    pub fn device(&self) -> Option<&PanelDeviceInfo> {
        self.session.as_ref().map(|s| &s.device)
    }

    pub fn is_mock(&self) -> bool {
        self.device().is_some_and(PanelDeviceInfo::is_mock)
    }

    /// Latest input state seen by the poller.
    pub fn snapshot(&self) -> InputSnapshot {
        *self.snapshot.lock()
    }

    fn open(&self) -> Result<OpenedPanel> {
        match self.opener.open(self.kind) {
            Ok(opened) => Ok(opened),
            Err(e) if self.config.mock_fallback && falls_back_to_mock(&e) => {
                warn!(panel = %self.kind, error = %e, "panel unavailable, using mock transport");
                Ok(OpenedPanel {
                    transport: Box::new(MockTransport::new(self.kind)),
                    input_endpoint: flightpanel_hid::usb::default_input_endpoint(self.kind),
                    info: PanelDeviceInfo::mock(self.kind),
                })
            }
            Err(e) => Err(e.into_panel_error(self.kind.name())),
        }
    }

    /// Open the transport and start the poller.
    ///
    /// Connecting an already open panel is a no-op. A session the poller
    /// gave up on is torn down and reopened.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            debug!(panel = %self.kind, "already connected");
            return Ok(());
        }
        self.teardown();

        *self.state.lock() = PanelState::Connecting;
        let opened = match self.open() {
            Ok(opened) => opened,
            Err(e) => {
                *self.state.lock() = PanelState::Disconnected;
                return Err(e);
            }
        };
        *self.state.lock() = PanelState::Connected;
        *self.snapshot.lock() = InputSnapshot::released(self.kind);

        let transport: SharedTransport = Arc::new(Mutex::new(opened.transport));
        let (sink, events) = event_channel(self.config.event_buffer);
        let poller = Poller::spawn(PollerContext {
            kind: self.kind,
            endpoint: opened.input_endpoint,
            period: self.config.poll_interval(self.kind),
            max_failures: self.config.max_consecutive_failures,
            transport: Arc::clone(&transport),
            state: Arc::clone(&self.state),
            snapshot: Arc::clone(&self.snapshot),
            sink,
        });
        let poller = match poller {
            Ok(poller) => poller,
            Err(e) => {
                *self.state.lock() = PanelState::Disconnected;
                return Err(e);
            }
        };

        info!(
            panel = %self.kind,
            device = %opened.info.display_name(),
            mock = opened.info.is_mock(),
            "Panel connected"
        );
        self.session = Some(Session {
            transport,
            poller,
            device: opened.info,
        });
        self.events = Some(events);
        // The poller may already have given up if the first reads failed.
        let mut state = self.state.lock();
        if *state == PanelState::Connected {
            *state = PanelState::Polling;
        }
        Ok(())
    }

    /// Take the single-consumer input stream for this session.
    pub fn input_events(&mut self) -> Result<InputEvents> {
        match (self.events.take(), &self.session) {
            (Some(events), _) => Ok(events),
            (None, Some(_)) => Err(PanelError::StreamTaken(self.kind.name().to_string())),
            (None, None) => Err(PanelError::NotConnected(self.kind.name().to_string())),
        }
    }

    /// Send one display report through the HID SET_REPORT request.
    pub fn write_report(&self, payload: &[u8]) -> Result<()> {
        let session = match &self.session {
            Some(session) if self.is_connected() => session,
            _ => return Err(PanelError::NotConnected(self.kind.name().to_string())),
        };
        session
            .transport
            .lock()
            .send(&DISPLAY_REQUEST, payload)
            .map_err(|e| e.into_panel_error(self.kind.name()))
    }

    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.poller.stop();
        }
        self.events = None;
    }

    /// Stop the poller and release the transport. Idempotent.
    pub fn close(&mut self) {
        if self.session.is_none() {
            *self.state.lock() = PanelState::Disconnected;
            return;
        }
        *self.state.lock() = PanelState::Closing;
        self.teardown();
        *self.state.lock() = PanelState::Disconnected;
        info!(panel = %self.kind, "Panel closed");
    }
}

impl Drop for PanelHandle {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.close();
        }
    }
}
