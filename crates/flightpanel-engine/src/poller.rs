//! Background input poller, one thread per connected panel.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use flightpanel_errors::{PanelError, Result};
use flightpanel_hid::Transport;
use flightpanel_protocol::{InputEvent, InputSnapshot, PanelKind};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::events::EventSink;
use crate::state::PanelState;

/// A panel's transport, shared between the poller and the write path.
pub type SharedTransport = Arc<Mutex<Box<dyn Transport>>>;

pub(crate) struct PollerContext {
    pub kind: PanelKind,
    pub endpoint: u8,
    pub period: Duration,
    pub max_failures: u32,
    pub transport: SharedTransport,
    pub state: Arc<Mutex<PanelState>>,
    pub snapshot: Arc<Mutex<InputSnapshot>>,
    pub sink: EventSink,
}

/// Handle to a running poller thread.
pub(crate) struct Poller {
    kind: PanelKind,
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn spawn(ctx: PollerContext) -> Result<Self> {
        let kind = ctx.kind;
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let thread = thread::Builder::new()
            .name(format!("poller-{}", kind.name().to_ascii_lowercase()))
            .spawn(move || poll_loop(ctx, &stop_rx))
            .map_err(|e| PanelError::transport("spawn_poller", e.to_string()))?;
        Ok(Self {
            kind,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    /// Signal the thread and wait for it. Safe to call more than once.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the tick wait with Disconnected.
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            match thread.join() {
                Ok(()) => debug!(panel = %self.kind, "poller stopped"),
                Err(_) => error!(panel = %self.kind, "poller thread panicked"),
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(mut ctx: PollerContext, stop_rx: &channel::Receiver<()>) {
    info!(panel = %ctx.kind, period_ms = ctx.period.as_millis() as u64, "poller started");

    let len = ctx.kind.input_report_len();
    let mut previous = InputSnapshot::released(ctx.kind);
    let mut batch: Vec<InputEvent> =
        Vec::with_capacity(flightpanel_protocol::signals(ctx.kind).len());
    let mut failures: u32 = 0;

    loop {
        match stop_rx.recv_timeout(ctx.period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let read = ctx
            .transport
            .lock()
            .interrupt_read(ctx.endpoint, len)
            .map_err(|e| e.into_panel_error(ctx.kind.name()));

        match read.and_then(|bytes| InputSnapshot::parse(ctx.kind, &bytes)) {
            Ok(current) => {
                failures = 0;
                batch.clear();
                if current.diff_into(&previous, SystemTime::now(), &mut batch) > 0 {
                    *ctx.snapshot.lock() = current;
                    for event in batch.drain(..) {
                        debug!(
                            panel = %ctx.kind,
                            signal = event.signal,
                            state = event.state,
                            "input"
                        );
                        ctx.sink.push(event);
                    }
                }
                previous = current;
            }
            Err(e) => {
                failures += 1;
                warn!(
                    panel = %ctx.kind,
                    error = %e,
                    kind = e.kind_name(),
                    severity = %e.severity(),
                    retryable = e.is_retryable(),
                    consecutive_failures = failures,
                    "input read failed"
                );
                if e.is_device_unavailable() {
                    *ctx.state.lock() = PanelState::Disconnected;
                    error!(panel = %ctx.kind, error = %e, "panel unavailable, disconnected");
                    break;
                }
                if failures >= ctx.max_failures {
                    *ctx.state.lock() = PanelState::Disconnected;
                    error!(
                        panel = %ctx.kind,
                        failures,
                        "read failure budget exhausted, panel disconnected"
                    );
                    break;
                }
            }
        }
    }

    info!(panel = %ctx.kind, dropped_events = ctx.sink.dropped(), "poller exiting");
}

#[cfg(test)]
mod tests {
    use flightpanel_hid::TransportError;
    use flightpanel_hid::mock::MockTransport;

    use super::*;
    use crate::events::event_channel;

    fn context(
        mock: &MockTransport,
        max_failures: u32,
    ) -> (PollerContext, crate::InputEvents, Arc<Mutex<PanelState>>) {
        let (sink, events) = event_channel(10);
        let state = Arc::new(Mutex::new(PanelState::Polling));
        let transport: Box<dyn Transport> = Box::new(mock.clone());
        let ctx = PollerContext {
            kind: mock.kind(),
            endpoint: 0x81,
            period: Duration::from_millis(5),
            max_failures,
            transport: Arc::new(Mutex::new(transport)),
            state: Arc::clone(&state),
            snapshot: Arc::new(Mutex::new(InputSnapshot::released(mock.kind()))),
            sink,
        };
        (ctx, events, state)
    }

    #[test]
    fn emits_edges_in_read_order() {
        let mock = MockTransport::new(PanelKind::Switch);
        mock.queue_read(vec![0x01, 0x00, 0x00]);
        mock.queue_read(vec![0x00, 0x00, 0x00]);
        let (ctx, events, _) = context(&mock, 3);
        let mut poller = Poller::spawn(ctx).ok();

        let first = events.next_timeout(Duration::from_secs(2));
        let second = events.next_timeout(Duration::from_secs(2));
        if let Some(p) = poller.as_mut() {
            p.stop();
        }

        assert_eq!(first.map(|e| (e.signal, e.state)), Some(("BAT", true)));
        assert_eq!(second.map(|e| (e.signal, e.state)), Some(("BAT", false)));
    }

    #[test]
    fn failure_budget_disconnects_and_ends_stream() {
        let mock = MockTransport::new(PanelKind::Radio);
        for _ in 0..3 {
            mock.queue_read_failure(TransportError::Timeout {
                operation: flightpanel_hid::OP_INTERRUPT_READ,
                timeout_ms: 100,
            });
        }
        let (ctx, events, state) = context(&mock, 3);
        let _poller = Poller::spawn(ctx).ok();

        let collected: Vec<_> = events.collect();
        assert!(collected.is_empty());
        assert_eq!(*state.lock(), PanelState::Disconnected);
        assert_eq!(mock.read_count(), 3);
    }

    #[test]
    fn a_success_resets_the_failure_count() {
        let mock = MockTransport::new(PanelKind::Multi);
        let fail = || TransportError::Io {
            operation: flightpanel_hid::OP_INTERRUPT_READ,
            message: "stall".to_string(),
        };
        mock.queue_read_failure(fail());
        mock.queue_read_failure(fail());
        mock.queue_read(vec![0x00, 0x00, 0x00]);
        mock.queue_read_failure(fail());
        mock.queue_read_failure(fail());
        mock.queue_read(vec![0x80, 0x00, 0x00]);
        let (ctx, events, state) = context(&mock, 3);
        let mut poller = Poller::spawn(ctx).ok();

        let event = events.next_timeout(Duration::from_secs(2));
        if let Some(p) = poller.as_mut() {
            p.stop();
        }
        assert_eq!(event.map(|e| e.signal), Some("AP"));
        assert_eq!(*state.lock(), PanelState::Polling);
    }

    #[test]
    fn unavailable_device_disconnects_without_retrying() {
        let mock = MockTransport::new(PanelKind::Radio);
        mock.queue_read_failure(TransportError::AccessDenied("revoked".to_string()));
        let (ctx, events, state) = context(&mock, 3);
        let _poller = Poller::spawn(ctx).ok();

        assert_eq!(events.count(), 0);
        assert_eq!(*state.lock(), PanelState::Disconnected);
        assert_eq!(mock.read_count(), 1);
    }

    #[test]
    fn short_report_counts_as_failure() {
        let mock = MockTransport::new(PanelKind::Switch);
        for _ in 0..2 {
            mock.queue_read(vec![0x01]);
        }
        let (ctx, events, state) = context(&mock, 2);
        let _poller = Poller::spawn(ctx).ok();
        assert_eq!(events.count(), 0);
        assert_eq!(*state.lock(), PanelState::Disconnected);
    }
}
