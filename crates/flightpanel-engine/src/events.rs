//! Bounded, drop-oldest input event channel.
//!
//! The poller owns an [`EventSink`]; the application gets the matching
//! [`InputEvents`]. When the sink is dropped the stream ends.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use flightpanel_protocol::InputEvent;
use tracing::trace;

/// Create a connected sink and stream holding at most `capacity` events.
pub fn event_channel(capacity: usize) -> (EventSink, InputEvents) {
    let (tx, rx) = channel::bounded(capacity.max(1));
    (
        EventSink {
            tx,
            overflow: rx.clone(),
            dropped: 0,
        },
        InputEvents { rx },
    )
}

/// Producer half, held by the poller thread.
#[derive(Debug)]
pub struct EventSink {
    tx: Sender<InputEvent>,
    // Receiver clone used to evict the oldest entry when the buffer is full.
    overflow: Receiver<InputEvent>,
    dropped: u64,
}

impl EventSink {
    /// Enqueue `event`, evicting the oldest unread one if full.
    ///
    /// Returns false if the channel is already disconnected.
    pub fn push(&mut self, event: InputEvent) -> bool {
        let mut pending = event;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => return true,
                Err(TrySendError::Full(back)) => {
                    if self.overflow.try_recv().is_ok() {
                        self.dropped += 1;
                        trace!(dropped = self.dropped, "event buffer full, dropped oldest");
                    }
                    pending = back;
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    /// Events evicted so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Single-consumer stream of input transitions for one panel.
///
/// Iterating blocks until the next event and ends when the panel's poller
/// stops, either through `close` or after the failure budget is spent.
#[derive(Debug)]
pub struct InputEvents {
    rx: Receiver<InputEvent>,
}

impl InputEvents {
    /// Next event, or `None` if nothing arrives within `timeout` or the
    /// stream has ended.
    pub fn next_timeout(&self, timeout: Duration) -> Option<InputEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Next buffered event without blocking.
    pub fn try_next(&self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain whatever is buffered right now.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Iterator for InputEvents {
    type Item = InputEvent;

    fn next(&mut self) -> Option<InputEvent> {
        self.rx.recv().ok()
    }
}
