//! Shared state behind the HTTP handlers

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

use flightpanel_engine::{ManagerStatus, PanelManager};
use flightpanel_protocol::InputEvent;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Most recent input events across all panels, oldest first.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Arc<Mutex<VecDeque<InputEvent>>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, event: InputEvent) {
        let mut events = self.events.lock();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn snapshot(&self) -> Vec<InputEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    manager: Arc<Mutex<PanelManager>>,
    events: EventLog,
}

impl AppState {
    pub fn new(manager: PanelManager, recent_events: usize) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
            events: EventLog::new(recent_events),
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Run `f` against the manager on the blocking pool.
    pub async fn with_manager<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut PanelManager) -> flightpanel_errors::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let manager = Arc::clone(&self.manager);
        let result = tokio::task::spawn_blocking(move || f(&mut manager.lock())).await?;
        Ok(result?)
    }

    pub async fn status(&self) -> Result<ManagerStatus, ApiError> {
        self.with_manager(|manager| Ok(manager.status())).await
    }

    /// Connect every panel, then start relaying input from the new sessions.
    pub async fn connect_all(&self) -> Result<ManagerStatus, ApiError> {
        let status = self
            .with_manager(|manager| Ok(manager.connect_all()))
            .await?;
        info!(
            connected = status.connected_count(),
            "panels connected"
        );
        self.attach_event_streams().await?;
        Ok(status)
    }

    /// Relay every not-yet-relayed panel stream into the event log.
    pub async fn attach_event_streams(&self) -> Result<(), ApiError> {
        let merged = self
            .with_manager(|manager| Ok(manager.merged_events()))
            .await?;
        let log = self.events.clone();
        let spawned = thread::Builder::new()
            .name("event-log".to_string())
            .spawn(move || {
                for event in merged.iter() {
                    log.record(event);
                }
                debug!("event relay finished");
            });
        if let Err(e) = spawned {
            warn!(error = %e, "failed to spawn event relay");
        }
        Ok(())
    }

    pub async fn close_all(&self) -> Result<(), ApiError> {
        self.with_manager(|manager| {
            manager.close_all();
            Ok(())
        })
        .await
    }
}
