use std::fmt;

use serde::Serialize;

/// Lifecycle of one panel session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Disconnected,
    Connecting,
    /// Transport open, poller not yet running.
    Connected,
    Polling,
    Closing,
}

impl PanelState {
    /// Whether writes can reach the transport.
    pub fn is_open(self) -> bool {
        matches!(self, PanelState::Connected | PanelState::Polling)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PanelState::Disconnected => "disconnected",
            PanelState::Connecting => "connecting",
            PanelState::Connected => "connected",
            PanelState::Polling => "polling",
            PanelState::Closing => "closing",
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
