//! Engine configuration.

use std::time::Duration;

use flightpanel_errors::{PanelError, Result};
use flightpanel_framebuffer::FramebufferOptions;
use flightpanel_protocol::PanelKind;
use serde::{Deserialize, Serialize};

/// Tunables shared by every panel session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Poll period for the Radio, Multi and Switch panels.
    pub poll_interval_ms: u64,
    /// Poll period for the FIP soft buttons.
    pub fip_poll_interval_ms: u64,
    /// Per-call USB timeout.
    pub io_timeout_ms: u64,
    /// Consecutive failed reads before a session is dropped.
    pub max_consecutive_failures: u32,
    /// Unread input events kept per panel before the oldest is dropped.
    pub event_buffer: usize,
    /// Install the mock transport when a panel is not attached.
    pub mock_fallback: bool,
    pub fip: FramebufferOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: PanelKind::Radio.default_poll_interval_ms(),
            fip_poll_interval_ms: PanelKind::Fip.default_poll_interval_ms(),
            io_timeout_ms: 100,
            max_consecutive_failures: 3,
            event_buffer: 10,
            mock_fallback: false,
            fip: FramebufferOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults with the mock fallback switched on.
    pub fn headless() -> Self {
        Self {
            mock_fallback: true,
            ..Self::default()
        }
    }

    pub fn poll_interval(&self, kind: PanelKind) -> Duration {
        match kind {
            PanelKind::Fip => Duration::from_millis(self.fip_poll_interval_ms),
            _ => Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 || self.fip_poll_interval_ms == 0 {
            return Err(PanelError::InvalidArgument(
                "poll intervals must be greater than zero".to_string(),
            ));
        }
        if self.io_timeout_ms == 0 {
            return Err(PanelError::InvalidArgument(
                "io_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_consecutive_failures == 0 {
            return Err(PanelError::InvalidArgument(
                "max_consecutive_failures must be at least 1".to_string(),
            ));
        }
        if self.event_buffer == 0 {
            return Err(PanelError::InvalidArgument(
                "event_buffer must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.fip.jpeg_quality) {
            return Err(PanelError::InvalidArgument(format!(
                "fip.jpeg_quality must be between 1 and 100, got {}",
                self.fip.jpeg_quality
            )));
        }
        Ok(())
    }
}
