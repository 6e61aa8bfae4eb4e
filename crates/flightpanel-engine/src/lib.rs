//! Panel state machines for the Saitek flight panels.
//!
//! Each panel type wraps a [`PanelHandle`] that owns the transport, runs a
//! background poller turning interrupt reads into [`InputEvent`]s, and
//! serialises display writes against those reads. [`PanelManager`] keeps up
//! to one panel of each kind and exposes them through the [`Panel`] sum type.
//!
//! ```no_run
//! use flightpanel_engine::{EngineConfig, PanelManager};
//! use flightpanel_protocol::{PanelKind, RadioDisplay};
//!
//! # fn main() -> flightpanel_errors::Result<()> {
//! let mut manager = PanelManager::usb(EngineConfig::headless())?;
//! manager.connect(PanelKind::Radio)?;
//! manager.set_radio_display(&RadioDisplay::new("118.00", "118.50", "121.30", "121.90"))?;
//! # Ok(())
//! # }
//! ```
//!
//! [`InputEvent`]: flightpanel_protocol::InputEvent

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod events;
pub mod fip;
pub mod handle;
pub mod manager;
pub mod multi;
pub mod panel;
mod poller;
pub mod radio;
pub mod state;
pub mod switch;

pub use config::EngineConfig;
pub use events::InputEvents;
pub use fip::{FipContent, FipPanel};
pub use handle::PanelHandle;
pub use manager::{ConnectionOutcome, ManagerStatus, PanelManager, PanelStatus};
pub use multi::MultiPanel;
pub use panel::{LastDisplay, Panel};
pub use poller::SharedTransport;
pub use radio::RadioPanel;
pub use state::PanelState;
pub use switch::SwitchPanel;
