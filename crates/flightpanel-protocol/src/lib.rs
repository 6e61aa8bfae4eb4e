//! Wire protocol for the Saitek flight panel family.
//!
//! This crate is I/O-free. It turns display models into output reports and
//! raw interrupt reports into input snapshots and edge events; moving the
//! bytes is left to `flightpanel-hid`.
//!
//! ## Panels
//! - Radio: four 5-digit fields, 22-byte report
//! - Multi: two 5-digit rows and eight annunciators, 12-byte report
//! - Switch: six landing gear lights, 1-byte report
//! - FIP: 320x240 RGB framebuffer, 230,400-byte payload

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod input;
pub mod output;
pub mod segment;
pub mod types;

pub use ids::{PanelKind, SAITEK_VENDOR_ID, product_ids};
pub use input::{InputEvent, InputSnapshot, Signal, signals};
pub use output::*;
pub use segment::{Field, MULTI_CODEC, RADIO_CODEC, SegmentCodec};
pub use types::*;
