//! Error types for the flight panel driver stack.
//!
//! Every public operation of the panel crates returns either success or one
//! of the variants of [`PanelError`]. Front-ends render these as status
//! strings tagged with [`PanelError::kind_name`] and
//! [`PanelError::severity`]. The input pollers end a session at once on an
//! error where [`PanelError::is_device_unavailable`] holds; anything else,
//! such as a [`PanelError::is_retryable`] transport failure, counts against
//! the retry budget.
//!
//! # Example
//!
//! ```
//! use flightpanel_errors::{ErrorSeverity, PanelError};
//!
//! let err = PanelError::not_found("Radio", 0x06A3, 0x0D05);
//! assert!(err.is_device_unavailable());
//! assert_eq!(err.severity(), ErrorSeverity::Error);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod panel;
pub mod severity;

pub use panel::PanelError;
pub use severity::ErrorSeverity;

/// A specialized `Result` type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;
