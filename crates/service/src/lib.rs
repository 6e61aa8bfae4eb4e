//! HTTP/JSON control surface for the Saitek flight panels.
//!
//! Wraps a [`PanelManager`](flightpanel_engine::PanelManager) in an axum
//! router. Panel calls block on USB, so every handler runs them on the
//! blocking pool through [`AppState::with_manager`].

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod observability;
mod page;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, EventLog};
