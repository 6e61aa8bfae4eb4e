//! Error types for panelctl

use flightpanel_errors::PanelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Panel not found: {0}")]
    PanelNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Process exit code for a failed command.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    let panel = error
        .downcast_ref::<PanelError>()
        .or_else(|| match error.downcast_ref::<CliError>() {
            Some(CliError::Panel(e)) => Some(e),
            _ => None,
        });
    if let Some(e) = panel {
        return match e {
            PanelError::NotFound { .. } | PanelError::NotConnected(_) => 2,
            PanelError::InvalidArgument(_) | PanelError::UnsupportedFormat(_) => 4,
            PanelError::AccessDenied { .. } => 6,
            _ => 1,
        };
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::PanelNotFound(_)) => 2,
        Some(CliError::ValidationError(_)) | Some(CliError::JsonError(_)) => 4,
        _ => 1,
    }
}
