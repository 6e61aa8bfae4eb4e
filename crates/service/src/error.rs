//! HTTP error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flightpanel_errors::{ErrorSeverity, PanelError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Panel(PanelError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Panel(PanelError::NotConnected(_)) => StatusCode::CONFLICT,
            ApiError::Panel(PanelError::AccessDenied { .. }) => StatusCode::FORBIDDEN,
            ApiError::Panel(PanelError::InvalidArgument(_))
            | ApiError::Panel(PanelError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            ApiError::Panel(PanelError::TransportIo { timed_out: true, .. }) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Variant name reported as `errorKind` in the response body.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ApiError::Panel(e) => e.kind_name(),
            ApiError::Task(_) => "Task",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ApiError::Panel(e) => e.severity(),
            ApiError::Task(_) => ErrorSeverity::Critical,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Task(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind_name();
        let severity = self.severity();
        if severity >= ErrorSeverity::Critical {
            error!(status = %status, kind, error = %self, "request failed");
        } else {
            warn!(status = %status, kind, error = %self, "request failed");
        }
        let body = json!({
            "success": false,
            "error": self.to_string(),
            "errorKind": kind,
            "severity": severity.as_str(),
        });
        (status, Json(body)).into_response()
    }
}
