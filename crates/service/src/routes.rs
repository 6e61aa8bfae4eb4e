//! HTTP routes
//!
//! Request bodies mirror the display models: `com1Active`..`com2Standby` for
//! the Radio panel, `topRow`/`bottomRow`/`leds` for the Multi panel and
//! `greenN`..`redR` for the Switch panel lights.

use std::str::FromStr;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use flightpanel_framebuffer::Pattern;
use flightpanel_protocol::{GearLights, LandingGearLights, MultiDisplay, RadioDisplay};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::error::ApiError;
use crate::page::INDEX_HTML;
use crate::state::AppState;

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct PatternRequest {
    pub pattern: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(status))
        .route("/api/connect", post(connect))
        .route("/api/radio/set", post(set_radio))
        .route("/api/multi/set", post(set_multi))
        .route("/api/switch/set", post(set_switch))
        .route("/api/fip/pattern", post(fip_pattern))
        .route("/api/events", get(events))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn status(State(state): State<AppState>) -> ApiResult {
    let status = state.status().await?;
    Ok(Json(json!({ "success": true, "status": status })))
}

async fn connect(State(state): State<AppState>) -> ApiResult {
    let status = state.connect_all().await?;
    Ok(Json(json!({ "success": true, "status": status })))
}

async fn set_radio(State(state): State<AppState>, Json(radio): Json<RadioDisplay>) -> ApiResult {
    info!(com1 = %radio.com1_active, com2 = %radio.com2_active, "radio display");
    let sent = state
        .with_manager(move |manager| {
            let panel = manager.radio_mut()?;
            panel.set_display(&radio)?;
            Ok(panel.last_display().cloned())
        })
        .await?;
    Ok(Json(json!({ "success": true, "display": sent })))
}

async fn set_multi(State(state): State<AppState>, Json(rows): Json<MultiDisplay>) -> ApiResult {
    let sent = state
        .with_manager(move |manager| {
            let panel = manager.multi_mut()?;
            panel.set_display(&rows)?;
            Ok(panel.last_display().cloned())
        })
        .await?;
    Ok(Json(json!({ "success": true, "display": sent })))
}

async fn set_switch(
    State(state): State<AppState>,
    Json(lights): Json<LandingGearLights>,
) -> ApiResult {
    state
        .with_manager(move |manager| manager.set_switch_lights(GearLights::from(lights)))
        .await?;
    Ok(Json(json!({ "success": true, "lights": lights })))
}

async fn fip_pattern(
    State(state): State<AppState>,
    Json(request): Json<PatternRequest>,
) -> ApiResult {
    let pattern = Pattern::from_str(&request.pattern)?;
    state
        .with_manager(move |manager| manager.show_fip_pattern(pattern))
        .await?;
    Ok(Json(json!({ "success": true, "pattern": pattern.name() })))
}

async fn events(State(state): State<AppState>) -> ApiResult {
    Ok(Json(json!({ "success": true, "events": state.events().snapshot() })))
}
