//! Router tests against mock panels, driven through `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use flightpanel_engine::{EngineConfig, PanelManager};
use flightpanel_service::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn app() -> (Router, AppState) {
    let state = AppState::new(PanelManager::mock(EngineConfig::default()), 8);
    (router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn index_serves_the_control_page() -> TestResult {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(String::from_utf8(bytes.to_vec())?.contains("/api/radio/set"));
    Ok(())
}

#[tokio::test]
async fn setters_before_connect_conflict() -> TestResult {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/radio/set",
        Some(json!({ "com1Active": "118.00" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(body["errorKind"], "NotConnected");
    assert_eq!(body["severity"], "critical");
    Ok(())
}

#[tokio::test]
async fn connect_then_drive_every_panel() -> TestResult {
    let (app, _) = app();
    let (status, body) = send(&app, Method::POST, "/api/connect", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["panels"].as_array().map(Vec::len), Some(4));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/radio/set",
        Some(json!({
            "com1Active": "118.00",
            "com1Standby": "118.50",
            "com2Active": "121.30",
            "com2Standby": "121.90"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"]["com2Standby"], "121.90");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/multi/set",
        Some(json!({ "topRow": "250", "bottomRow": "3000", "leds": 1 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"]["leds"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/switch/set",
        Some(json!({ "greenN": true, "greenL": true, "greenR": true })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lights"]["redN"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/fip/pattern",
        Some(json!({ "pattern": "bars" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pattern"], "bars");

    let (_, body) = send(&app, Method::GET, "/api/status", None).await?;
    assert_eq!(body["status"]["panels"][0]["display"]["com1Active"], "118.00");
    assert_eq!(body["status"]["panels"][3]["display"]["source"], "pattern");
    Ok(())
}

#[tokio::test]
async fn unknown_pattern_is_a_bad_request() -> TestResult {
    let (app, _) = app();
    send(&app, Method::POST, "/api/connect", None).await?;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/fip/pattern",
        Some(json!({ "pattern": "plaid" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("plaid")));
    assert_eq!(body["errorKind"], "InvalidArgument");
    Ok(())
}

#[tokio::test]
async fn events_start_empty_and_stay_bounded() -> TestResult {
    let (app, state) = app();
    send(&app, Method::POST, "/api/connect", None).await?;
    // Mock reads are all zeros, so no transitions arrive.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let (status, body) = send(&app, Method::GET, "/api/events", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().map(Vec::len), Some(0));
    assert!(state.events().snapshot().is_empty());
    state.close_all().await?;
    Ok(())
}

#[tokio::test]
async fn radio_and_multi_keep_caller_padding() -> TestResult {
    let (app, _) = app();
    send(&app, Method::POST, "/api/connect", None).await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/radio/set",
        Some(json!({ "com1Active": "  118", "com1Standby": "-5" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"]["com1Active"], "  118");
    assert_eq!(body["display"]["com1Standby"], "-5");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/multi/set",
        Some(json!({ "topRow": "  250" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"]["topRow"], "  250");
    Ok(())
}
