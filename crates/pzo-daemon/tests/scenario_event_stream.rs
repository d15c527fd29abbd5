//! Scenario: form mutations are published on the bus and surface as SSE.
//!
//! # Invariants under test
//!
//! - `POST /v1/form/field` publishes a `Form` snapshot with the new values.
//! - `POST /v1/form/submit` publishes a log line and then the resolved form.
//! - `GET /v1/stream` answers `text/event-stream` and frames bus messages as
//!   named events.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use pzo_client::{OrderAccepted, OrderEndpoint, SubmitError};
use pzo_daemon::{routes, state, state::BusMsg};
use pzo_schemas::OrderRequest;
use tokio::sync::broadcast;
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct AcceptingEndpoint;

#[async_trait::async_trait]
impl OrderEndpoint for AcceptingEndpoint {
    fn endpoint_name(&self) -> &'static str {
        "accepting"
    }

    async fn place_order(&self, _order: &OrderRequest) -> Result<OrderAccepted, SubmitError> {
        Ok(OrderAccepted {
            message: "Order placed".to_string(),
        })
    }
}

fn fresh_state() -> Arc<state::AppState> {
    Arc::new(state::AppState::new(Arc::new(AcceptingEndpoint), true))
}

async fn post_field(st: &Arc<state::AppState>, body: serde_json::Value) -> StatusCode {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/form/field")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    let resp = routes::build_router(Arc::clone(st))
        .oneshot(req)
        .await
        .expect("oneshot failed");
    resp.status()
}

async fn next_msg(rx: &mut broadcast::Receiver<BusMsg>) -> BusMsg {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no bus message within 2s")
        .expect("bus closed")
}

// ---------------------------------------------------------------------------
// Bus publishing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn field_edit_publishes_form_snapshot() {
    let st = fresh_state();
    let mut rx = st.bus.subscribe();

    let edit = serde_json::json!({"field": "fullName", "value": "Jordan"});
    let status = post_field(&st, edit).await;
    assert_eq!(status, StatusCode::OK);

    match next_msg(&mut rx).await {
        BusMsg::Form(view) => {
            assert_eq!(view.values.full_name, "Jordan");
            assert_eq!(view.errors.full_name, "");
            assert!(!view.can_submit);
        }
        other => panic!("expected form snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_publishes_log_line_then_resolved_form() {
    let st = fresh_state();
    post_field(&st, serde_json::json!({"field": "fullName", "value": "Jordan"})).await;
    post_field(&st, serde_json::json!({"field": "size", "value": "S"})).await;

    let mut rx = st.bus.subscribe();
    let req = Request::builder()
        .method("POST")
        .uri("/v1/form/submit")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = routes::build_router(Arc::clone(&st))
        .oneshot(req)
        .await
        .expect("oneshot failed");
    assert_eq!(resp.status(), StatusCode::OK);

    match next_msg(&mut rx).await {
        BusMsg::LogLine { level, msg } => {
            assert_eq!(level, "INFO");
            assert_eq!(msg, "order accepted");
        }
        other => panic!("expected log line, got {other:?}"),
    }
    match next_msg(&mut rx).await {
        BusMsg::Form(view) => {
            assert_eq!(view.values.full_name, "");
            assert_eq!(view.outcome.message(), Some("Order placed"));
        }
        other => panic!("expected form snapshot, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_frames_bus_messages_as_named_events() {
    let st = fresh_state();

    let req = Request::builder()
        .method("GET")
        .uri("/v1/stream")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = routes::build_router(Arc::clone(&st))
        .oneshot(req)
        .await
        .expect("oneshot failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");

    // The handler subscribed before answering, so this reaches the stream.
    st.bus
        .send(BusMsg::Heartbeat { ts_millis: 42 })
        .expect("stream subscriber present");

    let mut body = resp.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
        .await
        .expect("no sse frame within 2s")
        .expect("stream ended")
        .expect("frame error");
    let data = frame.into_data().expect("data frame");
    let text = String::from_utf8_lossy(&data);

    assert!(text.contains("event: heartbeat"), "{text}");
    assert!(text.contains("\"ts_millis\":42"), "{text}");
}
