//! Scenario: submission through the daemon and the local order desk.
//!
//! # Invariants under test
//!
//! - Submitting with the gate closed sends nothing.
//! - An accepted order resets the form and shows the server's message.
//! - A rejected order keeps the values and shows the failure message.
//! - `POST /api/order` answers 201 / 422 / 400 and is absent when disabled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pzo_client::{OrderAccepted, OrderEndpoint, SubmitError};
use pzo_daemon::{routes, state};
use pzo_schemas::OrderRequest;
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct StubEndpoint {
    answer: Result<OrderAccepted, SubmitError>,
    calls: AtomicUsize,
}

impl StubEndpoint {
    fn new(answer: Result<OrderAccepted, SubmitError>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl OrderEndpoint for StubEndpoint {
    fn endpoint_name(&self) -> &'static str {
        "stub"
    }

    async fn place_order(&self, _order: &OrderRequest) -> Result<OrderAccepted, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

fn accepted(msg: &str) -> Result<OrderAccepted, SubmitError> {
    Ok(OrderAccepted {
        message: msg.to_string(),
    })
}

async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

fn parse_json(b: bytes::Bytes) -> serde_json::Value {
    serde_json::from_slice(&b).expect("body is not valid JSON")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

async fn fill_valid(st: &Arc<state::AppState>) {
    for edit in [
        serde_json::json!({"field": "fullName", "value": "Jordan"}),
        serde_json::json!({"field": "size", "value": "M"}),
        serde_json::json!({"field": "toppings", "id": "1", "checked": true}),
    ] {
        let (status, _) = call(
            routes::build_router(Arc::clone(st)),
            post_json("/v1/form/field", edit),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

// ---------------------------------------------------------------------------
// POST /v1/form/submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_with_closed_gate_sends_nothing() {
    let endpoint = StubEndpoint::new(accepted("Order placed"));
    let st = Arc::new(state::AppState::new(endpoint.clone(), true));

    let (status, body) = call(routes::build_router(st), post_empty("/v1/form/submit")).await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    assert_eq!(json["status"], "gate_closed");
    assert_eq!(json["form"]["phase"]["state"], "idle");
    assert_eq!(endpoint.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn accepted_submit_resets_form() {
    let endpoint = StubEndpoint::new(accepted("Order placed"));
    let st = Arc::new(state::AppState::new(endpoint.clone(), true));
    fill_valid(&st).await;

    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        post_empty("/v1/form/submit"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["form"]["outcome"]["kind"], "success");
    assert_eq!(json["form"]["outcome"]["message"], "Order placed");
    assert_eq!(json["form"]["values"]["fullName"], "");
    assert_eq!(json["form"]["values"]["toppings"], serde_json::json!([]));
    assert_eq!(json["form"]["canSubmit"], false);
    assert_eq!(json["form"]["phase"]["accepted"], true);
    assert_eq!(endpoint.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_submit_keeps_values() {
    let endpoint = StubEndpoint::new(Err(SubmitError::Rejected {
        status: 422,
        message: Some("size must be S or M or L".to_string()),
    }));
    let st = Arc::new(state::AppState::new(endpoint, true));
    fill_valid(&st).await;

    let (_, body) = call(routes::build_router(st), post_empty("/v1/form/submit")).await;

    let json = parse_json(body);
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["form"]["outcome"]["kind"], "failure");
    assert_eq!(json["form"]["outcome"]["message"], "size must be S or M or L");
    assert_eq!(json["form"]["values"]["fullName"], "Jordan");
    assert_eq!(json["form"]["values"]["size"], "M");
    assert_eq!(json["form"]["canSubmit"], true);
}

#[tokio::test]
async fn html_place_order_shows_success_banner() {
    let endpoint = StubEndpoint::new(accepted("Order placed"));
    let st = Arc::new(state::AppState::new(endpoint, true));

    let req = Request::builder()
        .method("POST")
        .uri("/order")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(
            "fullName=Jordan&size=L&topping_2=on&action=submit",
        ))
        .unwrap();
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("<div class=\"success\">Order placed</div>"));
    assert!(html.contains("value=\"\""));
}

// ---------------------------------------------------------------------------
// POST /api/order (local desk)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn desk_accepts_valid_order() {
    let st = Arc::new(state::AppState::new(StubEndpoint::new(accepted("x")), true));

    let (status, body) = call(
        routes::build_router(st),
        post_json(
            "/api/order",
            serde_json::json!({"fullName": "Jordan", "size": "M", "toppings": ["1"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        parse_json(body)["message"],
        "Thank you for your order, Jordan! Your medium pizza with 1 topping is on the way."
    );
}

#[tokio::test]
async fn desk_rejects_invalid_order_with_first_violation() {
    let st = Arc::new(state::AppState::new(StubEndpoint::new(accepted("x")), true));

    let (status, body) = call(
        routes::build_router(st),
        post_json(
            "/api/order",
            serde_json::json!({"fullName": "Jordan", "size": "XL", "toppings": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(parse_json(body)["message"], "size must be S or M or L");
}

#[tokio::test]
async fn desk_rejects_non_json_body() {
    let st = Arc::new(state::AppState::new(StubEndpoint::new(accepted("x")), true));

    let req = Request::builder()
        .method("POST")
        .uri("/api/order")
        .body(axum::body::Body::from("not json"))
        .unwrap();
    let (status, body) = call(routes::build_router(st), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(body)["message"], "order body must be a JSON object");
}

#[tokio::test]
async fn desk_absent_when_disabled() {
    let st = Arc::new(state::AppState::new(StubEndpoint::new(accepted("x")), false));

    let (status, _) = call(
        routes::build_router(st),
        post_json(
            "/api/order",
            serde_json::json!({"fullName": "Jordan", "size": "M", "toppings": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
