//! HttpOrderEndpoint against an httpmock server. No external network.

use httpmock::prelude::*;
use pzo_client::{HttpOrderEndpoint, OrderEndpoint, SubmitError};
use pzo_schemas::OrderRequest;
use serde_json::json;

fn order() -> OrderRequest {
    OrderRequest {
        full_name: "Jordan".to_string(),
        size: "M".to_string(),
        toppings: vec!["1".to_string(), "4".to_string()],
    }
}

#[tokio::test]
async fn accepted_order_returns_server_message() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/order")
                .json_body(json!({"fullName": "Jordan", "size": "M", "toppings": ["1", "4"]}));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"message": "Order placed"}));
        })
        .await;

    let ep = HttpOrderEndpoint::new(server.base_url());
    let accepted = ep.place_order(&order()).await.expect("2xx must be accepted");

    assert_eq!(accepted.message, "Order placed");
    mock.assert_async().await;
}

#[tokio::test]
async fn rejection_surfaces_server_message_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/order");
            then.status(422)
                .header("content-type", "application/json")
                .json_body(json!({"message": "size must be S or M or L"}));
        })
        .await;

    let ep = HttpOrderEndpoint::new(server.base_url());
    let err = ep.place_order(&order()).await.unwrap_err();

    assert_eq!(
        err,
        SubmitError::Rejected {
            status: 422,
            message: Some("size must be S or M or L".to_string())
        }
    );
    assert_eq!(err.user_message(), "size must be S or M or L");
}

#[tokio::test]
async fn rejection_without_json_uses_status_description() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/order");
            then.status(502).body("<html>bad gateway</html>");
        })
        .await;

    let ep = HttpOrderEndpoint::new(server.base_url());
    let err = ep.place_order(&order()).await.unwrap_err();

    assert_eq!(err.user_message(), "order endpoint returned HTTP 502");
}

#[tokio::test]
async fn success_without_message_is_a_decode_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/order");
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;

    let ep = HttpOrderEndpoint::new(server.base_url());
    let err = ep.place_order(&order()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    // Port 9 (discard) on localhost is not listening in test environments.
    let ep = HttpOrderEndpoint::new("http://127.0.0.1:9");
    let err = ep.place_order(&order()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)), "got {err:?}");
    assert!(!err.user_message().is_empty());
}
