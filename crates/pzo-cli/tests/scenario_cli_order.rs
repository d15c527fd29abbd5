//! `pzo order` against a mock endpoint and against nothing at all.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;

fn pzo() -> Command {
    let mut cmd = Command::cargo_bin("pzo").expect("pzo binary");
    cmd.env_remove("PZO_ENDPOINT_URL");
    cmd
}

#[test]
fn accepted_order_prints_server_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/order")
            .json_body(serde_json::json!({
                "fullName": "Jordan",
                "size": "M",
                "toppings": ["1"]
            }));
        then.status(201)
            .json_body(serde_json::json!({ "message": "Order placed" }));
    });

    pzo()
        .args(["order", "--name", "Jordan", "--size", "M", "--topping", "1"])
        .args(["--endpoint", &server.base_url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("status=resolved"))
        .stdout(predicate::str::contains("outcome=success"))
        .stdout(predicate::str::contains("message=Order placed"));

    mock.assert();
}

#[test]
fn rejected_order_exits_1_with_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/order");
        then.status(422)
            .json_body(serde_json::json!({ "message": "kitchen closed" }));
    });

    pzo()
        .args(["order", "--name", "Jordan", "--size", "S"])
        .args(["--endpoint", &server.base_url()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("outcome=failure"))
        .stdout(predicate::str::contains("message=kitchen closed"));
}

#[test]
fn closed_gate_sends_nothing_and_exits_2() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/order");
        then.status(201)
            .json_body(serde_json::json!({ "message": "Order placed" }));
    });

    pzo()
        .args(["order", "--name", "Jo", "--size", "M"])
        .args(["--endpoint", &server.base_url()])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("status=gate_closed"))
        .stdout(predicate::str::contains("can_submit=false"));

    mock.assert_hits(0);
}

#[test]
fn unreachable_endpoint_is_a_failure_outcome() {
    pzo()
        .args(["order", "--name", "Jordan", "--size", "L"])
        .args(["--endpoint", "http://127.0.0.1:9"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("outcome=failure"));
}
