//! Local order desk: the `POST /api/order` acceptor.
//!
//! Re-validates the record with the same schema the form uses and answers
//! with `{ "message": ... }` in both the accepted and the rejected case.

use axum::{body::Bytes, http::StatusCode, Json};
use pzo_form::{catalog, validate::validate_incoming, OrderRecord};
use pzo_schemas::{IncomingOrder, OrderReply};
use tracing::info;

/// Check an incoming order and produce the reply message.
///
/// `Err` carries the first violation, which is what the client shows.
pub fn review_order(order: &IncomingOrder) -> Result<String, String> {
    let record = validate_incoming(order).map_err(|violations| {
        violations
            .into_iter()
            .next()
            .map(|(_, msg)| msg)
            .unwrap_or_else(|| "order rejected".to_string())
    })?;

    check_toppings_known(&record)?;
    Ok(confirmation_message(&record))
}

fn check_toppings_known(record: &OrderRecord) -> Result<(), String> {
    for (i, id) in record.toppings.iter().enumerate() {
        if catalog::find_topping(id).is_none() {
            return Err(format!("unknown topping id {id}"));
        }
        if record.toppings[..i].contains(id) {
            return Err(format!("duplicate topping id {id}"));
        }
    }
    Ok(())
}

fn confirmation_message(record: &OrderRecord) -> String {
    let size = catalog::size_label(&record.size).unwrap_or("custom");
    let toppings = match record.toppings.len() {
        0 => "no toppings".to_string(),
        1 => "1 topping".to_string(),
        n => format!("{n} toppings"),
    };
    format!(
        "Thank you for your order, {}! Your {} pizza with {} is on the way.",
        record.full_name.trim(),
        size,
        toppings
    )
}

// ---------------------------------------------------------------------------
// POST /api/order
// ---------------------------------------------------------------------------

pub(crate) async fn place_order(body: Bytes) -> (StatusCode, Json<OrderReply>) {
    let order: IncomingOrder = match serde_json::from_slice(&body) {
        Ok(o) => o,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(OrderReply::with_message("order body must be a JSON object")),
            );
        }
    };

    match review_order(&order) {
        Ok(message) => {
            info!(
                size = order.size.as_deref().unwrap_or(""),
                toppings = order.toppings.as_ref().map(Vec::len).unwrap_or(0),
                "desk accepted order"
            );
            (StatusCode::CREATED, Json(OrderReply::with_message(message)))
        }
        Err(message) => {
            info!(reason = %message, "desk rejected order");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(OrderReply::with_message(message)),
            )
        }
    }
}
