//! Wire types shared by the order client, the order desk and the page shell.
//!
//! Field names follow the JSON contract of `POST /api/order`
//! (`fullName`, `size`, `toppings`). No validation lives here.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/order` as sent by the submission controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub full_name: String,
    /// `"S" | "M" | "L"`.
    pub size: String,
    pub toppings: Vec<String>,
}

/// Lenient view of an incoming order body.
///
/// Every key is optional so the receiving side can report a missing key as a
/// rule violation instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingOrder {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub toppings: Option<Vec<String>>,
}

/// Reply body for both accepted and rejected orders.
///
/// `message` is optional on decode: a rejection without a structured message
/// is still a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OrderReply {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// One checkbox entry of the topping catalog as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToppingView {
    pub id: String,
    pub label: String,
}
