//! Endpoint contract for order submission.

use std::fmt;

use pzo_schemas::OrderRequest;

/// A 2xx answer carrying the server's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAccepted {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Every way a submission can fail.
///
/// From the user's point of view all variants are the same failure; they are
/// kept apart for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Non-2xx answer. `message` is the server's structured message, if any.
    Rejected { status: u16, message: Option<String> },
    /// The request never produced a response.
    Transport(String),
    /// A response arrived but could not be understood.
    Decode(String),
}

impl SubmitError {
    /// Text surfaced as the failure outcome.
    ///
    /// The server's message verbatim when there is one, otherwise the
    /// transport-level description.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected {
                message: Some(m), ..
            } => m.clone(),
            SubmitError::Rejected {
                status,
                message: None,
            } => format!("order endpoint returned HTTP {status}"),
            SubmitError::Transport(desc) | SubmitError::Decode(desc) => desc.clone(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected {
                status,
                message: Some(m),
            } => write!(f, "order rejected status={status}: {m}"),
            SubmitError::Rejected {
                status,
                message: None,
            } => write!(f, "order rejected status={status}"),
            SubmitError::Transport(msg) => write!(f, "transport error: {msg}"),
            SubmitError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

// ---------------------------------------------------------------------------
// OrderEndpoint
// ---------------------------------------------------------------------------

/// Remote order-acceptance service.
///
/// Object safe so callers can hold an `Arc<dyn OrderEndpoint>`; `Send + Sync`
/// so it can be shared across handler tasks.
#[async_trait::async_trait]
pub trait OrderEndpoint: Send + Sync {
    /// Short name for logs (e.g. `"http"`).
    fn endpoint_name(&self) -> &'static str;

    /// Send one order and wait for the answer. No retries.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAccepted, SubmitError>;
}
