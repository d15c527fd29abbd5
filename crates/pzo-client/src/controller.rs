//! Async driver for the submission state machine.
//!
//! The session lock is held only to start and to land a submission, never
//! across the network call, so edits keep flowing while a submission is in
//! flight.

use pzo_form::{FormSession, Outcome, SubmitRefusal, SubmitResolution};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{OrderAccepted, OrderEndpoint, SubmitError};

/// What a submit action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// Gate closed; no request was sent and nothing changed.
    GateClosed,
    /// Another submission is still awaiting its answer; nothing changed.
    Busy,
    /// The request completed and its outcome landed.
    Resolved { attempt: u64, outcome: Outcome },
}

impl SubmitReport {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitReport::GateClosed => "gate_closed",
            SubmitReport::Busy => "busy",
            SubmitReport::Resolved { .. } => "resolved",
        }
    }
}

/// Map an endpoint result to the outcome transition it triggers.
pub fn resolution_from(result: Result<OrderAccepted, SubmitError>) -> SubmitResolution {
    match result {
        Ok(OrderAccepted { message }) => SubmitResolution::Accepted { message },
        Err(e) => SubmitResolution::Rejected {
            message: e.user_message(),
        },
    }
}

/// Run one submit action against `endpoint`.
///
/// Every endpoint error is converted into a failure outcome; nothing is
/// returned as an error.
pub async fn submit_order(form: &Mutex<FormSession>, endpoint: &dyn OrderEndpoint) -> SubmitReport {
    let ticket = {
        let mut session = form.lock().await;
        match session.begin_submit() {
            Ok(t) => t,
            Err(SubmitRefusal::GateClosed) => return SubmitReport::GateClosed,
            Err(SubmitRefusal::InFlight) => return SubmitReport::Busy,
        }
    };

    let result = endpoint.place_order(ticket.order()).await;
    if let Err(e) = &result {
        warn!(
            endpoint = endpoint.endpoint_name(),
            attempt = ticket.attempt(),
            error = %e,
            "order submission failed"
        );
    }

    let mut session = form.lock().await;
    session.resolve_submit(ticket.attempt(), resolution_from(result));
    SubmitReport::Resolved {
        attempt: ticket.attempt(),
        outcome: session.outcome().clone(),
    }
}
