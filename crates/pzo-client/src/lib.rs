//! pzo-client
//!
//! Order-acceptance endpoint boundary and the async submission driver.
//!
//! The form crate owns the submission state machine; this crate owns the
//! one suspension point: sending the record and waiting for the answer.

pub mod controller;
mod endpoint;
mod http;

pub use controller::{resolution_from, submit_order, SubmitReport};
pub use endpoint::{OrderAccepted, OrderEndpoint, SubmitError};
pub use http::{HttpOrderEndpoint, ORDER_PATH};
