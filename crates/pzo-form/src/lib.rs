//! pzo-form
//!
//! Order form state: field values, per-field errors, the derived submit gate
//! and the submission state machine.
//!
//! Pure deterministic logic. No IO, no clock, no async. The network call is
//! driven from outside (see `pzo-client::controller`) through the
//! [`FormSession::begin_submit`] / [`FormSession::resolve_submit`] pair.

pub mod catalog;
mod record;
mod session;
pub mod validate;

pub use catalog::{find_topping, size_label, ToppingOption, SIZE_OPTIONS, TOPPINGS};
pub use record::{toggle_topping, Field, FieldEdit, FieldParseError, FieldValue, OrderRecord};
pub use session::{
    FieldErrors, FormSession, FormView, Outcome, SubmissionPhase, SubmitRefusal,
    SubmitResolution, SubmitTicket, ValidationResult, ValidationTicket,
};
pub use validate::{validate_record, validate_value, FieldCheck};
