//! Form session: value store, error store, submit gate and submission state.
//!
//! # Invariants
//!
//! - **Gate is derived**: `can_submit()` is recomputed as the last step of
//!   every record replacement and has no setter.
//! - **Last edit wins**: every validation is stamped with a sequence number
//!   when it is triggered. A result is written to the error store only if its
//!   sequence number is still the latest issued for that field; older results
//!   are dropped, never applied late.
//! - **One outcome**: the outcome is replaced when a submission resolves and
//!   is not cleared when the next one starts.
//!
//! # Submission state diagram
//!
//! ```text
//!              begin_submit (gate open)
//!    Idle ─────────────────────────────► AwaitingResponse
//!     ▲                                    │          │
//!     │                         Accepted   │          │  Rejected
//!     │                                    ▼          ▼
//!     └──── begin_submit ◄───────── Resolved { accepted: bool }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pzo_schemas::OrderRequest;

use crate::validate::{validate_record, validate_value, FieldCheck};
use crate::{Field, FieldEdit, FieldValue, OrderRecord};

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Latest error message per field; `""` means valid or not yet validated.
///
/// Toppings has no error surface and is never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub full_name: String,
    pub size: String,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Size => &self.size,
            Field::Toppings => "",
        }
    }

    pub fn is_clear(&self) -> bool {
        self.full_name.is_empty() && self.size.is_empty()
    }

    fn set(&mut self, field: Field, message: &str) {
        match field {
            Field::FullName => self.full_name = message.to_string(),
            Field::Size => self.size = message.to_string(),
            Field::Toppings => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome / SubmissionPhase
// ---------------------------------------------------------------------------

/// Result of the most recent resolved submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    None,
    Success(String),
    Failure(String),
}

impl Outcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::None => None,
            Outcome::Success(m) | Outcome::Failure(m) => Some(m),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    AwaitingResponse { attempt: u64 },
    /// Behaves like `Idle` for the next submit.
    Resolved { attempt: u64, accepted: bool },
}

impl SubmissionPhase {
    pub fn accepts_submit(&self) -> bool {
        !matches!(self, SubmissionPhase::AwaitingResponse { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::AwaitingResponse { .. } => "awaiting_response",
            SubmissionPhase::Resolved { .. } => "resolved",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation tickets
// ---------------------------------------------------------------------------

/// A triggered single-field validation that has not completed yet.
///
/// Carries the candidate value captured at edit time, so running it later
/// still validates what the user typed then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTicket {
    seq: u64,
    value: FieldValue,
}

impl ValidationTicket {
    pub fn field(&self) -> Field {
        self.value.field()
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Evaluate the rule. Pure; may run anywhere.
    pub fn run(self) -> ValidationResult {
        ValidationResult {
            field: self.value.field(),
            seq: self.seq,
            check: validate_value(&self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub field: Field,
    pub seq: u64,
    pub check: FieldCheck,
}

// ---------------------------------------------------------------------------
// Submission tickets
// ---------------------------------------------------------------------------

/// Issued by [`FormSession::begin_submit`]; hand `order()` to the endpoint and
/// `attempt()` back to [`FormSession::resolve_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    attempt: u64,
    order: OrderRequest,
}

impl SubmitTicket {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn order(&self) -> &OrderRequest {
        &self.order
    }
}

/// Why a submit action was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRefusal {
    GateClosed,
    InFlight,
}

/// How the endpoint answered, already reduced to a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResolution {
    Accepted { message: String },
    Rejected { message: String },
}

// ---------------------------------------------------------------------------
// FormView
// ---------------------------------------------------------------------------

/// Serializable snapshot handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub values: OrderRecord,
    pub errors: FieldErrors,
    pub can_submit: bool,
    pub phase: SubmissionPhase,
    pub outcome: Outcome,
    pub revision: u64,
}

// ---------------------------------------------------------------------------
// FormSession
// ---------------------------------------------------------------------------

/// State owned by one mounted order form. Dropped with the form.
#[derive(Debug, Clone)]
pub struct FormSession {
    record: OrderRecord,
    revision: u64,
    errors: FieldErrors,
    gate_open: bool,
    next_seq: u64,
    latest_seq: [u64; 3],
    phase: SubmissionPhase,
    next_attempt: u64,
    outcome: Outcome,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    pub fn new() -> Self {
        let record = OrderRecord::default();
        let gate_open = validate_record(&record);
        Self {
            record,
            revision: 0,
            errors: FieldErrors::default(),
            gate_open,
            next_seq: 0,
            latest_seq: [0; 3],
            phase: SubmissionPhase::Idle,
            next_attempt: 0,
            outcome: Outcome::None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn record(&self) -> &OrderRecord {
        &self.record
    }

    /// Bumped on every record replacement.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The submit gate.
    pub fn can_submit(&self) -> bool {
        self.gate_open
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn view(&self) -> FormView {
        FormView {
            values: self.record.clone(),
            errors: self.errors.clone(),
            can_submit: self.gate_open,
            phase: self.phase,
            outcome: self.outcome.clone(),
            revision: self.revision,
        }
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Apply an edit to the value store and recompute the gate.
    ///
    /// Returns the validation triggered by this edit. The error store is not
    /// touched until the ticket's result is passed to
    /// [`complete_validation`](Self::complete_validation).
    pub fn apply_edit(&mut self, edit: FieldEdit) -> ValidationTicket {
        let field = edit.field();
        let next = self.record.with_edit(&edit);
        self.replace_record(next);
        self.issue_ticket(self.record.value_of(field))
    }

    /// Write a finished validation into the error store unless a newer one
    /// has been triggered for the same field since. Returns whether it landed.
    pub fn complete_validation(&mut self, result: ValidationResult) -> bool {
        let latest = self.latest_seq[result.field.index()];
        if result.seq != latest {
            debug!(
                field = %result.field,
                seq = result.seq,
                latest,
                "discarding stale validation"
            );
            return false;
        }
        self.errors.set(result.field, result.check.error_text());
        true
    }

    /// Validate a candidate value for one field and record the result.
    ///
    /// Does not change the record or the gate.
    pub fn validate_field(&mut self, value: FieldValue) -> FieldCheck {
        let result = self.issue_ticket(value).run();
        let check = result.check.clone();
        self.complete_validation(result);
        check
    }

    /// Edit, validate and record in one synchronous step.
    pub fn edit(&mut self, edit: FieldEdit) -> FieldCheck {
        let result = self.apply_edit(edit).run();
        let check = result.check.clone();
        self.complete_validation(result);
        check
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Start a submission if the gate is open and none is in flight.
    ///
    /// A refusal leaves every piece of state untouched.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRefusal> {
        if !self.gate_open {
            info!("submit ignored: gate closed");
            return Err(SubmitRefusal::GateClosed);
        }
        if !self.phase.accepts_submit() {
            info!("submit ignored: submission already in flight");
            return Err(SubmitRefusal::InFlight);
        }

        self.next_attempt += 1;
        let attempt = self.next_attempt;
        self.phase = SubmissionPhase::AwaitingResponse { attempt };
        info!(
            attempt,
            size = %self.record.size,
            toppings = self.record.toppings.len(),
            "submission started"
        );

        Ok(SubmitTicket {
            attempt,
            order: self.record.to_request(),
        })
    }

    /// Land the endpoint's answer for `attempt`.
    ///
    /// Accepted: the record resets to defaults and the outcome becomes
    /// success. Rejected: the record is kept and the outcome becomes failure.
    /// Returns `false` (and changes nothing) when `attempt` is not the one
    /// currently awaited.
    pub fn resolve_submit(&mut self, attempt: u64, resolution: SubmitResolution) -> bool {
        match self.phase {
            SubmissionPhase::AwaitingResponse { attempt: current } if current == attempt => {}
            other => {
                warn!(attempt, phase = other.as_str(), "ignoring unexpected submission resolution");
                return false;
            }
        }

        match resolution {
            SubmitResolution::Accepted { message } => {
                info!(attempt, "submission accepted");
                self.replace_record(OrderRecord::default());
                self.invalidate_pending_validations();
                self.outcome = Outcome::Success(message);
                self.phase = SubmissionPhase::Resolved {
                    attempt,
                    accepted: true,
                };
            }
            SubmitResolution::Rejected { message } => {
                info!(attempt, reason = %message, "submission rejected");
                self.outcome = Outcome::Failure(message);
                self.phase = SubmissionPhase::Resolved {
                    attempt,
                    accepted: false,
                };
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn replace_record(&mut self, next: OrderRecord) {
        self.record = next;
        self.revision += 1;
        self.recompute_gate();
    }

    fn recompute_gate(&mut self) {
        self.gate_open = validate_record(&self.record);
    }

    fn issue_ticket(&mut self, value: FieldValue) -> ValidationTicket {
        let seq = self.stamp(value.field());
        ValidationTicket { seq, value }
    }

    fn stamp(&mut self, field: Field) -> u64 {
        self.next_seq += 1;
        self.latest_seq[field.index()] = self.next_seq;
        self.next_seq
    }

    // A reset replaces every field, so validations triggered before it no
    // longer describe the record.
    fn invalidate_pending_validations(&mut self) {
        for f in Field::ALL {
            self.stamp(f);
        }
    }
}
