//! Schema validator.
//!
//! One pure function per field returning a [`FieldCheck`]; the whole-record
//! check is their conjunction. Single-field checks look at the candidate value
//! only and never at the other fields.

use pzo_schemas::IncomingOrder;

use crate::{Field, FieldValue, OrderRecord};

pub const FULL_NAME_MIN_CHARS: usize = 3;
pub const FULL_NAME_MAX_CHARS: usize = 20;

pub const FULL_NAME_TOO_SHORT: &str = "full name must be at least 3 characters";
pub const FULL_NAME_TOO_LONG: &str = "full name must be at most 20 characters";
pub const SIZE_INVALID: &str = "size must be S or M or L";
pub const TOPPINGS_MISSING: &str = "toppings must be a list";

/// Accepted size codes.
pub const SIZES: [&str; 3] = ["S", "M", "L"];

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Accepted,
    Rejected(String),
}

impl FieldCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FieldCheck::Accepted)
    }

    /// Text for the error store: `""` when accepted.
    pub fn error_text(&self) -> &str {
        match self {
            FieldCheck::Accepted => "",
            FieldCheck::Rejected(msg) => msg,
        }
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Length is counted in characters after trimming; empty falls into the
/// too-short branch.
///
/// "Characters" are Unicode scalar values and trimming uses `str::trim`, so
/// U+FEFF is kept and counted. Browser-side `trim()` strips it and counts
/// UTF-16 units; this server-side rule is the one that decides.
pub fn check_full_name(candidate: &str) -> FieldCheck {
    let len = candidate.trim().chars().count();
    if len < FULL_NAME_MIN_CHARS {
        FieldCheck::Rejected(FULL_NAME_TOO_SHORT.to_string())
    } else if len > FULL_NAME_MAX_CHARS {
        FieldCheck::Rejected(FULL_NAME_TOO_LONG.to_string())
    } else {
        FieldCheck::Accepted
    }
}

pub fn check_size(candidate: &str) -> FieldCheck {
    if SIZES.contains(&candidate) {
        FieldCheck::Accepted
    } else {
        FieldCheck::Rejected(SIZE_INVALID.to_string())
    }
}

/// Any list passes, including an empty one. Only an absent list fails.
pub fn check_toppings(candidate: Option<&[String]>) -> FieldCheck {
    match candidate {
        Some(_) => FieldCheck::Accepted,
        None => FieldCheck::Rejected(TOPPINGS_MISSING.to_string()),
    }
}

pub fn validate_value(value: &FieldValue) -> FieldCheck {
    match value {
        FieldValue::FullName(s) => check_full_name(s),
        FieldValue::Size(s) => check_size(s),
        FieldValue::Toppings(t) => check_toppings(Some(t)),
    }
}

// ---------------------------------------------------------------------------
// Whole record
// ---------------------------------------------------------------------------

pub fn validate_record(record: &OrderRecord) -> bool {
    record_violations(record).is_empty()
}

/// Every failing field with its message, in declaration order.
pub fn record_violations(record: &OrderRecord) -> Vec<(Field, String)> {
    Field::ALL
        .iter()
        .filter_map(|f| match validate_value(&record.value_of(*f)) {
            FieldCheck::Accepted => None,
            FieldCheck::Rejected(msg) => Some((*f, msg)),
        })
        .collect()
}

/// Validate a body received over the wire.
///
/// Missing `fullName` or `size` fail through their ordinary rules (an absent
/// value is treated as empty); a missing `toppings` key is its own failure.
pub fn validate_incoming(order: &IncomingOrder) -> Result<OrderRecord, Vec<(Field, String)>> {
    let record = OrderRecord {
        full_name: order.full_name.clone().unwrap_or_default(),
        size: order.size.clone().unwrap_or_default(),
        toppings: order.toppings.clone().unwrap_or_default(),
    };

    let mut violations = Vec::new();
    if let FieldCheck::Rejected(msg) = check_full_name(&record.full_name) {
        violations.push((Field::FullName, msg));
    }
    if let FieldCheck::Rejected(msg) = check_size(&record.size) {
        violations.push((Field::Size, msg));
    }
    if let FieldCheck::Rejected(msg) = check_toppings(order.toppings.as_deref()) {
        violations.push((Field::Toppings, msg));
    }

    if violations.is_empty() {
        Ok(record)
    } else {
        Err(violations)
    }
}
