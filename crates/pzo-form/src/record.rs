//! Field value store: the order record and the edits that replace it.

use std::fmt;

use pzo_schemas::OrderRequest;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// One named slot of the order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Size,
    Toppings,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::FullName, Field::Size, Field::Toppings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Size => "size",
            Field::Toppings => "toppings",
        }
    }

    pub fn parse(s: &str) -> Result<Self, FieldParseError> {
        match s.trim() {
            "fullName" => Ok(Field::FullName),
            "size" => Ok(Field::Size),
            "toppings" => Ok(Field::Toppings),
            other => Err(FieldParseError(other.to_string())),
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Field::FullName => 0,
            Field::Size => 1,
            Field::Toppings => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Field::parse`] for a name outside the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError(pub String);

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown field '{}'. expected one of: fullName | size | toppings",
            self.0
        )
    }
}

impl std::error::Error for FieldParseError {}

// ---------------------------------------------------------------------------
// FieldEdit / FieldValue
// ---------------------------------------------------------------------------

/// A single user edit.
///
/// Toppings are never replaced wholesale: the edit is a membership toggle and
/// the store computes the new set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    FullName(String),
    Size(String),
    Topping { id: String, checked: bool },
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::FullName(_) => Field::FullName,
            FieldEdit::Size(_) => Field::Size,
            FieldEdit::Topping { .. } => Field::Toppings,
        }
    }
}

/// Candidate value of exactly one field, as handed to the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    FullName(String),
    Size(String),
    Toppings(Vec<String>),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::FullName(_) => Field::FullName,
            FieldValue::Size(_) => Field::Size,
            FieldValue::Toppings(_) => Field::Toppings,
        }
    }
}

// ---------------------------------------------------------------------------
// OrderRecord
// ---------------------------------------------------------------------------

/// The form's value object.
///
/// `size` is kept as typed text: `""` means unset, and anything outside
/// `S | M | L` is representable so the validator can reject it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub full_name: String,
    pub size: String,
    pub toppings: Vec<String>,
}

impl OrderRecord {
    /// Build the record that results from applying `edit`.
    ///
    /// `self` is left untouched; callers swap the returned value in.
    pub fn with_edit(&self, edit: &FieldEdit) -> OrderRecord {
        let mut next = self.clone();
        match edit {
            FieldEdit::FullName(v) => next.full_name = v.clone(),
            FieldEdit::Size(v) => next.size = v.clone(),
            FieldEdit::Topping { id, checked } => {
                next.toppings = toggle_topping(&self.toppings, id, *checked)
            }
        }
        next
    }

    pub fn value_of(&self, field: Field) -> FieldValue {
        match field {
            Field::FullName => FieldValue::FullName(self.full_name.clone()),
            Field::Size => FieldValue::Size(self.size.clone()),
            Field::Toppings => FieldValue::Toppings(self.toppings.clone()),
        }
    }

    pub fn has_topping(&self, id: &str) -> bool {
        self.toppings.iter().any(|t| t == id)
    }

    /// Wire body for `POST /api/order`.
    pub fn to_request(&self) -> OrderRequest {
        OrderRequest {
            full_name: self.full_name.clone(),
            size: self.size.clone(),
            toppings: self.toppings.clone(),
        }
    }
}

/// Compute the topping set after a membership toggle.
///
/// checked: append `id` unless already present.
/// unchecked: drop every occurrence of `id`.
pub fn toggle_topping(current: &[String], id: &str, checked: bool) -> Vec<String> {
    if checked {
        let mut out = current.to_vec();
        if !out.iter().any(|t| t == id) {
            out.push(id.to_string());
        }
        out
    } else {
        current.iter().filter(|t| *t != id).cloned().collect()
    }
}
