//! Request and response types for the JSON endpoints.
//!
//! No business logic lives here beyond turning a request body into a typed
//! edit.

use pzo_form::{Field, FieldEdit, FormView};
use pzo_schemas::ToppingView;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Errors (400)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// /v1/toppings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToppingsResponse {
    pub toppings: Vec<ToppingView>,
}

// ---------------------------------------------------------------------------
// /v1/form/field
// ---------------------------------------------------------------------------

/// `{"field":"fullName","value":"Jo"}`, `{"field":"size","value":"M"}` or
/// `{"field":"toppings","id":"1","checked":true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEditRequest {
    pub field: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
}

impl FieldEditRequest {
    pub fn into_edit(self) -> Result<FieldEdit, String> {
        let field = Field::parse(&self.field).map_err(|e| e.to_string())?;
        match field {
            Field::FullName => self
                .value
                .map(FieldEdit::FullName)
                .ok_or_else(|| "fullName edit requires 'value'".to_string()),
            Field::Size => self
                .value
                .map(FieldEdit::Size)
                .ok_or_else(|| "size edit requires 'value'".to_string()),
            Field::Toppings => match (self.id, self.checked) {
                (Some(id), Some(checked)) => Ok(FieldEdit::Topping { id, checked }),
                _ => Err("toppings edit requires 'id' and 'checked'".to_string()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// /v1/form/submit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// "gate_closed" | "busy" | "resolved"
    pub status: String,
    pub form: FormView,
}
