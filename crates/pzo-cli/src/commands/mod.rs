//! Command handler modules for pzo-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod order;

use anyhow::Result;
use pzo_form::{catalog, Field, FieldEdit, FormSession, FormView};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Reject a `--topping` id that is not in the catalog.
pub fn parse_topping_id(id: &str) -> Result<String> {
    let id = id.trim();
    if catalog::find_topping(id).is_some() {
        return Ok(id.to_string());
    }
    let known: Vec<&str> = catalog::TOPPINGS.iter().map(|t| t.id).collect();
    anyhow::bail!(
        "unknown topping id '{}'. expected one of: {}",
        id,
        known.join(" | ")
    )
}

/// Drive a fresh form through the same edits a user would make.
pub fn fill_session(name: &str, size: &str, toppings: &[String]) -> Result<FormSession> {
    let mut session = FormSession::new();
    session.edit(FieldEdit::FullName(name.to_string()));
    session.edit(FieldEdit::Size(size.to_string()));
    for raw in toppings {
        let id = parse_topping_id(raw)?;
        session.edit(FieldEdit::Topping { id, checked: true });
    }
    Ok(session)
}

/// `key=value` lines for the per-field errors and the gate.
pub fn print_form(view: &FormView) {
    println!("full_name_error={}", view.errors.get(Field::FullName));
    println!("size_error={}", view.errors.get(Field::Size));
    println!("toppings={}", view.values.toppings.join(","));
    println!("can_submit={}", view.can_submit);
}
