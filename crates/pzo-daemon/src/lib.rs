//! pzo-daemon library target.
//!
//! Exposes the router and state for integration tests.
//! The binary `main.rs` depends on this library target.

pub mod api_types;
pub mod desk;
pub mod pages;
pub mod routes;
pub mod state;
