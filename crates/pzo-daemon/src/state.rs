//! Shared runtime state for pzo-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The form session is the
//! single mounted order form; it is owned here and mutated only through
//! `pzo-form` operations.

use std::sync::Arc;
use std::time::Duration;

use pzo_client::OrderEndpoint;
use pzo_form::{FormSession, FormView};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};

// ---------------------------------------------------------------------------
// BusMsg: SSE event bus payload
// ---------------------------------------------------------------------------

/// Messages broadcast over the internal event bus and surfaced as SSE events.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusMsg {
    Heartbeat { ts_millis: i64 },
    Form(FormView),
    LogLine { level: String, msg: String },
}

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast bus for SSE.
    pub bus: broadcast::Sender<BusMsg>,
    pub build: BuildInfo,
    /// The mounted order form.
    pub form: Arc<Mutex<FormSession>>,
    /// Where submissions go.
    pub endpoint: Arc<dyn OrderEndpoint>,
    /// Whether `POST /api/order` is served locally.
    pub desk_enabled: bool,
}

impl AppState {
    pub fn new(endpoint: Arc<dyn OrderEndpoint>, desk_enabled: bool) -> Self {
        let (bus, _rx) = broadcast::channel::<BusMsg>(1024);
        Self {
            bus,
            build: BuildInfo {
                service: "pzo-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            form: Arc::new(Mutex::new(FormSession::new())),
            endpoint,
            desk_enabled,
        }
    }

    /// Snapshot the form and publish it on the bus.
    pub async fn publish_form(&self) -> FormView {
        let view = self.form.lock().await.view();
        let _ = self.bus.send(BusMsg::Form(view.clone()));
        view
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn a background task that emits a heartbeat SSE every `interval`.
pub fn spawn_heartbeat(bus: broadcast::Sender<BusMsg>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let ts = chrono::Utc::now().timestamp_millis();
            let _ = bus.send(BusMsg::Heartbeat { ts_millis: ts });
        }
    });
}
