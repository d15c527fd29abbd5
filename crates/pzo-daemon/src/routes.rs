//! Axum router and all HTTP handlers for pzo-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers, so tests can drive the bare router.

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Form, Json, Router,
};
use futures_util::{Stream, StreamExt};
use pzo_client::{submit_order, SubmitReport, ORDER_PATH};
use pzo_form::{catalog, FieldEdit, FormView};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;

use crate::{
    api_types::{
        ErrorResponse, FieldEditRequest, HealthResponse, SubmitResponse, ToppingsResponse,
    },
    desk, pages,
    state::{AppState, BusMsg},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(landing))
        .route("/order", get(order_page).post(order_page_post))
        .route("/v1/health", get(health))
        .route("/v1/toppings", get(toppings))
        .route("/v1/form", get(form_view))
        .route("/v1/form/field", post(form_field))
        .route("/v1/form/submit", post(form_submit))
        .route("/v1/stream", get(stream));

    if state.desk_enabled {
        router = router.route(ORDER_PATH, post(desk::place_order));
    }

    router.with_state(state)
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

pub(crate) async fn landing() -> Html<String> {
    Html(pages::render_landing())
}

pub(crate) async fn order_page(State(st): State<Arc<AppState>>) -> Html<String> {
    let view = st.form.lock().await.view();
    Html(pages::render_order(&view))
}

/// Plain HTML form post. Applies the posted values as edits, then submits
/// when the "Place order" button was used.
pub(crate) async fn order_page_post(
    State(st): State<Arc<AppState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    {
        let mut s = st.form.lock().await;
        s.edit(FieldEdit::FullName(
            fields.get("fullName").cloned().unwrap_or_default(),
        ));
        s.edit(FieldEdit::Size(fields.get("size").cloned().unwrap_or_default()));
        for t in catalog::TOPPINGS.iter() {
            let wanted = fields.contains_key(&pages::topping_input_name(t.id));
            if wanted != s.record().has_topping(t.id) {
                s.edit(FieldEdit::Topping {
                    id: t.id.to_string(),
                    checked: wanted,
                });
            }
        }
    }

    if fields.get("action").map(String::as_str) == Some("submit") {
        let report = run_submit(&st).await;
        info!(status = report.as_str(), "order/submit");
    }

    let view = st.publish_form().await;
    Html(pages::render_order(&view))
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/toppings
// ---------------------------------------------------------------------------

pub(crate) async fn toppings() -> Json<ToppingsResponse> {
    Json(ToppingsResponse {
        toppings: catalog::TOPPINGS.iter().map(|t| t.to_view()).collect(),
    })
}

// ---------------------------------------------------------------------------
// GET /v1/form
// ---------------------------------------------------------------------------

pub(crate) async fn form_view(State(st): State<Arc<AppState>>) -> Json<FormView> {
    Json(st.form.lock().await.view())
}

// ---------------------------------------------------------------------------
// POST /v1/form/field
// ---------------------------------------------------------------------------

pub(crate) async fn form_field(
    State(st): State<Arc<AppState>>,
    Json(req): Json<FieldEditRequest>,
) -> Response {
    let edit = match req.into_edit() {
        Ok(e) => e,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
        }
    };

    let field = edit.field();
    let check = st.form.lock().await.edit(edit);
    info!(%field, accepted = check.is_accepted(), "form/field");

    let view = st.publish_form().await;
    (StatusCode::OK, Json(view)).into_response()
}

// ---------------------------------------------------------------------------
// POST /v1/form/submit
// ---------------------------------------------------------------------------

pub(crate) async fn form_submit(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let report = run_submit(&st).await;
    info!(status = report.as_str(), "form/submit");

    let form = st.publish_form().await;
    (
        StatusCode::OK,
        Json(SubmitResponse {
            status: report.as_str().to_string(),
            form,
        }),
    )
}

async fn run_submit(st: &AppState) -> SubmitReport {
    let report = submit_order(&st.form, st.endpoint.as_ref()).await;
    if let SubmitReport::Resolved { outcome, .. } = &report {
        let (level, msg) = if outcome.is_success() {
            ("INFO", "order accepted")
        } else {
            ("WARN", "order failed")
        };
        let _ = st.bus.send(BusMsg::LogLine {
            level: level.to_string(),
            msg: msg.to_string(),
        });
    }
    report
}

// ---------------------------------------------------------------------------
// GET /v1/stream  (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let event_name = match &m {
                    BusMsg::Heartbeat { .. } => "heartbeat",
                    BusMsg::Form(_) => "form",
                    BusMsg::LogLine { .. } => "log",
                };
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(event_name).data(data)))
            }
            Err(_) => None, // lagged / closed
        }
    })
}
