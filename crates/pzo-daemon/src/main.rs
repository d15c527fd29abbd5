//! pzo-daemon entry point.
//!
//! Sets up tracing, loads config, builds the shared state, wires middleware,
//! and starts the HTTP server. Handlers live in `routes.rs`.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use pzo_client::HttpOrderEndpoint;
use pzo_config::{
    load_form_config, report_unused_keys, split_config_paths, ConfigConsumer, UnusedKeyPolicy,
    ENV_CONFIG_PATHS,
};
use pzo_daemon::{routes, state};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Dev convenience; silent when the file is absent.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let paths = std::env::var(ENV_CONFIG_PATHS)
        .map(|raw| split_config_paths(&raw))
        .unwrap_or_default();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();

    let (cfg, loaded) = load_form_config(&path_refs).context("config load failed")?;
    let cfg = cfg.with_env_overrides(|k| std::env::var(k).ok())?;

    if let Some(loaded) = &loaded {
        info!(config_hash = %loaded.config_hash, "config loaded");
        let report = report_unused_keys(
            ConfigConsumer::Daemon,
            &loaded.config_json,
            UnusedKeyPolicy::Warn,
        )?;
        for key in &report.unused_leaf_pointers {
            warn!(key = %key, "unused config key");
        }
    }

    let endpoint = HttpOrderEndpoint::with_timeout(&cfg.endpoint_base_url, cfg.endpoint_timeout)?;
    info!(url = %endpoint.order_url(), "order endpoint");

    let shared = Arc::new(state::AppState::new(Arc::new(endpoint), cfg.desk_enabled));

    state::spawn_heartbeat(shared.bus.clone(), Duration::from_secs(1));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = cfg.server_addr;
    info!(desk = cfg.desk_enabled, "pzo-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
