//! `pzo order`: fill a form from flags and submit it over HTTP.

use anyhow::{Context, Result};
use pzo_client::{submit_order, HttpOrderEndpoint, SubmitReport};
use pzo_config::{load_form_config, report_unused_keys, ConfigConsumer, UnusedKeyPolicy};
use pzo_form::Outcome;
use tokio::sync::Mutex;
use tracing::warn;

use super::{fill_session, print_form};

pub struct OrderArgs {
    pub name: String,
    pub size: String,
    pub toppings: Vec<String>,
    /// Overrides the configured endpoint base URL.
    pub endpoint: Option<String>,
    pub config_paths: Vec<String>,
}

/// Run the order and print the result. Returns what was reported so the
/// caller can pick the exit code.
pub async fn run_order(args: OrderArgs) -> Result<SubmitReport> {
    let path_refs: Vec<&str> = args.config_paths.iter().map(|s| s.as_str()).collect();
    let (cfg, loaded) = load_form_config(&path_refs).context("config load failed")?;
    let mut cfg = cfg.with_env_overrides(|k| std::env::var(k).ok())?;

    if let Some(loaded) = &loaded {
        let report = report_unused_keys(
            ConfigConsumer::Cli,
            &loaded.config_json,
            UnusedKeyPolicy::Warn,
        )?;
        for key in &report.unused_leaf_pointers {
            warn!(key = %key, "unused config key");
        }
    }

    if let Some(url) = args.endpoint {
        cfg.endpoint_base_url = url;
    }

    let endpoint = HttpOrderEndpoint::with_timeout(&cfg.endpoint_base_url, cfg.endpoint_timeout)?;
    let session = fill_session(&args.name, &args.size, &args.toppings)?;
    let form = Mutex::new(session);

    let report = submit_order(&form, &endpoint).await;
    println!("status={}", report.as_str());

    match &report {
        SubmitReport::Resolved { attempt, outcome } => {
            println!("attempt={attempt}");
            let kind = match outcome {
                Outcome::Success(_) => "success",
                Outcome::Failure(_) => "failure",
                Outcome::None => "none",
            };
            println!("outcome={kind}");
            println!("message={}", outcome.message().unwrap_or(""));
        }
        SubmitReport::GateClosed | SubmitReport::Busy => {
            print_form(&form.lock().await.view());
        }
    }

    Ok(report)
}
