use anyhow::Result;
use clap::{Parser, Subcommand};
use pzo_client::SubmitReport;
use pzo_form::catalog;

mod commands;

/// Exit code when the submit gate is closed.
const EXIT_GATE_CLOSED: i32 = 2;
/// Exit code when the order was sent but not accepted.
const EXIT_ORDER_FAILED: i32 = 1;

#[derive(Parser)]
#[command(name = "pzo")]
#[command(about = "Pizza order form CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the topping catalog
    Toppings {
        /// Print as JSON instead of `id label` lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Validate an order without sending it. Exits 2 when it could not be submitted.
    Check {
        #[arg(long)]
        name: String,

        /// S | M | L
        #[arg(long)]
        size: String,

        /// Topping id; repeat for several
        #[arg(long = "topping")]
        toppings: Vec<String>,
    },

    /// Validate and submit an order to the order endpoint
    Order {
        #[arg(long)]
        name: String,

        /// S | M | L
        #[arg(long)]
        size: String,

        /// Topping id; repeat for several
        #[arg(long = "topping")]
        toppings: Vec<String>,

        /// Endpoint base URL (overrides config and PZO_ENDPOINT_URL)
        #[arg(long)]
        endpoint: Option<String>,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> local overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Toppings { json } => {
            if json {
                let views: Vec<_> = catalog::TOPPINGS.iter().map(|t| t.to_view()).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                for t in catalog::TOPPINGS.iter() {
                    println!("{} {}", t.id, t.label);
                }
            }
        }
        Commands::Check {
            name,
            size,
            toppings,
        } => {
            let session = commands::fill_session(&name, &size, &toppings)?;
            commands::print_form(&session.view());
            if !session.can_submit() {
                std::process::exit(EXIT_GATE_CLOSED);
            }
        }
        Commands::Order {
            name,
            size,
            toppings,
            endpoint,
            config_paths,
        } => {
            let report = commands::order::run_order(commands::order::OrderArgs {
                name,
                size,
                toppings,
                endpoint,
                config_paths,
            })
            .await?;
            match report {
                SubmitReport::GateClosed | SubmitReport::Busy => {
                    std::process::exit(EXIT_GATE_CLOSED)
                }
                SubmitReport::Resolved { outcome, .. } if outcome.is_failure() => {
                    std::process::exit(EXIT_ORDER_FAILED)
                }
                SubmitReport::Resolved { .. } => {}
            }
        }
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = pzo_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
