//! # Vitrine
//!
//! The main binary: serves the storage endpoint and administers the
//! configuration and catalog from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP endpoint
//! vitrine server --host 0.0.0.0 --port 8080
//!
//! # Administer through the local store
//! vitrine status
//! vitrine toggle salesToast
//! vitrine config pricingMode LayoutCOMPACT
//!
//! # Same operations against a remote endpoint
//! vitrine -P remote status
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // VITRINE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("VITRINE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine=info,vitrine_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Print the Vitrine startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗   ██╗██╗████████╗██████╗ ██╗███╗   ██╗███████╗
  ██║   ██║██║╚══██╔══╝██╔══██╗██║████╗  ██║██╔════╝
  ██║   ██║██║   ██║   ██████╔╝██║██╔██╗ ██║█████╗
  ╚██╗ ██╔╝██║   ██║   ██╔══██╗██║██║╚██╗██║██╔══╝
   ╚████╔╝ ██║   ██║   ██║  ██║██║██║ ╚████║███████╗
    ╚═══╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚═╝╚═╝  ╚═══╝╚══════╝

  Content & Configuration Core v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
