//! # Vitrine CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP endpoint
//! - `init` - Seed the local store with defaults
//! - `status` - Boot the store and show its state
//! - `config` - Show the configuration or change one field
//! - `toggle` - Flip a feature flag
//! - `content` - Show the localized catalog
//! - `set-locale` - Change the display locale
//! - `set-env` - Change the deployment environment
//! - `logs` - Show recent audit entries
//! - `login` - Member panel login against the remote endpoint
//! - `health` - Check the remote endpoint

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vitrine_core::ProviderKind;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Vitrine - landing page content and configuration service
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: vitrine.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the local store, overrides the configuration
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Provider to boot against: "local" or "remote"
    #[arg(short = 'P', long, global = true)]
    pub provider: Option<ProviderKind>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP endpoint
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Seed the local store with defaults
    Init {
        /// Overwrite existing documents with the defaults
        #[arg(short, long)]
        force: bool,
    },

    /// Boot the store and show its state
    Status,

    /// Show the configuration, or set FIELD to VALUE
    Config {
        /// Field name (pricingMode, themeMode, provider, environment,
        /// maintenanceMode, version, anchorPrice)
        field: Option<String>,

        /// New value
        value: Option<String>,
    },

    /// Flip a feature flag
    Toggle {
        /// Flag name, e.g. salesToast
        flag: String,
    },

    /// Show the catalog as seen in a locale
    Content {
        /// Locale (pt, en, es); defaults to the stored preference
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Change the display locale
    SetLocale {
        /// pt, en or es
        locale: String,
    },

    /// Change the deployment environment
    SetEnv {
        /// dev, staging or prod
        environment: String,
    },

    /// Show recent audit entries
    Logs {
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Member panel login against the remote endpoint
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short = 'w', long)]
        password: String,
    },

    /// Check the remote endpoint
    Health,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(settings, host, port).await,
        Some(Commands::Init { force }) => cmd_init(&settings, json_mode, force).await,
        Some(Commands::Status) | None => cmd_status(&settings, json_mode).await,
        Some(Commands::Config { field, value }) => {
            cmd_config(&settings, json_mode, field, value).await
        }
        Some(Commands::Toggle { flag }) => cmd_toggle(&settings, json_mode, &flag).await,
        Some(Commands::Content { locale }) => {
            cmd_content(&settings, json_mode, locale.as_deref()).await
        }
        Some(Commands::SetLocale { locale }) => cmd_set_locale(&settings, json_mode, &locale).await,
        Some(Commands::SetEnv { environment }) => {
            cmd_set_env(&settings, json_mode, &environment).await
        }
        Some(Commands::Logs { limit }) => cmd_logs(&settings, json_mode, limit).await,
        Some(Commands::Login { email, password }) => {
            cmd_login(&settings, json_mode, &email, &password).await
        }
        Some(Commands::Health) => cmd_health(&settings, json_mode).await,
    }
}
