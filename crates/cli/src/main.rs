//! Style Mingle CLI - catalog checks, customer lookups and swipe replays.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog document (defaults to the bundled demo catalog)
//! sm-cli catalog validate --file catalog.yaml
//!
//! # Look a customer up by id, email or phone
//! sm-cli customer find emma.wilson@example.com
//!
//! # Recommendations for a customer
//! sm-cli recommend cust-001 --cap 3 --ranking catalog
//!
//! # Replay key presses against a fresh swipe session
//! sm-cli discover cust-001 --keys l,d,n,p,r
//! ```
//!
//! Every command prints JSON to stdout. `--file` falls back to
//! `STYLE_MINGLE_CATALOG_PATH`, then to the bundled catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use style_mingle_core::{DASHBOARD_CAP, Ranking};

mod commands;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(author, version, about = "Style Mingle CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CatalogSource {
    /// Catalog document (JSON, or YAML by extension)
    #[arg(short, long, env = "STYLE_MINGLE_CATALOG_PATH", global = true)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect catalog documents
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
        #[command(flatten)]
        source: CatalogSource,
    },
    /// Look customers up
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
        #[command(flatten)]
        source: CatalogSource,
    },
    /// Recommend products for a customer
    Recommend {
        /// Customer id, email or phone
        identifier: String,

        /// Maximum number of products
        #[arg(short, long, default_value_t = DASHBOARD_CAP)]
        cap: usize,

        /// `scored` or `catalog`
        #[arg(short, long, default_value = "scored")]
        ranking: Ranking,

        #[command(flatten)]
        source: CatalogSource,
    },
    /// Replay key presses against a swipe session
    ///
    /// The deck is the whole catalog, as for a shopper's first session
    /// after signing in. The customer is checked and named in the output.
    Discover {
        /// Customer id, email or phone (must exist)
        identifier: String,

        /// Comma-separated keys, e.g. `l,d,n,p,r` or `ArrowRight,ArrowLeft`
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,

        #[command(flatten)]
        source: CatalogSource,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load and validate a catalog, then summarise it
    Validate,
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Find a customer by id, email or phone
    Find {
        /// Customer id, email or phone
        identifier: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action, source } => match action {
            CatalogAction::Validate => {
                let report = commands::catalog::validate(source.file.as_deref())?;
                commands::emit(&report)?;
            }
        },
        Commands::Customer { action, source } => match action {
            CustomerAction::Find { identifier } => {
                let profile = commands::customer::find(source.file.as_deref(), &identifier)?;
                commands::emit(&profile)?;
            }
        },
        Commands::Recommend {
            identifier,
            cap,
            ranking,
            source,
        } => {
            let list =
                commands::recommend::run(source.file.as_deref(), &identifier, cap, ranking)?;
            commands::emit(&list)?;
        }
        Commands::Discover {
            identifier,
            keys,
            source,
        } => {
            let replay = commands::discover::replay(source.file.as_deref(), &identifier, &keys)?;
            commands::emit(&replay)?;
        }
    }
    Ok(())
}
